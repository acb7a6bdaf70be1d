use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lc3100_sim::cpu::Machine;
use lc3100_sim::{debug, image};

#[derive(Parser, Debug)]
#[command(version, about = "Instruction-level simulator for LC3100 machine code")]
struct Args {
    /// Machine-code file, one decimal word per line
    image: PathBuf,

    /// Stop after N instructions (0 = run until halt)
    #[arg(long, default_value_t = 0)]
    max_insns: u64,

    /// Only print the final summary and state
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut out = BufWriter::new(io::stdout().lock());
    let result = run(&args, &mut out);
    // Keep the partial trace even when the run failed.
    let flushed = out.flush();

    match result.and(flushed.map_err(Into::into)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let mem = image::load_image_file(&args.image)?;

    let mut machine = Machine::new(mem);
    machine.max_insns = args.max_insns;
    machine.trace = !args.quiet;

    if machine.trace {
        debug::write_load_echo(out, &machine.mem)?;
        write!(out, "{}", machine.dump())?;
    }

    let summary = machine.run(out)?;
    debug::write_summary(out, &machine, &summary)?;
    Ok(())
}
