use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const LW_0_1_2: i32 = 8454146;
const HALT: i32 = 25165824;

/// Write a program image, one word per line
fn image(words: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for word in words {
        writeln!(file, "{}", word).unwrap();
    }
    file.flush().unwrap();
    file
}

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lc3100-sim"))
        .args(args)
        .output()
        .expect("failed to run simulator")
}

fn run_image(file: &NamedTempFile, extra: &[&str]) -> Output {
    let path = file.path().to_str().unwrap();
    let mut args = vec![path];
    args.extend_from_slice(extra);
    run_sim(&args)
}

#[test]
fn load_and_halt_program() {
    let file = image(&[&LW_0_1_2.to_string(), &HALT.to_string(), "42"]);
    let output = run_image(&file, &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("memory[0]=8454146\nmemory[1]=25165824\nmemory[2]=42\n"));
    // initial, two steps, final
    assert_eq!(stdout.matches("@@@").count(), 4);
    assert!(stdout.contains("machine halted\ntotal of 2 instructions executed\nfinal state of machine:\n"));

    let final_state = stdout.rsplit("@@@").next().unwrap();
    assert!(final_state.contains("\tpc 2\n"));
    assert!(final_state.contains("\t\treg[ 1 ] 42\n"));
}

#[test]
fn trace_shows_pc_memory_then_registers() {
    let file = image(&[&HALT.to_string()]);
    let output = run_image(&file, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let pc = stdout.find("\tpc ").unwrap();
    let mem = stdout.find("\tmemory:").unwrap();
    let regs = stdout.find("\tregisters:").unwrap();
    assert!(pc < mem && mem < regs);
    assert!(stdout.contains("\t\treg[ 7 ] 0\n"));
}

#[test]
fn quiet_prints_only_the_summary() {
    let file = image(&[&HALT.to_string()]);
    let output = run_image(&file, &["--quiet"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("machine halted\ntotal of 1 instructions executed\n"));
    assert_eq!(stdout.matches("@@@").count(), 1);
}

#[test]
fn program_without_halt_runs_off_the_end() {
    let noop = (7 << 22).to_string();
    let file = image(&[&noop, &noop, &noop]);
    let output = run_image(&file, &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("machine halted\ntotal of 3 instructions executed\n"));
}

#[test]
fn instruction_limit() {
    // beq 0 0 -1
    let spin = ((4 << 22) | 0xffff).to_string();
    let file = image(&[&spin]);
    let output = run_image(&file, &["--max-insns", "5"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("instruction limit of 5 reached\ntotal of 5 instructions executed\n"));
}

#[test]
fn missing_argument_is_a_usage_error() {
    let output = run_sim(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn extra_argument_is_a_usage_error() {
    let file = image(&[&HALT.to_string()]);
    let output = run_image(&file, &["extra.mc"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn unreadable_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.mc");
    let output = run_sim(&[path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("can't open file"));
}

#[test]
fn malformed_line_names_the_address() {
    let file = image(&["1", "2", "three"]);
    let output = run_image(&file, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("error in reading address 2")
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn out_of_range_store_is_fatal() {
    // sw 0 1 -1
    let sw = ((3 << 22) | (1 << 16) | 0xffff).to_string();
    let file = image(&[&sw, &HALT.to_string()]);
    let output = run_image(&file, &[]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("address out of range: -1"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("machine halted"));
    // only the initial dump
    assert_eq!(stdout.matches("@@@").count(), 1);
}

#[test]
fn running_off_the_end_at_the_limit_is_a_normal_halt() {
    let noop = (7 << 22).to_string();
    let file = image(&[&noop, &noop]);
    let output = run_image(&file, &["--max-insns", "2"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("machine halted\ntotal of 2 instructions executed\n"));
    assert!(!stdout.contains("instruction limit"));
}

#[test]
fn non_utf8_trailing_bytes_are_ignored() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"25165824\n42 \xff\n").unwrap();
    file.flush().unwrap();

    let output = run_image(&file, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("memory[0]=25165824\nmemory[1]=42\n"));
}
