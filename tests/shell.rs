//! Drives the built shell binary through a pipe on its standard input.

use seashell::READ_FAILURE;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_shell(input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_seashell"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn shell");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write input");
    child.wait_with_output().expect("shell output")
}

#[test]
fn test_failed_command_does_not_fork_a_second_shell() {
    let output = run_shell("definitely-not-a-real-program-4711\necho marker\nexit\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("exec failed"), "stderr: {stderr}");
    // A child that survived its failed exec would replay the remaining lines.
    assert_eq!(stdout.matches("marker\n").count(), 1, "stdout: {stdout}");
    assert!(!stdout.contains(READ_FAILURE), "stdout: {stdout}");
}

#[test]
fn test_failed_redirect_does_not_fork_a_second_shell() {
    let output = run_shell("cat < /definitely/not/here-4711\necho marker\nexit\n");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success());
    assert!(stderr.contains("Trouble opening file"), "stderr: {stderr}");
    assert_eq!(stdout.matches("marker\n").count(), 1, "stdout: {stdout}");
}

#[test]
fn test_end_of_input_is_reported() {
    let output = run_shell("echo hi\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("hi\n"), "stdout: {stdout}");
    assert!(stdout.contains(READ_FAILURE), "stdout: {stdout}");
}
