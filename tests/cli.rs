// Runs the `rox` binary end to end: argument handling, exit codes and the
// prompt fed from a pipe.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn rox_binary() -> &'static str {
    env!("CARGO_BIN_EXE_rox")
}

/// Write `source` to a script file unique to this test process.
fn script(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("rox-{}-{}.lox", std::process::id(), name));
    fs::write(&path, source).expect("Failed to write script");
    path
}

fn rox(args: &[&str]) -> Output {
    Command::new(rox_binary())
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run rox at {}", rox_binary()))
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_script_runs_without_subcommand() {
    let path = script("bare", "print 1 + 2;");
    let output = rox(&[path.to_str().expect("utf-8 path")]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        stderr_of(&output)
    );
    assert_eq!(stdout_of(&output), "3\n");
}

#[test]
fn test_script_runs_with_run_subcommand() {
    let path = script("run", "print \"hi\";");
    let output = rox(&["run", path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "hi\n");
}

#[test]
fn test_static_error_exits_65() {
    let path = script("static", "print 1");
    let output = rox(&[path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(65));
    assert_eq!(
        stderr_of(&output).trim_end(),
        "[line 1] Error at end: Expect ';' after value."
    );
}

#[test]
fn test_runtime_error_exits_70() {
    let path = script("runtime", "print 1;\nprint 1 < nil;");
    let output = rox(&[path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "1\n");
    assert_eq!(
        stderr_of(&output).trim_end(),
        "Operands must be numbers.\n[line 2]"
    );
}

#[test]
fn test_runaway_recursion_is_a_runtime_error() {
    let path = script(
        "recursion",
        "fun f(n) { if (n > 0) return f(n - 1); return 0; } print f(10000);",
    );
    let output = rox(&[path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stderr_of(&output).trim_end(), "Stack overflow.\n[line 1]");
}

#[test]
fn test_prompt_reports_errors_and_keeps_going() {
    let mut child = Command::new(rox_binary())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|_| panic!("Failed to spawn rox at {}", rox_binary()));

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(b"var a = 1;\nprint nope;\nprint a + 1;\n")
            .expect("Failed to write to stdin");
    }

    let output = child.wait_with_output().expect("Failed to wait on child");

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("2\n"));
    assert!(stderr_of(&output).contains("Undefined variable 'nope'."));
}
