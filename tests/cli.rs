use std::fs::{self, File};
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn get_monkey_binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_monkey"));
    command.arg("--color").arg("never");
    command
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = get_monkey_binary()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn monkey");

    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write to stdin");

    child.wait_with_output().expect("Failed to wait for monkey")
}

/// Script file in the temp directory, removed on drop.
struct TempScript {
    path: std::path::PathBuf,
}

impl TempScript {
    fn new(name: &str, content: &str) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("monkey_test_{}_{}.mk", name, std::process::id()));
        let mut file = File::create(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(Self { path })
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn test_version_flag() {
    let output = get_monkey_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("monkey"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_eval_prints_final_value() {
    let output = get_monkey_binary()
        .arg("-e")
        .arg("let add = fn(a, b) { a + b }; add(1, 2)")
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "3\n");
}

#[test]
fn test_eval_null_result_prints_nothing() {
    let output = get_monkey_binary()
        .arg("-e")
        .arg("puts(\"side effect\"); let x = 1;")
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "side effect\n");
}

#[test]
fn test_script_file() {
    let script = TempScript::new(
        "script",
        "let people = [{\"name\": \"Ada\"}];\nputs(people[0][\"name\"]);\nlen(people)\n",
    )
    .expect("Failed to create script");

    let output = get_monkey_binary()
        .arg(&script.path)
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "Ada\n1\n");
}

#[test]
fn test_missing_script_file() {
    let output = get_monkey_binary()
        .arg("/definitely/not/here.mk")
        .output()
        .expect("Failed to execute monkey");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_parse_errors_are_rendered() {
    let output = get_monkey_binary()
        .arg("-e")
        .arg("let x = ;")
        .output()
        .expect("Failed to execute monkey");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[E0102]: no prefix parse function for ; found"));
    assert!(stderr.contains("--> <eval>:1:9"));
    assert!(stderr.contains("aborting due to 1 error"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_runtime_errors_exit_with_failure() {
    let output = get_monkey_binary()
        .arg("-e")
        .arg("5 + true")
        .output()
        .expect("Failed to execute monkey");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[E0201]: type mismatch: INTEGER + BOOLEAN"));
}

#[test]
fn test_repl_keeps_bindings_between_lines() {
    let output = run_with_stdin(&[], "let x = 5;\nx * 2\nputs(x)\nexit\nx\n");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(">> 10\n"));
    assert!(stdout.contains(">> 5\nnull\n"));
    assert_eq!(stdout.matches(">> ").count(), 4, "input after `exit` is ignored");
}

#[test]
fn test_repl_reports_errors_and_continues() {
    let output = run_with_stdin(&[], "let = 1\nfoo\n1 + 1\n");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("expected next token to be IDENT, got = instead"));
    assert!(stderr.contains("identifier not found: foo"));
    assert!(stdout.contains(">> 2\n"));
}

#[test]
fn test_verbose_logging() {
    let output = get_monkey_binary()
        .arg("-v")
        .arg("-e")
        .arg("1")
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[monkey:debug] Starting monkey"));
}

#[test]
fn test_completions() {
    let output = Command::new(env!("CARGO_BIN_EXE_monkey"))
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute monkey");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("monkey"));
}
