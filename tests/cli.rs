//! Integration tests for the cellflow binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Config with logging off so stderr only carries edit errors.
fn quiet_config() -> &'static PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let path = std::env::temp_dir().join("cellflow_cli_test.toml");
        std::fs::write(&path, "log_level = \"off\"\n").expect("write temp config");
        path
    })
}

fn run(args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cellflow"))
        // Tests must not depend on a user's ~/.config/cellflow/config.toml.
        .arg("--config")
        .arg(quiet_config())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute cellflow");

    {
        let mut pipe = child.stdin.take().expect("stdin");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for cellflow");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_edits_from_arguments() {
    let (stdout, stderr, code) = run(&["A1=10", "A2=20", "A3==SUM(A1:A2)"], None);
    assert_eq!(stdout, "A1\t10\nA2\t20\nA3\t30\n");
    assert_eq!(stderr, "");
    assert_eq!(code, 0);
}

#[test]
fn test_later_edit_propagates() {
    let (stdout, _, code) = run(
        &["A1=2", "B1==SUM(A1)", "C1==SUM(B1)", "A1=5"],
        None,
    );
    assert_eq!(stdout, "A1\t5\nB1\t5\nC1\t5\n");
    assert_eq!(code, 0);
}

#[test]
fn test_edits_from_stdin() {
    let input = "# totals\nA1=10\nA2=20\n\nA3==SUM(A1:A2)\nA1=abc\n";
    let (stdout, _, code) = run(&[], Some(input));
    assert_eq!(stdout, "A1\tabc\nA2\t20\nA3\t20\n");
    assert_eq!(code, 0);
}

#[test]
fn test_circular_edit_is_reported() {
    let (stdout, stderr, code) = run(&["A1==SUM(B1)", "B1==SUM(A1)"], None);
    assert_eq!(stdout, "A1\t0\n");
    assert!(stderr.contains("line 2"), "{stderr}");
    assert!(stderr.contains("ircular"), "{stderr}");
    assert_eq!(code, 1);
}

#[test]
fn test_bad_edit_line_is_reported() {
    let (stdout, stderr, code) = run(&["A1=1", "nonsense"], None);
    assert_eq!(stdout, "A1\t1\n");
    assert!(stderr.contains("Parse error at line 2"), "{stderr}");
    assert_eq!(code, 1);
}

#[test]
fn test_formula_errors_are_values() {
    let (stdout, _, code) = run(&["A1==AVERAGE()", "A2==UPPER(A1, A1)"], None);
    assert_eq!(stdout, "A1\t#DIV/0!\nA2\t#ERROR!\n");
    assert_eq!(code, 0);
}

#[test]
fn test_unknown_option() {
    let (_, stderr, code) = run(&["--bogus"], None);
    assert!(stderr.contains("Unknown option"));
    assert_eq!(code, 1);
}
