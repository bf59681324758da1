use conseil::error::Error;
use conseil::tool::{SystemInvoker, ToolInvoker};
use std::process::Command;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

#[test]
fn test_successful_tool_output() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let output = SystemInvoker::new(temp_dir.path()).run("git", &["--version"]).unwrap();
    assert!(output.starts_with("git version"));
}

#[test]
fn test_failing_tool_captures_output() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    match SystemInvoker::new(temp_dir.path()).run("git", &["no-such-subcommand"]) {
        Err(Error::ToolInvocationError { tool, output }) => {
            assert_eq!(tool, "git no-such-subcommand");
            assert!(output.contains("no-such-subcommand"));
        }
        other => panic!("Expected ToolInvocationError, got {:?}", other),
    }
}

#[test]
fn test_runs_in_working_directory() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    SystemInvoker::new(temp_dir.path()).run("git", &["init"]).unwrap();
    assert!(temp_dir.path().join(".git").is_dir());
}

#[test]
fn test_missing_tool() {
    let temp_dir = TempDir::new().unwrap();
    let err = SystemInvoker::new(temp_dir.path()).run("conseil-missing-dep", &["init"]).unwrap_err();
    assert!(matches!(err, Error::ToolInvocationError { .. }));
    assert!(err.to_string().contains("conseil-missing-dep init"));
}
