//! External tool invocation.
//! Runs executables such as `git`, `dep` and `go` to completion and captures
//! their combined output.

use crate::error::{Error, Result};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for running external executables.
pub trait ToolInvoker {
    /// Runs `tool` with `args` and waits for it to exit.
    ///
    /// # Returns
    /// * `Result<String>` - Trimmed stdout, then trimmed stderr on its own line
    ///
    /// # Errors
    /// * `Error::ToolInvocationError` if the executable cannot be started or
    ///   exits with a non-zero status
    fn run(&self, tool: &str, args: &[&str]) -> Result<String>;
}

/// Invoker spawning real processes inside a working directory.
#[derive(Debug, Clone)]
pub struct SystemInvoker {
    working_dir: PathBuf,
}

impl SystemInvoker {
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Self {
        Self { working_dir: working_dir.as_ref().to_path_buf() }
    }
}

impl ToolInvoker for SystemInvoker {
    fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        let command_line = command_line(tool, args);
        debug!("Running '{}' in {}", command_line, self.working_dir.display());

        let output = Command::new(tool)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| Error::ToolInvocationError {
                tool: command_line.clone(),
                output: match e.kind() {
                    io::ErrorKind::NotFound => format!("executable '{tool}' not found"),
                    _ => format!("executable '{tool}' could not be started: {e}"),
                },
            })?;

        let combined = combine_output(&output.stdout, &output.stderr);

        if !output.status.success() {
            return Err(Error::ToolInvocationError {
                tool: command_line,
                output: if combined.is_empty() { output.status.to_string() } else { combined },
            });
        }

        Ok(combined)
    }
}

/// Joins captured stdout and stderr. The streams are captured separately, so
/// stdout always comes first regardless of the order the tool wrote them.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    [stdout, stderr]
        .iter()
        .map(|stream| String::from_utf8_lossy(stream).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a tool and its arguments the way a user would type them.
pub fn command_line(tool: &str, args: &[&str]) -> String {
    std::iter::once(tool).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("git", &["init"]), "git init");
        assert_eq!(command_line("go", &[]), "go");
    }

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output(b"no newline", b"warning\n"), "no newline\nwarning");
        assert_eq!(combine_output(b"  \n", b"only stderr\n"), "only stderr");
        assert_eq!(combine_output(b"only stdout\n", b""), "only stdout");
        assert_eq!(combine_output(b"", b""), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_output_keeps_streams_apart() {
        let invoker = SystemInvoker::new(std::env::temp_dir());
        let script = "echo first-stderr >&2; printf second-stdout; exit 1";
        match invoker.run("sh", &["-c", script]) {
            Err(Error::ToolInvocationError { output, .. }) => {
                assert_eq!(output, "second-stdout\nfirst-stderr");
            }
            other => panic!("Expected ToolInvocationError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_executable() {
        let invoker = SystemInvoker::new(std::env::temp_dir());
        match invoker.run("conseil-definitely-missing-tool", &["--version"]) {
            Err(Error::ToolInvocationError { tool, output }) => {
                assert_eq!(tool, "conseil-definitely-missing-tool --version");
                assert!(output.contains("not found"));
            }
            other => panic!("Expected ToolInvocationError, got {:?}", other),
        }
    }
}
