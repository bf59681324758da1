#![allow(dead_code)]

use conseil::catalog::{Catalog, EmbeddedCatalog};
use conseil::error::{Error, Result};
use conseil::pipeline::NewOptions;
use conseil::tool::{command_line, ToolInvoker};
use regex::Regex;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Tool invoker that records command lines instead of spawning processes.
#[derive(Default)]
pub struct RecordingInvoker {
    calls: RefCell<Vec<String>>,
    outputs: Vec<(String, String)>,
    failures: Vec<(String, String)>,
}

impl RecordingInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `command` succeed with `output`.
    pub fn responding(mut self, command: &str, output: &str) -> Self {
        self.outputs.push((command.to_string(), output.to_string()));
        self
    }

    /// Makes `command` fail with `output`.
    pub fn failing(mut self, command: &str, output: &str) -> Self {
        self.failures.push((command.to_string(), output.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ToolInvoker for RecordingInvoker {
    fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        let line = command_line(tool, args);
        self.calls.borrow_mut().push(line.clone());

        if let Some((_, output)) = self.failures.iter().find(|(command, _)| *command == line) {
            return Err(Error::ToolInvocationError { tool: line, output: output.clone() });
        }
        Ok(self
            .outputs
            .iter()
            .find(|(command, _)| *command == line)
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}

/// Options targeting `<base>/shop`, so the app name is always `shop`.
pub fn shop_options(base: &Path) -> NewOptions {
    NewOptions { target_dir: base.join("shop"), ..Default::default() }
}

/// Counts the paths below `base` matching `pattern`.
pub fn file_count<P: AsRef<Path>>(base: P, pattern: &str) -> usize {
    let re = Regex::new(pattern).unwrap();
    WalkDir::new(base)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| re.is_match(&entry.path().to_string_lossy()))
        .count()
}

/// Writes every embedded asset below `root`, returning `root`.
pub fn export_embedded(root: &Path) -> PathBuf {
    for name in EmbeddedCatalog.names() {
        let path = root.join(&name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, EmbeddedCatalog.get(&name).unwrap()).unwrap();
    }
    root.to_path_buf()
}
