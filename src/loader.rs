//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! descriptions from files, directories and strings.

use crate::machine::Program;
use crate::parser::parse;
use crate::types::TuringMachineError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as machine documents.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// `ProgramLoader` is a utility struct for loading programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all machine documents within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read, parsed and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * Any parsing or configuration error for the file content otherwise.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let program = parse(&content)?;
        tracing::info!(path = %path.display(), machine = program.name(), "program loaded");
        Ok(program)
    }

    /// Loads a single program from the provided string content.
    ///
    /// This is useful for programs that are not stored in files, e.g., piped input.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }

    /// Loads every machine document (`.yaml`, `.yml` or `.json`) from a given directory.
    ///
    /// Directories and other files are skipped. Each document yields its own result, so a
    /// broken file does not hide the others.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => {
                    return vec![Err(TuringMachineError::FileError(format!(
                        "Failed to read directory entry: {}",
                        e
                    )))]
                }
            }
        }
        // Directory order is platform dependent
        paths.sort();

        paths
            .into_iter()
            .filter(|path| !path.is_dir() && Self::is_document(path))
            .map(|path| match Self::load_program(&path) {
                Ok(program) => Ok((path, program)),
                Err(e) => Err(TuringMachineError::FileError(format!(
                    "Failed to load program from {}: {}",
                    path.display(),
                    e
                ))),
            })
            .collect()
    }

    /// Checks whether `path` has one of the `DOCUMENT_EXTENSIONS`.
    pub fn is_document(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }
}
