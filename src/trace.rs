//! Trace export.
//!
//! A trace is the ID log of one run, one ID per line, followed by a status line
//! (`ACCEPTED`, `REJECTED` or `STEP LIMIT REACHED`). Batch runs write one trace file per
//! input, numbered from 1.

use crate::types::{TuringMachineError, Verdict};
use std::fs;
use std::path::{Path, PathBuf};

/// Renders a verdict as trace text.
pub fn export(verdict: &Verdict) -> String {
    let mut text = verdict.ids.join("\n");
    text.push('\n');
    text.push_str(&verdict.outcome().to_string());
    text.push('\n');
    text
}

/// Builds the trace file path for the input at `index` (1-based).
///
/// `traces/run.txt` becomes `traces/run_input3.txt`; a missing `.txt` extension is added.
pub fn trace_path(base: &Path, index: usize) -> PathBuf {
    let stem = match base.extension() {
        Some(ext) if ext == "txt" => base.with_extension(""),
        _ => base.to_path_buf(),
    };

    let mut name = stem.file_name().unwrap_or_default().to_os_string();
    name.push(format!("_input{index}.txt"));
    stem.with_file_name(name)
}

/// Writes the trace of one run next to `base` and returns the path written.
pub fn write_trace(
    base: &Path,
    index: usize,
    verdict: &Verdict,
) -> Result<PathBuf, TuringMachineError> {
    let path = trace_path(base, index);
    fs::write(&path, export(verdict)).map_err(|e| {
        TuringMachineError::FileError(format!("Failed to write trace {}: {}", path.display(), e))
    })?;

    tracing::debug!(path = %path.display(), "trace written");
    Ok(path)
}
