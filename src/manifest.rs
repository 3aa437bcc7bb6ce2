//! Locating `go.mod` and reading the root module path out of it.

use crate::error::ScanError;
use crate::parser::SourceParser;
use crate::scanner::BoundedScanner;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "go.mod";
pub const MANIFEST_LINE_BUDGET: usize = 10;

/// Look for `file_name` in `start` and then in each ancestor directory.
///
/// A tree without its own manifest resolves to the nearest enclosing one,
/// so a package directory inside a module still finds the module's `go.mod`.
pub fn find_manifest(start: &Path, file_name: &str) -> Result<PathBuf, ScanError> {
    let found = start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file());

    match found {
        Some(path) => {
            debug!(manifest = %path.display(), "found manifest");
            Ok(path)
        }
        None => Err(ScanError::NoManifestFound {
            start: start.to_path_buf(),
        }),
    }
}

/// Read the module path from the first `line_budget` meaningful lines.
pub fn read_module_name(
    parser: &SourceParser,
    path: &Path,
    line_budget: usize,
) -> Result<String, ScanError> {
    let outcome = BoundedScanner::new(line_budget).scan(path)?;
    parser
        .extract_module_name(&outcome.text)
        .map_err(|e| e.with_path(path))
}
