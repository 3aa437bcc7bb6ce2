use crate::parser::SourceUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One file's contribution to its package: the file name and its imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file: String,
    pub dependencies: Vec<String>,
}

/// Package name to the records of every file declaring that package.
///
/// Packages iterate in name order; records keep the order files were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    units: BTreeMap<String, Vec<FileRecord>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub units: usize,
    pub files: usize,
    pub edges: usize,
}

impl GraphStats {
    pub fn log_summary(&self) {
        info!(
            packages = self.units,
            files = self.files,
            edges = self.edges,
            "dependency graph assembled"
        );
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one extracted record into the graph.
    ///
    /// `record` is the extractor's output: package name first, then imports.
    /// The package becomes the key and `file_name` takes its place at the
    /// head. Records are never merged, even for files of the same package.
    pub fn add_file(&mut self, file_name: &str, record: Vec<String>) {
        let mut parts = record.into_iter();
        let Some(unit) = parts.next() else {
            debug!(file = file_name, "skipping empty dependency record");
            return;
        };
        if file_name.is_empty() {
            debug!(unit = %unit, "skipping record without a file name");
            return;
        }

        self.units.entry(unit).or_default().push(FileRecord {
            file: file_name.to_string(),
            dependencies: parts.collect(),
        });
    }

    pub fn add_unit(&mut self, unit: SourceUnit) {
        self.add_file(&unit.file_name, unit.dependencies);
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, &[FileRecord])> {
        self.units
            .iter()
            .map(|(unit, records)| (unit.as_str(), records.as_slice()))
    }

    pub fn records(&self, unit: &str) -> Option<&[FileRecord]> {
        self.units.get(unit).map(Vec::as_slice)
    }

    /// Every edge in emission order: package to file, then file to each import.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.units().flat_map(|(unit, records)| {
            records.iter().flat_map(move |record| {
                std::iter::once((unit, record.file.as_str())).chain(
                    record
                        .dependencies
                        .iter()
                        .map(move |dep| (record.file.as_str(), dep.as_str())),
                )
            })
        })
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            units: self.units.len(),
            files: self.units.values().map(Vec::len).sum(),
            edges: self.edges().count(),
        }
    }
}
