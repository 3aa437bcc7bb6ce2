use crate::config::Config;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Base name, used as the file's node in the graph.
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

pub struct FileDiscovery {
    config: Config,
}

impl FileDiscovery {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// All candidate source files under the target directory, sorted by path.
    ///
    /// Graph output order follows this order, so the sort is what makes two
    /// runs over the same tree produce identical output.
    pub fn discover_files(&self) -> crate::Result<Vec<SourceFile>> {
        let root = &self.config.target_directory;
        let mut files = Vec::new();

        let walker = WalkBuilder::new(root)
            .standard_filters(true)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.should_ignore_file(relative) {
                debug!(path = %relative.display(), "ignored by pattern");
                continue;
            }

            if let Some(file) = self.process_file(path)? {
                files.push(file);
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn should_ignore_file(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.ignore_patterns {
            if let Some(ext) = pattern.strip_prefix("*.") {
                if let Some(filename) = path.file_name() {
                    if filename.to_string_lossy().ends_with(&format!(".{}", ext)) {
                        return true;
                    }
                }
            } else if pattern.contains('*') {
                let regex_pattern = format!("^{}$", regex::escape(pattern).replace(r"\*", ".*"));
                if let Ok(re) = regex::Regex::new(&regex_pattern) {
                    if re.is_match(&path_str) {
                        return true;
                    }
                    if let Some(filename) = path.file_name() {
                        if re.is_match(&filename.to_string_lossy()) {
                            return true;
                        }
                    }
                }
            } else {
                for component in path.components() {
                    if component.as_os_str().to_string_lossy() == *pattern {
                        return true;
                    }
                }
            }
        }

        false
    }

    fn process_file(&self, path: &Path) -> crate::Result<Option<SourceFile>> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        let wanted = extension
            .as_ref()
            .is_some_and(|ext| self.config.file_extensions.contains(ext));
        if !wanted {
            return Ok(None);
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Ok(None);
        };
        let size = std::fs::metadata(path)?.len();

        Ok(Some(SourceFile {
            name,
            path: path.to_path_buf(),
            size,
        }))
    }

    pub fn get_stats(&self, files: &[SourceFile]) -> FileStats {
        FileStats {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub total_files: usize,
    pub total_size: u64,
}

impl FileStats {
    pub fn log_summary(&self) {
        info!(
            files = self.total_files,
            size_mb = %format!("{:.2}", self.total_size as f64 / (1024.0 * 1024.0)),
            "file discovery finished"
        );
    }
}
