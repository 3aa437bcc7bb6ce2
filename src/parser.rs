use crate::error::ScanError;
use crate::file_discovery::SourceFile;
use crate::scanner::BoundedScanner;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One scanned file: its package and, head first, the package followed by
/// every grouped import in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub file_name: String,
    pub declaring_unit: String,
    pub dependencies: Vec<String>,
}

pub struct SourceParser {
    package_pattern: Regex,
    import_block_pattern: Regex,
    module_pattern: Regex,
}

impl SourceParser {
    pub fn new() -> Result<Self, ScanError> {
        Ok(Self {
            package_pattern: Regex::new(r"(?m)^package\s+(?P<name>\w+)")?,
            // An unterminated clause runs to the end of the scanned text.
            import_block_pattern: Regex::new(r"(?m)^import\s*\((?P<imports>[^)]*)(?:\)|\z)")?,
            module_pattern: Regex::new(r#"(?m)^module\s+(?P<path>"[^"]*"|\S+)"#)?,
        })
    }

    /// Name from the first line starting with `package`.
    pub fn extract_declaring_unit(&self, text: &str) -> Result<String, ScanError> {
        self.package_pattern
            .captures(text)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().to_string())
            .ok_or(ScanError::NoDeclarationFound {
                path: PathBuf::new(),
            })
    }

    /// The package name followed by every entry of the grouped import clause.
    ///
    /// Single-form imports are not captured: a file using only those yields
    /// just its package name.
    pub fn extract_dependencies(&self, text: &str) -> Result<Vec<String>, ScanError> {
        let unit = self.extract_declaring_unit(text)?;

        let block = match self.import_block(text) {
            Ok(block) => block,
            Err(ScanError::NoImportsFound) => return Ok(vec![unit]),
            Err(e) => return Err(e),
        };

        let cleaned = block.replace(&['"', '\t'][..], "");
        let mut dependencies = vec![unit];
        dependencies.extend(
            cleaned
                .lines()
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string),
        );
        Ok(dependencies)
    }

    /// Module path from the first `module` line of a go.mod.
    pub fn extract_module_name(&self, text: &str) -> Result<String, ScanError> {
        self.module_pattern
            .captures(text)
            .and_then(|caps| caps.name("path"))
            .map(|m| m.as_str().trim_matches('"').to_string())
            .filter(|name| !name.is_empty())
            .ok_or(ScanError::NoModuleNameFound {
                path: PathBuf::new(),
            })
    }

    /// Scan `file` with `scanner` and extract its package and imports.
    pub fn parse_file(
        &self,
        file: &SourceFile,
        scanner: &BoundedScanner,
    ) -> Result<SourceUnit, ScanError> {
        let outcome = scanner.scan(&file.path)?;
        let dependencies = self
            .extract_dependencies(&outcome.text)
            .map_err(|e| e.with_path(&file.path))?;

        Ok(SourceUnit {
            path: file.path.clone(),
            file_name: file.name.clone(),
            declaring_unit: dependencies[0].clone(),
            dependencies,
        })
    }

    fn import_block<'t>(&self, text: &'t str) -> Result<&'t str, ScanError> {
        let caps = self
            .import_block_pattern
            .captures(text)
            .ok_or(ScanError::NoImportsFound)?;
        caps.name("imports")
            .map(|m| m.as_str())
            .ok_or(ScanError::MalformedImportBlock)
    }
}
