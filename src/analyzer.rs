use crate::{
    config::Config,
    dependency_graph::DependencyGraph,
    error::ScanError,
    file_discovery::{FileDiscovery, SourceFile},
    manifest::{find_manifest, read_module_name},
    parser::{SourceParser, SourceUnit},
    scanner::BoundedScanner,
};
use anyhow::{ensure, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The result of one run: the root module and the assembled graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub module_name: String,
    pub graph: DependencyGraph,
}

pub struct Analyzer {
    config: Config,
    file_discovery: FileDiscovery,
    parser: SourceParser,
    scanner: BoundedScanner,
}

impl Analyzer {
    pub fn new(mut config: Config) -> Result<Self> {
        ensure!(
            config.source_line_budget > 0,
            "source_line_budget must be at least 1"
        );
        ensure!(
            config.manifest_line_budget > 0,
            "manifest_line_budget must be at least 1"
        );

        config.target_directory = std::fs::canonicalize(&config.target_directory)
            .with_context(|| {
                format!(
                    "cannot resolve target directory {}",
                    config.target_directory.display()
                )
            })?;

        let file_discovery = FileDiscovery::new(config.clone());
        let parser = SourceParser::new()?;
        let scanner = BoundedScanner::new(config.source_line_budget)
            .with_large_file_threshold(config.large_file_threshold);

        Ok(Self {
            config,
            file_discovery,
            parser,
            scanner,
        })
    }

    /// Manifest, discovery, per-file extraction, then assembly.
    ///
    /// Any failure aborts the whole run.
    pub fn run(&self) -> Result<ProjectGraph> {
        let manifest = find_manifest(&self.config.target_directory, &self.config.manifest_file)?;
        let module_name =
            read_module_name(&self.parser, &manifest, self.config.manifest_line_budget)?;
        info!(module = %module_name, manifest = %manifest.display(), "resolved root module");

        let files = self.file_discovery.discover_files()?;
        self.file_discovery.get_stats(&files).log_summary();

        let units = self.scan_files(&files)?;

        let mut graph = DependencyGraph::new();
        for mut unit in units {
            if self.config.internal_only {
                retain_internal(&mut unit, &module_name);
            }
            debug!(
                path = %unit.path.display(),
                package = %unit.declaring_unit,
                imports = unit.dependencies.len().saturating_sub(1),
                "adding file to graph"
            );
            graph.add_unit(unit);
        }
        graph.stats().log_summary();

        Ok(ProjectGraph { module_name, graph })
    }

    /// Extract every file, preserving input order in the result.
    fn scan_files(&self, files: &[SourceFile]) -> Result<Vec<SourceUnit>, ScanError> {
        if self.config.parallel {
            files
                .par_iter()
                .map(|file| self.parser.parse_file(file, &self.scanner))
                .collect()
        } else {
            files
                .iter()
                .map(|file| self.parser.parse_file(file, &self.scanner))
                .collect()
        }
    }
}

/// Drop imports outside `module_name`, keeping the package head.
fn retain_internal(unit: &mut SourceUnit, module_name: &str) {
    let prefix = format!("{module_name}/");
    let mut entries = std::mem::take(&mut unit.dependencies).into_iter();
    unit.dependencies.extend(entries.next());
    unit.dependencies
        .extend(entries.filter(|dep| dep == module_name || dep.starts_with(&prefix)));
}
