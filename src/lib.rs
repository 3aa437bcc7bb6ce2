pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod dependency_graph;
pub mod emitter;
pub mod error;
pub mod file_discovery;
pub mod manifest;
pub mod parser;
pub mod scanner;

pub use analyzer::{Analyzer, ProjectGraph};
pub use classifier::{classify, LineState, Signal};
pub use config::Config;
pub use dependency_graph::{DependencyGraph, FileRecord, GraphStats};
pub use emitter::{Emitter, GraphStyle};
pub use error::ScanError;
pub use file_discovery::{FileDiscovery, SourceFile};
pub use parser::{SourceParser, SourceUnit};
pub use scanner::{BoundedScanner, ScanOutcome, StopReason};

pub type Result<T> = anyhow::Result<T>;
