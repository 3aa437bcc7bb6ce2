use std::path::PathBuf;

/// Failures raised while reading manifests and scanning source files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no go.mod found from '{start}' upwards, is this a project?")]
    NoManifestFound { start: PathBuf },

    #[error("no module name found in '{path}'")]
    NoModuleNameFound { path: PathBuf },

    #[error("no package clause found in '{path}'")]
    NoDeclarationFound { path: PathBuf },

    #[error("no grouped import clause found")]
    NoImportsFound,

    #[error("import clause matched without a captured body")]
    MalformedImportBlock,

    #[error("invalid grammar pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ScanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a file path to errors raised by text-only extraction.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::NoDeclarationFound { .. } => Self::NoDeclarationFound { path: path.into() },
            Self::NoModuleNameFound { .. } => Self::NoModuleNameFound { path: path.into() },
            other => other,
        }
    }
}
