//! Probe error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while locating FreeTDS.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A variable cargo always sets for build scripts is missing.
    #[error("environment variable {0} is not set (is this running inside a build script?)")]
    MissingEnv(&'static str),

    /// A target triple could not be understood.
    #[error("invalid target triple: {0:?}")]
    InvalidTarget(String),

    /// An explicitly configured directory does not contain the DB-Library headers.
    #[error(
        "{var} points at {} which is missing {}",
        .dir.display(),
        .missing.join(", ")
    )]
    OverrideIncomplete {
        /// Environment variable (or setting) the directory came from.
        var: &'static str,
        /// The configured include directory.
        dir: PathBuf,
        /// Required headers that were not found.
        missing: Vec<&'static str>,
    },

    /// No candidate location contained the DB-Library headers.
    #[error(
        "FreeTDS headers (sybdb.h, sybfront.h) not found for target {target}; searched: {}. \
         Install FreeTDS or set FREETDS_DIR / FREETDS_INCLUDE_DIR",
        render_paths(.searched)
    )]
    NotFound {
        /// Target that was probed.
        target: String,
        /// Include directories that were examined, in order.
        searched: Vec<PathBuf>,
    },

    /// Static linking was requested but no static archive was found.
    #[error(
        "static linking requested but {file} not found in: {}. Set FREETDS_LIB_DIR or unset FREETDS_STATIC",
        render_paths(.searched)
    )]
    StaticLibraryNotFound {
        /// Archive file name that was looked for.
        file: String,
        /// Library directories that were examined.
        searched: Vec<PathBuf>,
    },

    /// IO error while writing generated files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Check if this error means FreeTDS is simply not installed.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn render_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(nothing)".to_string();
    }
    paths
        .iter()
        .map(PathBuf::as_path)
        .map(Path::display)
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
