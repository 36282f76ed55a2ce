//! Cargo build-script directives.
//!
//! Metadata keys are printed as `cargo:<key>=<value>`; with
//! `links = "sybdb"` in the emitting crate, dependents see them as
//! `DEP_SYBDB_<KEY>` environment variables.

use std::io::{self, Write};
use std::path::Path;

use crate::installation::Installation;

/// An ordered set of build-script directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CargoDirectives {
    lines: Vec<String>,
}

impl CargoDirectives {
    /// Create an empty directive set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link directives and metadata for an installation.
    #[must_use]
    pub fn for_installation(installation: &Installation) -> Self {
        let mut directives = Self::new();
        for dir in &installation.link_dirs {
            directives.push(format!("cargo:rustc-link-search=native={}", dir.display()));
        }
        directives.push(format!(
            "cargo:rustc-link-lib={}={}",
            installation.link_kind.as_cargo_str(),
            installation.lib_name
        ));
        if let Some(dir) = installation.include_dir() {
            directives = directives.metadata("include", dir.display());
        }
        if let Some(root) = &installation.root {
            directives = directives.metadata("root", root.display());
        }
        if let Some(version) = &installation.version {
            directives = directives.metadata("version", version);
        }
        directives
    }

    /// Re-run the build script when any of `vars` changes.
    #[must_use]
    pub fn rerun_if_env_changed<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for var in vars {
            self.push(format!("cargo:rerun-if-env-changed={}", var.as_ref()));
        }
        self
    }

    /// Re-run the build script when any of `paths` changes.
    #[must_use]
    pub fn rerun_if_changed<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.push(format!("cargo:rerun-if-changed={}", path.as_ref().display()));
        }
        self
    }

    /// Add a `links` metadata entry.
    #[must_use]
    pub fn metadata(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.push(format!("cargo:{key}={value}"));
        self
    }

    /// Add a `cargo:warning` line.
    #[must_use]
    pub fn warning(mut self, message: impl std::fmt::Display) -> Self {
        self.push(format!("cargo:warning={message}"));
        self
    }

    /// Rendered directive lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write the directives, one per line.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Print the directives to stdout for cargo.
    pub fn emit(&self) -> io::Result<()> {
        self.write_to(io::stdout().lock())
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}
