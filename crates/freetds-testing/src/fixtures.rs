//! Throwaway FreeTDS install trees.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Stub contents written for `sybdb.h`.
pub const SYBDB_H: &str = "#ifndef SYBDB_h\n#define SYBDB_h\n#define SUCCEED 1\n#define FAIL 0\n#endif\n";

/// Stub contents written for `sybfront.h`.
pub const SYBFRONT_H: &str = "#ifndef SYBFRONT_h\n#define SYBFRONT_h\n#include \"sybdb.h\"\n#endif\n";

/// Errors that can occur while building a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error while creating the tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directory tree that looks like a FreeTDS installation.
///
/// The tree lives under the system temp directory and is removed on drop.
///
/// ```text
/// <root>/<prefix>/include/sybdb.h
/// <root>/<prefix>/include/sybfront.h
/// <root>/<prefix>/lib/libsybdb.so
/// ```
///
/// A Homebrew-style keg makes `<prefix>` a symlink to
/// `<root>/Cellar/freetds/<version>`.
#[derive(Debug)]
pub struct FakeInstallation {
    root: PathBuf,
}

impl FakeInstallation {
    /// Start describing a fake installation.
    #[must_use]
    pub fn builder() -> FakeInstallationBuilder {
        FakeInstallationBuilder::default()
    }

    /// A prefix with both headers and a shared library in `lib/`.
    pub fn complete(lib_file: &str) -> Result<Self, FixtureError> {
        Self::builder().with_headers().with_library("lib", lib_file).build()
    }

    /// Scratch root containing the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installation prefix (`<root>/freetds`).
    #[must_use]
    pub fn prefix(&self) -> PathBuf {
        self.root.join("freetds")
    }

    /// Include directory of the prefix.
    #[must_use]
    pub fn include_dir(&self) -> PathBuf {
        self.prefix().join("include")
    }

    /// A named library directory of the prefix.
    #[must_use]
    pub fn lib_dir(&self, name: &str) -> PathBuf {
        self.prefix().join(name)
    }
}

impl Drop for FakeInstallation {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.root) {
            tracing::debug!(root = %self.root.display(), error = %err, "failed to remove fixture");
        }
    }
}

/// Builder for [`FakeInstallation`].
#[derive(Debug, Default, Clone)]
pub struct FakeInstallationBuilder {
    headers: Vec<&'static str>,
    libraries: Vec<(String, String)>,
    extra_dirs: Vec<String>,
    keg_version: Option<String>,
}

impl FakeInstallationBuilder {
    /// Write both `sybdb.h` and `sybfront.h`.
    #[must_use]
    pub fn with_headers(mut self) -> Self {
        self.headers = vec!["sybdb.h", "sybfront.h"];
        self
    }

    /// Write a single header only.
    #[must_use]
    pub fn with_header(mut self, name: &'static str) -> Self {
        self.headers.push(name);
        self
    }

    /// Write an empty library file at `<prefix>/<dir>/<file>`.
    #[must_use]
    pub fn with_library(mut self, dir: impl Into<String>, file: impl Into<String>) -> Self {
        self.libraries.push((dir.into(), file.into()));
        self
    }

    /// Create an empty directory under the prefix.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    /// Lay the prefix out as a Homebrew keg linked to `Cellar/freetds/<version>`.
    #[cfg(unix)]
    #[must_use]
    pub fn with_keg_version(mut self, version: impl Into<String>) -> Self {
        self.keg_version = Some(version.into());
        self
    }

    /// Create the tree.
    pub fn build(self) -> Result<FakeInstallation, FixtureError> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "freetds-fixture-{}-{id}",
            std::process::id()
        ));
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        let installation = FakeInstallation { root };

        if let Some(version) = &self.keg_version {
            link_keg(&installation, version)?;
        }

        let include_dir = installation.include_dir();
        fs::create_dir_all(&include_dir)?;
        for name in &self.headers {
            let contents = match *name {
                "sybdb.h" => SYBDB_H,
                "sybfront.h" => SYBFRONT_H,
                _ => "",
            };
            fs::write(include_dir.join(name), contents)?;
        }

        for dir in &self.extra_dirs {
            fs::create_dir_all(installation.lib_dir(dir))?;
        }

        for (dir, file) in &self.libraries {
            let lib_dir = installation.lib_dir(dir);
            fs::create_dir_all(&lib_dir)?;
            fs::write(lib_dir.join(file), b"")?;
        }

        Ok(installation)
    }
}

#[cfg(unix)]
fn link_keg(installation: &FakeInstallation, version: &str) -> Result<(), FixtureError> {
    let cellar = installation.root.join("Cellar").join("freetds").join(version);
    fs::create_dir_all(&cellar)?;
    std::os::unix::fs::symlink(
        Path::new("Cellar").join("freetds").join(version),
        installation.prefix(),
    )?;
    Ok(())
}

#[cfg(not(unix))]
fn link_keg(_installation: &FakeInstallation, _version: &str) -> Result<(), FixtureError> {
    Ok(())
}
