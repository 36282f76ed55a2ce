//! pkg-config lookups.
//!
//! The probe asks a [`PkgConfigLookup`] for the `freetds` module instead of
//! calling the `pkg-config` crate directly, so the answer can be replaced
//! with a fixed one.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

/// What pkg-config reported for a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PkgConfigLibrary {
    /// `-I` directories from `Cflags`. Empty when the headers sit on the
    /// compiler's default path.
    pub include_paths: Vec<PathBuf>,
    /// `-L` directories from `Libs`.
    pub link_paths: Vec<PathBuf>,
    /// Module version.
    pub version: String,
}

impl From<pkg_config::Library> for PkgConfigLibrary {
    fn from(library: pkg_config::Library) -> Self {
        Self {
            include_paths: library.include_paths,
            link_paths: library.link_paths,
            version: library.version,
        }
    }
}

/// Answers pkg-config queries.
pub trait PkgConfigLookup: fmt::Debug + Send + Sync {
    /// Look up `module`. `statik` asks for the flags needed to link it
    /// statically. `None` means the module is unknown or pkg-config is
    /// unavailable.
    fn lookup(&self, module: &str, statik: bool) -> Option<PkgConfigLibrary>;
}

/// Runs the system `pkg-config` binary.
///
/// Honors `PKG_CONFIG_PATH`, `PKG_CONFIG_LIBDIR` and `PKG_CONFIG_SYSROOT_DIR`.
/// Nothing is printed to cargo; the probe decides what to emit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPkgConfig;

impl PkgConfigLookup for SystemPkgConfig {
    fn lookup(&self, module: &str, statik: bool) -> Option<PkgConfigLibrary> {
        match pkg_config::Config::new()
            .cargo_metadata(false)
            .env_metadata(false)
            .print_system_libs(false)
            .statik(statik)
            .probe(module)
        {
            Ok(library) => Some(library.into()),
            Err(err) => {
                debug!(error = %err, "pkg-config did not find {module}");
                None
            }
        }
    }
}

/// A lookup that always returns the same answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedPkgConfig(pub Option<PkgConfigLibrary>);

impl PkgConfigLookup for FixedPkgConfig {
    fn lookup(&self, module: &str, _statik: bool) -> Option<PkgConfigLibrary> {
        if self.0.is_none() {
            debug!("no pkg-config answer for {module}");
        }
        self.0.clone()
    }
}
