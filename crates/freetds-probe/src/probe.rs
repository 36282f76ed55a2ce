//! The FreeTDS probe.
//!
//! Resolution order:
//!
//! 1. explicit override (`FREETDS_INCLUDE_DIR`, `FREETDS_DIR`), which must
//!    be valid, there is no fallback past a bad override
//! 2. pkg-config module `freetds`
//! 3. configured extra prefixes, then [`default_prefixes`] for the target
//!
//! The first location holding both `sybdb.h` and `sybfront.h` wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{ENV_DIR, ENV_INCLUDE_DIR, ProbeConfig};
use crate::error::ProbeError;
use crate::headers::{has_headers, missing_headers};
use crate::installation::{Installation, ProbeSource};
use crate::layout::{
    Prefix, PrefixOrigin, default_prefixes, keg_version, lib_dirs_under, system_include_dirs,
};
use crate::library::{LIB_NAME, LinkKind, find_library, library_file_name};
use crate::pkgconfig::{PkgConfigLookup, SystemPkgConfig};
use crate::target::Target;

/// pkg-config module name queried for FreeTDS.
pub const PKG_CONFIG_MODULE: &str = "freetds";

/// Locates FreeTDS for one target.
#[derive(Debug, Clone)]
pub struct Probe {
    config: ProbeConfig,
    target: Target,
    pkg_config: Arc<dyn PkgConfigLookup>,
}

impl Probe {
    /// Create a probe that queries the system `pkg-config`.
    #[must_use]
    pub fn new(config: ProbeConfig, target: Target) -> Self {
        Self {
            config,
            target,
            pkg_config: Arc::new(SystemPkgConfig),
        }
    }

    /// Answer pkg-config queries with `lookup` instead of the system binary.
    #[must_use]
    pub fn with_pkg_config(mut self, lookup: impl PkgConfigLookup + 'static) -> Self {
        self.pkg_config = Arc::new(lookup);
        self
    }

    /// Create a probe for the current build script's target and environment.
    pub fn from_cargo_env() -> Result<Self, ProbeError> {
        Ok(Self::new(ProbeConfig::from_env(), Target::from_cargo_env()?))
    }

    /// The target being probed.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The probe configuration.
    #[must_use]
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Prefixes searched in step 3, in order.
    #[must_use]
    pub fn candidate_prefixes(&self) -> Vec<Prefix> {
        let mut prefixes: Vec<Prefix> = self
            .config
            .extra_prefixes
            .iter()
            .map(|root| Prefix::new(root.clone(), PrefixOrigin::Configured))
            .collect();
        if self.config.search_default_prefixes {
            prefixes.extend(default_prefixes(&self.target));
        }
        prefixes
    }

    /// Locate FreeTDS.
    pub fn run(&self) -> Result<Installation, ProbeError> {
        debug!(target_triple = %self.target, config = ?self.config, "probing for FreeTDS");

        if let Some(installation) = self.probe_override()? {
            return Ok(installation);
        }

        let mut searched = Vec::new();

        if self.config.use_pkg_config {
            if let Some(installation) = self.probe_pkg_config(&mut searched)? {
                return Ok(installation);
            }
        } else {
            debug!("pkg-config disabled");
        }

        for prefix in self.candidate_prefixes() {
            let include_dir = prefix.include_dir();
            if has_headers(&include_dir) {
                info!(
                    include_dir = %include_dir.display(),
                    origin = ?prefix.origin,
                    "found FreeTDS headers"
                );
                let lib_dirs = prefix.lib_dirs(&self.target);
                let version = keg_version(&prefix.root);
                return self.finish(
                    Some(include_dir),
                    Some(prefix.root),
                    lib_dirs,
                    ProbeSource::Prefix(prefix.origin),
                    version,
                );
            }
            debug!(include_dir = %include_dir.display(), "no FreeTDS headers");
            if !searched.contains(&include_dir) {
                searched.push(include_dir);
            }
        }

        warn!(target_triple = %self.target, "FreeTDS not found");
        Err(ProbeError::NotFound {
            target: self.target.to_string(),
            searched,
        })
    }

    fn probe_override(&self) -> Result<Option<Installation>, ProbeError> {
        let (var, include_dir) = match (&self.config.include_dir, &self.config.dir) {
            (Some(include_dir), _) => (ENV_INCLUDE_DIR, include_dir.clone()),
            (None, Some(dir)) => (ENV_DIR, dir.join("include")),
            (None, None) => return Ok(None),
        };

        let missing = missing_headers(&include_dir);
        if !missing.is_empty() {
            return Err(ProbeError::OverrideIncomplete {
                var,
                dir: include_dir,
                missing,
            });
        }

        let root = self
            .config
            .dir
            .clone()
            .or_else(|| include_dir.parent().map(Path::to_path_buf));
        let lib_dirs = root
            .as_deref()
            .map(|root| lib_dirs_under(root, &self.target))
            .unwrap_or_default();

        info!(var, include_dir = %include_dir.display(), "using configured FreeTDS location");
        self.finish(Some(include_dir), root, lib_dirs, ProbeSource::Override, None)
            .map(Some)
    }

    fn probe_pkg_config(
        &self,
        searched: &mut Vec<PathBuf>,
    ) -> Result<Option<Installation>, ProbeError> {
        let statik = self.config.link_kind == LinkKind::Static;
        let Some(library) = self.pkg_config.lookup(PKG_CONFIG_MODULE, statik) else {
            return Ok(None);
        };

        let include_dir = if library.include_paths.is_empty() {
            let system = system_include_dirs(&self.target);
            if !system.iter().any(|dir| has_headers(dir)) {
                searched.extend(system);
                return Ok(None);
            }
            None
        } else {
            match library.include_paths.iter().find(|dir| has_headers(dir)) {
                Some(dir) => Some(dir.clone()),
                None => {
                    warn!(
                        include_paths = ?library.include_paths,
                        "pkg-config include paths lack the DB-Library headers"
                    );
                    searched.extend(library.include_paths.iter().cloned());
                    return Ok(None);
                }
            }
        };

        info!(version = %library.version, "found FreeTDS through pkg-config");
        self.finish(
            include_dir,
            None,
            library.link_paths,
            ProbeSource::PkgConfig,
            Some(library.version),
        )
        .map(Some)
    }

    fn finish(
        &self,
        include_dir: Option<PathBuf>,
        root: Option<PathBuf>,
        lib_dirs: Vec<PathBuf>,
        source: ProbeSource,
        version: Option<String>,
    ) -> Result<Installation, ProbeError> {
        let kind = self.config.link_kind;
        let lib_dirs = match &self.config.lib_dir {
            Some(dir) => vec![dir.clone()],
            None => lib_dirs,
        };

        let library = find_library(&lib_dirs, &self.target, kind);
        let link_dirs = match &library {
            Some(path) => path.parent().map(Path::to_path_buf).into_iter().collect(),
            None if kind == LinkKind::Static => {
                return Err(ProbeError::StaticLibraryNotFound {
                    file: library_file_name(&self.target, kind),
                    searched: lib_dirs,
                });
            }
            None => {
                warn!(
                    file = %library_file_name(&self.target, kind),
                    "FreeTDS library not found next to headers, relying on the default linker path"
                );
                lib_dirs.into_iter().filter(|dir| dir.is_dir()).collect()
            }
        };

        Ok(Installation {
            include_dir,
            root,
            link_dirs,
            library,
            lib_name: LIB_NAME.to_string(),
            link_kind: kind,
            source,
            version,
        })
    }
}

/// Locate FreeTDS for the current build script.
///
/// Shorthand for [`Probe::from_cargo_env`] followed by [`Probe::run`].
pub fn probe() -> Result<Installation, ProbeError> {
    Probe::from_cargo_env()?.run()
}
