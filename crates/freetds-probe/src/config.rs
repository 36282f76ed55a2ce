//! Probe configuration.
//!
//! Configuration normally comes from `FREETDS_*` environment variables read
//! by the build script, but every option also has a builder method so tests
//! and tools can construct a config directly.

use std::path::PathBuf;

use crate::library::LinkKind;

/// Install prefix override (`include/` and `lib/` beneath it).
pub const ENV_DIR: &str = "FREETDS_DIR";
/// Include directory override.
pub const ENV_INCLUDE_DIR: &str = "FREETDS_INCLUDE_DIR";
/// Library directory override.
pub const ENV_LIB_DIR: &str = "FREETDS_LIB_DIR";
/// Request static linking.
pub const ENV_STATIC: &str = "FREETDS_STATIC";
/// Disable the pkg-config step.
pub const ENV_NO_PKG_CONFIG: &str = "FREETDS_NO_PKG_CONFIG";
/// Extra prefixes searched before the defaults.
pub const ENV_SEARCH_PATH: &str = "FREETDS_SEARCH_PATH";

/// Configuration for a FreeTDS probe.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Install prefix override.
    pub dir: Option<PathBuf>,
    /// Include directory override. Takes precedence over `dir`.
    pub include_dir: Option<PathBuf>,
    /// Library directory override. Takes precedence over `dir`.
    pub lib_dir: Option<PathBuf>,
    /// How to link the native library.
    pub link_kind: LinkKind,
    /// Whether to ask pkg-config before searching prefixes.
    pub use_pkg_config: bool,
    /// Prefixes searched before the built-in ones.
    pub extra_prefixes: Vec<PathBuf>,
    /// Whether to search the built-in prefixes at all.
    pub search_default_prefixes: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            dir: None,
            include_dir: None,
            lib_dir: None,
            link_kind: LinkKind::Dynamic,
            use_pkg_config: true,
            extra_prefixes: Vec::new(),
            search_default_prefixes: true,
        }
    }
}

impl ProbeConfig {
    /// Every environment variable that influences the probe.
    pub const ENV_VARS: [&'static str; 6] = [
        ENV_DIR,
        ENV_INCLUDE_DIR,
        ENV_LIB_DIR,
        ENV_STATIC,
        ENV_NO_PKG_CONFIG,
        ENV_SEARCH_PATH,
    ];

    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let link_kind = if get(ENV_STATIC).is_some_and(|v| is_truthy(&v)) {
            LinkKind::Static
        } else {
            LinkKind::Dynamic
        };
        let extra_prefixes = get(ENV_SEARCH_PATH)
            .map(|paths| {
                std::env::split_paths(&paths)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            dir: get(ENV_DIR).map(PathBuf::from),
            include_dir: get(ENV_INCLUDE_DIR).map(PathBuf::from),
            lib_dir: get(ENV_LIB_DIR).map(PathBuf::from),
            link_kind,
            use_pkg_config: !get(ENV_NO_PKG_CONFIG).is_some_and(|v| is_truthy(&v)),
            extra_prefixes,
            search_default_prefixes: true,
        }
    }

    /// Set the install prefix override.
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Set the include directory override.
    #[must_use]
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }

    /// Set the library directory override.
    #[must_use]
    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = Some(dir.into());
        self
    }

    /// Set the link kind.
    #[must_use]
    pub fn link_kind(mut self, kind: LinkKind) -> Self {
        self.link_kind = kind;
        self
    }

    /// Enable or disable pkg-config.
    #[must_use]
    pub fn use_pkg_config(mut self, enabled: bool) -> Self {
        self.use_pkg_config = enabled;
        self
    }

    /// Add a prefix searched before the built-in ones.
    #[must_use]
    pub fn add_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.extra_prefixes.push(prefix.into());
        self
    }

    /// Enable or disable the built-in prefix list.
    #[must_use]
    pub fn search_default_prefixes(mut self, enabled: bool) -> Self {
        self.search_default_prefixes = enabled;
        self
    }

    /// Check if any directory override is configured.
    #[must_use]
    pub fn has_override(&self) -> bool {
        self.dir.is_some() || self.include_dir.is_some()
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
