//! A located FreeTDS installation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::headers::REQUIRED_HEADERS;
use crate::layout::PrefixOrigin;
use crate::library::LinkKind;

/// How an installation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProbeSource {
    /// Explicit directory override.
    Override,
    /// pkg-config.
    PkgConfig,
    /// Prefix search.
    Prefix(PrefixOrigin),
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => f.write_str("override"),
            Self::PkgConfig => f.write_str("pkg-config"),
            Self::Prefix(PrefixOrigin::Homebrew) => f.write_str("homebrew"),
            Self::Prefix(PrefixOrigin::MacPorts) => f.write_str("macports"),
            Self::Prefix(PrefixOrigin::Linuxbrew) => f.write_str("linuxbrew"),
            Self::Prefix(PrefixOrigin::System) => f.write_str("system"),
            Self::Prefix(PrefixOrigin::Configured) => f.write_str("search path"),
        }
    }
}

/// Where the DB-Library headers and library live.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Installation {
    /// Directory holding `sybdb.h` and `sybfront.h`.
    ///
    /// `None` means the compiler's default include path already covers it.
    pub include_dir: Option<PathBuf>,
    /// Installation root, when known.
    pub root: Option<PathBuf>,
    /// Directories to add to the native library search path.
    pub link_dirs: Vec<PathBuf>,
    /// Full path of the library file, when it was found.
    pub library: Option<PathBuf>,
    /// Link name (`sybdb`).
    pub lib_name: String,
    /// How the library is linked.
    pub link_kind: LinkKind,
    /// How this installation was found.
    pub source: ProbeSource,
    /// FreeTDS version, when known.
    pub version: Option<String>,
}

impl Installation {
    /// Full path of a header in this installation.
    #[must_use]
    pub fn header_path(&self, name: &str) -> Option<PathBuf> {
        self.include_dir.as_deref().map(|dir| dir.join(name))
    }

    /// Full paths of the DB-Library headers, in inclusion order.
    #[must_use]
    pub fn headers(&self) -> Vec<PathBuf> {
        REQUIRED_HEADERS
            .iter()
            .filter_map(|name| self.header_path(name))
            .collect()
    }

    /// Include directory as a path, if one must be passed to the compiler.
    #[must_use]
    pub fn include_dir(&self) -> Option<&Path> {
        self.include_dir.as_deref()
    }
}
