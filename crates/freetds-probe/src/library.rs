//! Native library naming and lookup.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::target::{Target, TargetOs};

/// Link name of the DB-Library implementation.
pub const LIB_NAME: &str = "sybdb";

/// How the native library is linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LinkKind {
    /// Shared library.
    #[default]
    Dynamic,
    /// Static archive.
    Static,
}

impl LinkKind {
    /// Kind as written in `cargo:rustc-link-lib=<kind>=<name>`.
    #[must_use]
    pub fn as_cargo_str(self) -> &'static str {
        match self {
            Self::Dynamic => "dylib",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cargo_str())
    }
}

/// File name the linker looks for.
#[must_use]
pub fn library_file_name(target: &Target, kind: LinkKind) -> String {
    match (&target.os, kind) {
        (TargetOs::Windows, _) => format!("{LIB_NAME}.lib"),
        (_, LinkKind::Static) => format!("lib{LIB_NAME}.a"),
        (os, LinkKind::Dynamic) if os.is_apple() => format!("lib{LIB_NAME}.dylib"),
        (_, LinkKind::Dynamic) => format!("lib{LIB_NAME}.so"),
    }
}

/// First directory in `dirs` containing the library, as a full path.
#[must_use]
pub fn find_library<P: AsRef<Path>>(dirs: &[P], target: &Target, kind: LinkKind) -> Option<PathBuf> {
    let file = library_file_name(target, kind);
    dirs.iter()
        .map(|dir| dir.as_ref().join(&file))
        .find(|path| path.is_file())
}
