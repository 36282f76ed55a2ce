//! Installation prefixes searched for FreeTDS.
//!
//! Homebrew installs FreeTDS as a keg under `<brew>/opt/freetds`, and the
//! Homebrew root differs by architecture on macOS:
//!
//! ```text
//! Apple x86_64      /usr/local/opt/freetds/include/{sybdb.h,sybfront.h}
//! Apple other arch  /opt/homebrew/opt/freetds/include/{sybdb.h,sybfront.h}
//! everything else   system include path (/usr/local, /usr)
//! ```
//!
//! [`default_prefixes`] turns that table into an ordered search list, adding
//! the broader package-manager roots (Homebrew itself, MacPorts, Linuxbrew)
//! after the keg.

use std::path::{Path, PathBuf};

use crate::target::{Target, TargetArch, TargetOs};

/// Homebrew keg for Intel macOS.
pub const HOMEBREW_INTEL_KEG: &str = "/usr/local/opt/freetds";

/// Homebrew keg for Apple Silicon macOS.
pub const HOMEBREW_ARM_KEG: &str = "/opt/homebrew/opt/freetds";

/// Linuxbrew keg.
pub const LINUXBREW_KEG: &str = "/home/linuxbrew/.linuxbrew/opt/freetds";

/// MacPorts root.
pub const MACPORTS_ROOT: &str = "/opt/local";

/// Where a prefix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PrefixOrigin {
    /// Homebrew keg or root.
    Homebrew,
    /// MacPorts.
    MacPorts,
    /// Homebrew on Linux.
    Linuxbrew,
    /// Default system location.
    System,
    /// Supplied through configuration (`FREETDS_SEARCH_PATH`).
    Configured,
}

/// An installation root with `include/` and `lib/` beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Prefix {
    /// Root directory.
    pub root: PathBuf,
    /// Where this prefix came from.
    pub origin: PrefixOrigin,
}

impl Prefix {
    /// Create a new prefix.
    pub fn new(root: impl Into<PathBuf>, origin: PrefixOrigin) -> Self {
        Self {
            root: root.into(),
            origin,
        }
    }

    /// Directory expected to hold `sybdb.h` and `sybfront.h`.
    #[must_use]
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Candidate library directories, most specific first.
    #[must_use]
    pub fn lib_dirs(&self, target: &Target) -> Vec<PathBuf> {
        lib_dirs_under(&self.root, target)
    }
}

/// Candidate library directories beneath an installation root.
#[must_use]
pub fn lib_dirs_under(root: &Path, target: &Target) -> Vec<PathBuf> {
    let lib = root.join("lib");
    let mut dirs = Vec::with_capacity(3);
    if let Some(tuple) = multiarch_tuple(target) {
        dirs.push(lib.join(tuple));
    }
    dirs.push(lib);
    dirs.push(root.join("lib64"));
    dirs
}

/// The Homebrew keg for an Apple target, `None` elsewhere.
///
/// Any Apple architecture other than `x86_64` maps to the Apple Silicon
/// location.
#[must_use]
pub fn homebrew_prefix(target: &Target) -> Option<Prefix> {
    if !target.is_apple() {
        return None;
    }
    let keg = match target.arch {
        TargetArch::X86_64 => HOMEBREW_INTEL_KEG,
        _ => HOMEBREW_ARM_KEG,
    };
    Some(Prefix::new(keg, PrefixOrigin::Homebrew))
}

/// Ordered list of prefixes to search for a target.
#[must_use]
pub fn default_prefixes(target: &Target) -> Vec<Prefix> {
    let mut prefixes = Vec::new();

    if let Some(keg) = homebrew_prefix(target) {
        let brew_root = keg
            .root
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        prefixes.push(keg);
        if let Some(root) = brew_root {
            prefixes.push(Prefix::new(root, PrefixOrigin::Homebrew));
        }
        prefixes.push(Prefix::new(MACPORTS_ROOT, PrefixOrigin::MacPorts));
        return prefixes;
    }

    match target.os {
        TargetOs::Windows => {}
        TargetOs::Linux => {
            prefixes.push(Prefix::new("/usr/local", PrefixOrigin::System));
            prefixes.push(Prefix::new("/usr", PrefixOrigin::System));
            prefixes.push(Prefix::new(LINUXBREW_KEG, PrefixOrigin::Linuxbrew));
        }
        _ => {
            prefixes.push(Prefix::new("/usr/local", PrefixOrigin::System));
            prefixes.push(Prefix::new("/usr", PrefixOrigin::System));
        }
    }
    prefixes
}

/// Version of a Homebrew keg, read from its `Cellar/freetds/<version>` link target.
///
/// Returns `None` when `keg` is not a symlink into a `freetds` cellar.
#[must_use]
pub fn keg_version(keg: &Path) -> Option<String> {
    let resolved = keg.canonicalize().ok()?;
    if resolved == keg {
        return None;
    }
    let parent = resolved.parent()?.file_name()?;
    if parent != "freetds" {
        return None;
    }
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Include directories a C compiler searches without `-I` flags.
#[must_use]
pub fn system_include_dirs(target: &Target) -> Vec<PathBuf> {
    match target.os {
        TargetOs::Windows => Vec::new(),
        _ => vec![
            PathBuf::from("/usr/local/include"),
            PathBuf::from("/usr/include"),
        ],
    }
}

/// Debian multiarch directory name for Linux targets.
#[must_use]
pub fn multiarch_tuple(target: &Target) -> Option<&'static str> {
    if target.os != TargetOs::Linux {
        return None;
    }
    match target.arch {
        TargetArch::X86_64 => Some("x86_64-linux-gnu"),
        TargetArch::Aarch64 => Some("aarch64-linux-gnu"),
        TargetArch::X86 => Some("i386-linux-gnu"),
        TargetArch::Arm => Some("arm-linux-gnueabihf"),
        TargetArch::Other(_) => None,
    }
}
