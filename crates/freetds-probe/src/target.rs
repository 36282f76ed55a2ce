//! Build target description.
//!
//! The search layout depends only on the operating system and CPU
//! architecture of the *target*, not the host running the build. Inside a
//! build script both come from cargo's `CARGO_CFG_TARGET_*` variables.

use std::fmt;

use crate::error::ProbeError;

/// Target operating system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TargetOs {
    /// macOS.
    MacOs,
    /// iOS.
    Ios,
    /// Linux (any libc).
    Linux,
    /// FreeBSD.
    FreeBsd,
    /// NetBSD.
    NetBsd,
    /// OpenBSD.
    OpenBsd,
    /// Windows.
    Windows,
    /// Anything else, as spelled by cargo.
    Other(String),
}

impl TargetOs {
    /// Parse cargo's `target_os` value.
    #[must_use]
    pub fn from_cfg(value: &str) -> Self {
        match value {
            "macos" | "darwin" => Self::MacOs,
            "ios" => Self::Ios,
            "linux" => Self::Linux,
            "freebsd" => Self::FreeBsd,
            "netbsd" => Self::NetBsd,
            "openbsd" => Self::OpenBsd,
            "windows" => Self::Windows,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if this is an Apple platform.
    #[must_use]
    pub fn is_apple(&self) -> bool {
        matches!(self, Self::MacOs | Self::Ios)
    }

    /// Check if this is a BSD.
    #[must_use]
    pub fn is_bsd(&self) -> bool {
        matches!(self, Self::FreeBsd | Self::NetBsd | Self::OpenBsd)
    }

    /// Name as cargo spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MacOs => "macos",
            Self::Ios => "ios",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::NetBsd => "netbsd",
            Self::OpenBsd => "openbsd",
            Self::Windows => "windows",
            Self::Other(name) => name,
        }
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TargetArch {
    /// 64-bit x86 (Intel Macs).
    X86_64,
    /// 64-bit ARM (Apple Silicon).
    Aarch64,
    /// 32-bit x86.
    X86,
    /// 32-bit ARM.
    Arm,
    /// Anything else, as spelled by cargo.
    Other(String),
}

impl TargetArch {
    /// Parse cargo's `target_arch` value or the first component of a triple.
    #[must_use]
    pub fn from_cfg(value: &str) -> Self {
        match value {
            "x86_64" | "x86_64h" | "amd64" => Self::X86_64,
            "aarch64" | "arm64" => Self::Aarch64,
            "x86" | "i386" | "i586" | "i686" => Self::X86,
            v if v.starts_with("arm") || v.starts_with("thumb") => Self::Arm,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name as cargo spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::X86 => "x86",
            Self::Arm => "arm",
            Self::Other(name) => name,
        }
    }
}

/// The (operating system, architecture) pair the probe resolves against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Target {
    /// Operating system.
    pub os: TargetOs,
    /// CPU architecture.
    pub arch: TargetArch,
}

impl Target {
    /// Create a target from its parts.
    #[must_use]
    pub fn new(os: TargetOs, arch: TargetArch) -> Self {
        Self { os, arch }
    }

    /// Target of the current build script, from cargo's environment.
    pub fn from_cargo_env() -> Result<Self, ProbeError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Target from an arbitrary variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ProbeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let os = lookup("CARGO_CFG_TARGET_OS").ok_or(ProbeError::MissingEnv("CARGO_CFG_TARGET_OS"))?;
        let arch =
            lookup("CARGO_CFG_TARGET_ARCH").ok_or(ProbeError::MissingEnv("CARGO_CFG_TARGET_ARCH"))?;
        Ok(Self::new(TargetOs::from_cfg(&os), TargetArch::from_cfg(&arch)))
    }

    /// Parse a target triple such as `aarch64-apple-darwin`.
    pub fn from_triple(triple: &str) -> Result<Self, ProbeError> {
        let parts: Vec<&str> = triple.trim().split('-').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(ProbeError::InvalidTarget(triple.to_string()));
        }

        let arch = TargetArch::from_cfg(parts[0]);
        let rest = &parts[1..];
        let os = if rest.contains(&"darwin") || rest.contains(&"macos") {
            TargetOs::MacOs
        } else if rest.contains(&"ios") {
            TargetOs::Ios
        } else if rest.contains(&"linux") {
            TargetOs::Linux
        } else if rest.contains(&"windows") {
            TargetOs::Windows
        } else if let Some(os) = rest
            .iter()
            .map(|p| TargetOs::from_cfg(p))
            .find(|os| !matches!(os, TargetOs::Other(_)))
        {
            os
        } else {
            // arch-vendor-os or arch-os; the OS is the last non-env component
            let os = if rest.len() >= 2 { rest[1] } else { rest[0] };
            TargetOs::Other(os.to_string())
        };

        Ok(Self::new(os, arch))
    }

    /// Target of the host this code was compiled for.
    #[must_use]
    pub fn host() -> Self {
        Self::new(
            TargetOs::from_cfg(std::env::consts::OS),
            TargetArch::from_cfg(std::env::consts::ARCH),
        )
    }

    /// Check if this is an Apple target.
    #[must_use]
    pub fn is_apple(&self) -> bool {
        self.os.is_apple()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch.as_str(), self.os.as_str())
    }
}
