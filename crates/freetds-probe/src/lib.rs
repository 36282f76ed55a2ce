//! # freetds-probe
//!
//! Build-time discovery of the FreeTDS DB-Library (`sybdb.h`, `sybfront.h`,
//! `libsybdb`).
//!
//! FreeTDS is usually installed by a package manager, and where it lands
//! depends on the platform. On macOS, Homebrew uses `/usr/local` on Intel and
//! `/opt/homebrew` on Apple Silicon; elsewhere the headers normally sit on
//! the compiler's default include path. This crate searches those locations
//! (plus pkg-config and user overrides) and turns the result into cargo
//! directives and a forwarding header.
//!
//! ## Configuration
//!
//! | Variable                | Effect                                            |
//! |-------------------------|---------------------------------------------------|
//! | `FREETDS_DIR`           | install prefix override                           |
//! | `FREETDS_INCLUDE_DIR`   | include directory override                        |
//! | `FREETDS_LIB_DIR`       | library directory override                        |
//! | `FREETDS_STATIC`        | link `libsybdb.a` instead of the shared library   |
//! | `FREETDS_NO_PKG_CONFIG` | skip pkg-config                                   |
//! | `FREETDS_SEARCH_PATH`   | extra prefixes, searched before the defaults      |
//!
//! ## Example
//!
//! ```rust,ignore
//! // build.rs
//! use freetds_probe::{CargoDirectives, ProbeConfig, UmbrellaHeader};
//!
//! fn main() {
//!     let installation = freetds_probe::probe().unwrap();
//!     CargoDirectives::for_installation(&installation)
//!         .rerun_if_env_changed(ProbeConfig::ENV_VARS)
//!         .emit()
//!         .unwrap();
//!     let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
//!     UmbrellaHeader::for_installation(&installation)
//!         .write_to_dir(&out_dir)
//!         .unwrap();
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cargo;
pub mod config;
pub mod error;
pub mod headers;
pub mod installation;
pub mod layout;
pub mod library;
pub mod pkgconfig;
pub mod probe;
pub mod shim;
pub mod target;

pub use cargo::CargoDirectives;
pub use config::ProbeConfig;
pub use error::ProbeError;
pub use headers::REQUIRED_HEADERS;
pub use installation::{Installation, ProbeSource};
pub use layout::{Prefix, PrefixOrigin, default_prefixes, homebrew_prefix, keg_version};
pub use library::{LIB_NAME, LinkKind};
pub use pkgconfig::{FixedPkgConfig, PkgConfigLibrary, PkgConfigLookup, SystemPkgConfig};
pub use probe::{Probe, probe};
pub use shim::{UMBRELLA_FILE_NAME, UmbrellaHeader};
pub use target::{Target, TargetArch, TargetOs};
