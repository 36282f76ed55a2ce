//! # freetds-testing
//!
//! Test infrastructure for FreeTDS discovery.
//!
//! Probing touches the real filesystem, so tests build small fake
//! installation trees instead of depending on whatever the machine has
//! installed.
//!
//! ## Example
//!
//! ```rust,ignore
//! use freetds_testing::FakeInstallation;
//!
//! let fake = FakeInstallation::builder()
//!     .with_headers()
//!     .with_library("lib", "libsybdb.so")
//!     .build()
//!     .unwrap();
//!
//! // point the probe at fake.prefix()
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;

pub use fixtures::{FakeInstallation, FakeInstallationBuilder, FixtureError};
