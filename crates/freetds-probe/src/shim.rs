//! Generated umbrella header.
//!
//! C consumers (bindgen, `cc`) include `cfreetds.h` instead of hard-coding
//! a Homebrew path. The header forwards to the located `sybdb.h` and
//! `sybfront.h`, or to `<sybdb.h>`/`<sybfront.h>` when they sit on the
//! compiler's default include path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ProbeError;
use crate::headers::REQUIRED_HEADERS;
use crate::installation::Installation;

/// File name of the generated header.
pub const UMBRELLA_FILE_NAME: &str = "cfreetds.h";

const GUARD: &str = "CFREETDS_H";

/// The rendered umbrella header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmbrellaHeader {
    contents: String,
}

impl UmbrellaHeader {
    /// Render the header for an installation.
    #[must_use]
    pub fn for_installation(installation: &Installation) -> Self {
        Self::for_include_dir(installation.include_dir())
    }

    /// Render the header for an include directory, or the default path when `None`.
    #[must_use]
    pub fn for_include_dir(include_dir: Option<&Path>) -> Self {
        let mut contents = String::new();
        contents.push_str("/* Generated by freetds-probe. Do not edit. */\n");
        contents.push_str(&format!("#ifndef {GUARD}\n#define {GUARD}\n\n#pragma once\n\n"));
        for name in REQUIRED_HEADERS {
            let line = match include_dir {
                Some(dir) => format!("#include \"{}\"\n", c_path(&dir.join(name))),
                None => format!("#include <{name}>\n"),
            };
            contents.push_str(&line);
        }
        contents.push_str(&format!("\n#endif /* {GUARD} */\n"));
        Self { contents }
    }

    /// Header text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Write `cfreetds.h` into `dir`, returning its path.
    ///
    /// The file is left untouched when its contents are already current, so
    /// dependents keyed on its mtime are not rebuilt.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ProbeError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(UMBRELLA_FILE_NAME);
        if fs::read_to_string(&path).is_ok_and(|existing| existing == self.contents) {
            return Ok(path);
        }
        fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Path as a C string literal body: forward slashes, quotes escaped.
fn c_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('"', "\\\"")
}
