//! Probe behaviour against fake installation trees.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::path::PathBuf;

use freetds_probe::{
    CargoDirectives, FixedPkgConfig, Installation, LinkKind, PkgConfigLibrary, PrefixOrigin,
    Probe, ProbeConfig, ProbeError, ProbeSource, Target, TargetArch, TargetOs, UmbrellaHeader,
    keg_version,
};
use freetds_testing::FakeInstallation;

fn linux() -> Target {
    Target::new(TargetOs::Linux, TargetArch::X86_64)
}

/// Config that only looks where the test tells it to.
fn isolated() -> ProbeConfig {
    ProbeConfig::new()
        .use_pkg_config(false)
        .search_default_prefixes(false)
}

fn run(config: ProbeConfig, target: Target) -> Result<Installation, ProbeError> {
    Probe::new(config, target).run()
}

/// Run with pkg-config enabled and answering `library`.
fn run_with_pkg_config(
    config: ProbeConfig,
    target: Target,
    library: PkgConfigLibrary,
) -> Result<Installation, ProbeError> {
    Probe::new(config.use_pkg_config(true), target)
        .with_pkg_config(FixedPkgConfig(Some(library)))
        .run()
}

fn pkg_config_library(include_paths: Vec<PathBuf>, link_paths: Vec<PathBuf>) -> PkgConfigLibrary {
    PkgConfigLibrary {
        include_paths,
        link_paths,
        version: "1.4.10".to_string(),
    }
}

// ============================================================================
// Prefix Search
// ============================================================================

#[test]
fn test_finds_configured_prefix() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();

    assert_eq!(install.include_dir, Some(fake.include_dir()));
    assert_eq!(install.root, Some(fake.prefix()));
    assert_eq!(install.source, ProbeSource::Prefix(PrefixOrigin::Configured));
    assert_eq!(
        install.library,
        Some(fake.lib_dir("lib").join("libsybdb.so"))
    );
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib")]);
    assert_eq!(install.lib_name, "sybdb");
    assert_eq!(install.link_kind, LinkKind::Dynamic);
}

#[test]
fn test_first_matching_prefix_wins() {
    let empty = FakeInstallation::builder().build().unwrap();
    let first = FakeInstallation::complete("libsybdb.so").unwrap();
    let second = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run(
        isolated()
            .add_prefix(empty.prefix())
            .add_prefix(first.prefix())
            .add_prefix(second.prefix()),
        linux(),
    )
    .unwrap();
    assert_eq!(install.include_dir, Some(first.include_dir()));
}

#[test]
fn test_missing_header_is_not_found() {
    let fake = FakeInstallation::builder()
        .with_header("sybfront.h")
        .with_library("lib", "libsybdb.so")
        .build()
        .unwrap();

    let err = run(isolated().add_prefix(fake.prefix()), linux()).unwrap_err();
    match err {
        ProbeError::NotFound { target, searched } => {
            assert_eq!(target, "x86_64-linux");
            assert_eq!(searched, vec![fake.include_dir()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_multiarch_library_dir_preferred() {
    let fake = FakeInstallation::builder()
        .with_headers()
        .with_library("lib/x86_64-linux-gnu", "libsybdb.so")
        .with_library("lib", "libsybdb.so")
        .build()
        .unwrap();

    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib/x86_64-linux-gnu")]);
}

#[test]
fn test_lib64_fallback() {
    let fake = FakeInstallation::builder()
        .with_headers()
        .with_library("lib64", "libsybdb.so")
        .build()
        .unwrap();

    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib64")]);
}

#[test]
fn test_apple_target_looks_for_dylib() {
    let fake = FakeInstallation::complete("libsybdb.dylib").unwrap();
    let mac = Target::new(TargetOs::MacOs, TargetArch::Aarch64);

    let install = run(isolated().add_prefix(fake.prefix()), mac).unwrap();
    assert_eq!(
        install.library,
        Some(fake.lib_dir("lib").join("libsybdb.dylib"))
    );
}

#[cfg(unix)]
#[test]
fn test_keg_version_read_from_cellar_link() {
    let fake = FakeInstallation::builder()
        .with_headers()
        .with_library("lib", "libsybdb.dylib")
        .with_keg_version("1.4.10")
        .build()
        .unwrap();
    assert_eq!(keg_version(&fake.prefix()).as_deref(), Some("1.4.10"));

    let mac = Target::new(TargetOs::MacOs, TargetArch::X86_64);
    let install = run(isolated().add_prefix(fake.prefix()), mac).unwrap();
    assert_eq!(install.version.as_deref(), Some("1.4.10"));
    assert!(
        CargoDirectives::for_installation(&install)
            .lines()
            .contains(&"cargo:version=1.4.10".to_string())
    );
}

#[test]
fn test_plain_prefix_has_no_version() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    assert!(keg_version(&fake.prefix()).is_none());

    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();
    assert!(install.version.is_none());
}

// ============================================================================
// Library Resolution
// ============================================================================

#[test]
fn test_dynamic_without_library_uses_default_linker_path() {
    let fake = FakeInstallation::builder().with_headers().build().unwrap();

    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();
    assert!(install.library.is_none());
    assert!(install.link_dirs.is_empty());
}

#[test]
fn test_dynamic_without_library_keeps_existing_lib_dir() {
    let fake = FakeInstallation::builder()
        .with_headers()
        .with_dir("lib")
        .build()
        .unwrap();

    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();
    assert!(install.library.is_none());
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib")]);
}

#[test]
fn test_static_requires_archive() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();

    let err = run(
        isolated()
            .add_prefix(fake.prefix())
            .link_kind(LinkKind::Static),
        linux(),
    )
    .unwrap_err();
    match err {
        ProbeError::StaticLibraryNotFound { file, searched } => {
            assert_eq!(file, "libsybdb.a");
            assert!(searched.contains(&fake.lib_dir("lib")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_static_with_archive() {
    let fake = FakeInstallation::complete("libsybdb.a").unwrap();

    let install = run(
        isolated()
            .add_prefix(fake.prefix())
            .link_kind(LinkKind::Static),
        linux(),
    )
    .unwrap();
    assert_eq!(install.link_kind, LinkKind::Static);
    assert_eq!(install.library, Some(fake.lib_dir("lib").join("libsybdb.a")));
}

#[test]
fn test_lib_dir_override_applies_to_search_results() {
    let headers = FakeInstallation::builder().with_headers().build().unwrap();
    let libs = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run(
        isolated()
            .add_prefix(headers.prefix())
            .lib_dir(libs.lib_dir("lib")),
        linux(),
    )
    .unwrap();
    assert_eq!(install.include_dir, Some(headers.include_dir()));
    assert_eq!(install.link_dirs, vec![libs.lib_dir("lib")]);
}

// ============================================================================
// pkg-config
// ============================================================================

#[test]
fn test_pkg_config_include_path_accepted() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    let bare = FakeInstallation::builder().build().unwrap();

    let install = run_with_pkg_config(
        isolated(),
        linux(),
        pkg_config_library(
            vec![bare.include_dir(), fake.include_dir()],
            vec![fake.lib_dir("lib")],
        ),
    )
    .unwrap();
    assert_eq!(install.source, ProbeSource::PkgConfig);
    assert_eq!(install.include_dir, Some(fake.include_dir()));
    assert_eq!(install.root, None);
    assert_eq!(
        install.library,
        Some(fake.lib_dir("lib").join("libsybdb.so"))
    );
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib")]);
    assert_eq!(install.version.as_deref(), Some("1.4.10"));
}

#[test]
fn test_pkg_config_takes_precedence_over_prefixes() {
    let reported = FakeInstallation::complete("libsybdb.so").unwrap();
    let prefix = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run_with_pkg_config(
        isolated().add_prefix(prefix.prefix()),
        linux(),
        pkg_config_library(vec![reported.include_dir()], vec![reported.lib_dir("lib")]),
    )
    .unwrap();
    assert_eq!(install.include_dir, Some(reported.include_dir()));
}

#[test]
fn test_pkg_config_include_paths_without_headers_fall_through() {
    let reported = FakeInstallation::builder()
        .with_header("sybfront.h")
        .build()
        .unwrap();
    let prefix = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run_with_pkg_config(
        isolated().add_prefix(prefix.prefix()),
        linux(),
        pkg_config_library(vec![reported.include_dir()], Vec::new()),
    )
    .unwrap();
    assert_eq!(install.source, ProbeSource::Prefix(PrefixOrigin::Configured));
    assert_eq!(install.include_dir, Some(prefix.include_dir()));
}

#[test]
fn test_pkg_config_include_paths_listed_when_not_found() {
    let reported = FakeInstallation::builder().build().unwrap();

    let err = run_with_pkg_config(
        isolated(),
        linux(),
        pkg_config_library(vec![reported.include_dir()], Vec::new()),
    )
    .unwrap_err();
    match err {
        ProbeError::NotFound { searched, .. } => {
            assert_eq!(searched, vec![reported.include_dir()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_pkg_config_without_include_paths_needs_system_headers() {
    // no system include dirs are known for Windows, so nothing can vouch for the headers
    let fake = FakeInstallation::complete("sybdb.lib").unwrap();
    let windows = Target::new(TargetOs::Windows, TargetArch::X86_64);

    let err = run_with_pkg_config(
        isolated(),
        windows,
        pkg_config_library(Vec::new(), vec![fake.lib_dir("lib")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ProbeError::NotFound { ref searched, .. } if searched.is_empty()
    ));
}

#[test]
fn test_pkg_config_static_requires_archive() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();

    let err = run_with_pkg_config(
        isolated().link_kind(LinkKind::Static),
        linux(),
        pkg_config_library(vec![fake.include_dir()], vec![fake.lib_dir("lib")]),
    )
    .unwrap_err();
    match err {
        ProbeError::StaticLibraryNotFound { file, searched } => {
            assert_eq!(file, "libsybdb.a");
            assert_eq!(searched, vec![fake.lib_dir("lib")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_pkg_config_static_with_archive() {
    let fake = FakeInstallation::complete("libsybdb.a").unwrap();

    let install = run_with_pkg_config(
        isolated().link_kind(LinkKind::Static),
        linux(),
        pkg_config_library(vec![fake.include_dir()], vec![fake.lib_dir("lib")]),
    )
    .unwrap();
    assert_eq!(install.link_kind, LinkKind::Static);
    assert_eq!(install.library, Some(fake.lib_dir("lib").join("libsybdb.a")));
}

#[test]
fn test_pkg_config_lib_dir_override_used_for_lookup() {
    let reported = FakeInstallation::complete("libsybdb.so").unwrap();
    let libs = FakeInstallation::builder()
        .with_library("lib", "libsybdb.so")
        .build()
        .unwrap();

    let install = run_with_pkg_config(
        isolated().lib_dir(libs.lib_dir("lib")),
        linux(),
        pkg_config_library(vec![reported.include_dir()], vec![reported.lib_dir("lib")]),
    )
    .unwrap();
    assert_eq!(install.include_dir, Some(reported.include_dir()));
    assert_eq!(install.link_dirs, vec![libs.lib_dir("lib")]);
    assert_eq!(install.library, Some(libs.lib_dir("lib").join("libsybdb.so")));
}

#[test]
fn test_pkg_config_lib_dir_override_static_missing_archive() {
    let reported = FakeInstallation::complete("libsybdb.a").unwrap();
    let libs = FakeInstallation::builder().with_dir("lib").build().unwrap();

    let err = run_with_pkg_config(
        isolated()
            .lib_dir(libs.lib_dir("lib"))
            .link_kind(LinkKind::Static),
        linux(),
        pkg_config_library(vec![reported.include_dir()], vec![reported.lib_dir("lib")]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ProbeError::StaticLibraryNotFound { ref searched, .. } if searched == &vec![libs.lib_dir("lib")]
    ));
}

#[test]
fn test_pkg_config_ignored_when_disabled() {
    let reported = FakeInstallation::complete("libsybdb.so").unwrap();

    let err = Probe::new(isolated(), linux())
        .with_pkg_config(FixedPkgConfig(Some(pkg_config_library(
            vec![reported.include_dir()],
            vec![reported.lib_dir("lib")],
        ))))
        .run()
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_dir_override() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run(isolated().dir(fake.prefix()), linux()).unwrap();
    assert_eq!(install.source, ProbeSource::Override);
    assert_eq!(install.include_dir, Some(fake.include_dir()));
    assert_eq!(install.root, Some(fake.prefix()));
    assert_eq!(install.link_dirs, vec![fake.lib_dir("lib")]);
}

#[test]
fn test_include_dir_override_wins_over_dir() {
    let from_dir = FakeInstallation::complete("libsybdb.so").unwrap();
    let from_include = FakeInstallation::complete("libsybdb.so").unwrap();

    let install = run(
        isolated()
            .dir(from_dir.prefix())
            .include_dir(from_include.include_dir()),
        linux(),
    )
    .unwrap();
    assert_eq!(install.include_dir, Some(from_include.include_dir()));
    // libraries still come from FREETDS_DIR
    assert_eq!(install.link_dirs, vec![from_dir.lib_dir("lib")]);
}

#[test]
fn test_invalid_override_does_not_fall_back() {
    let broken = FakeInstallation::builder()
        .with_header("sybfront.h")
        .build()
        .unwrap();
    let valid = FakeInstallation::complete("libsybdb.so").unwrap();

    let err = run(
        isolated().dir(broken.prefix()).add_prefix(valid.prefix()),
        linux(),
    )
    .unwrap_err();
    match err {
        ProbeError::OverrideIncomplete { var, dir, missing } => {
            assert_eq!(var, "FREETDS_DIR");
            assert_eq!(dir, broken.include_dir());
            assert_eq!(missing, vec!["sybdb.h"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_override_from_environment() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    let vars: HashMap<&str, String> = [
        ("FREETDS_INCLUDE_DIR", fake.include_dir().display().to_string()),
        ("FREETDS_NO_PKG_CONFIG", "1".to_string()),
    ]
    .into_iter()
    .collect();

    let config = ProbeConfig::from_env_with(|key| vars.get(key).cloned());
    let install = run(config, linux()).unwrap();
    assert_eq!(install.source, ProbeSource::Override);
    assert_eq!(install.include_dir, Some(fake.include_dir()));
}

#[test]
fn test_missing_override_dir() {
    let err = run(
        isolated().include_dir("/nonexistent/freetds/include"),
        linux(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ProbeError::OverrideIncomplete { ref missing, .. } if missing.len() == 2
    ));
}

// ============================================================================
// Outputs
// ============================================================================

#[test]
fn test_directives_for_found_installation() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();

    let lines = CargoDirectives::for_installation(&install).lines().to_vec();
    assert_eq!(
        lines[0],
        format!("cargo:rustc-link-search=native={}", fake.lib_dir("lib").display())
    );
    assert_eq!(lines[1], "cargo:rustc-link-lib=dylib=sybdb");
    assert_eq!(
        lines[2],
        format!("cargo:include={}", fake.include_dir().display())
    );
}

#[test]
fn test_umbrella_header_written_next_to_fixture() {
    let fake = FakeInstallation::complete("libsybdb.so").unwrap();
    let install = run(isolated().add_prefix(fake.prefix()), linux()).unwrap();

    let out_dir: PathBuf = fake.root().join("out");
    let header = UmbrellaHeader::for_installation(&install);
    let path = header.write_to_dir(&out_dir).unwrap();
    assert_eq!(path, out_dir.join("cfreetds.h"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, header.contents());
    assert!(written.contains(&format!(
        "#include \"{}\"",
        fake.include_dir().join("sybdb.h").display()
    )));

    // rewriting identical contents is a no-op
    let again = header.write_to_dir(&out_dir).unwrap();
    assert_eq!(again, path);
}
