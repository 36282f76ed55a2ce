//! Locates FreeTDS and configures linking against `libsybdb`.

use std::path::PathBuf;
use std::process::ExitCode;

use freetds_probe::{
    CargoDirectives, LinkKind, Probe, ProbeConfig, ProbeError, Target, UmbrellaHeader,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Err(io) = CargoDirectives::new()
                .warning(format!("freetds-sys: {err}"))
                .emit()
            {
                eprintln!("error: {io}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ProbeError> {
    let rerun = CargoDirectives::new()
        .rerun_if_env_changed(ProbeConfig::ENV_VARS)
        .rerun_if_env_changed(["PKG_CONFIG_PATH", "PKG_CONFIG_LIBDIR", "PKG_CONFIG_SYSROOT_DIR"]);
    rerun.emit()?;

    let mut config = ProbeConfig::from_env();
    if std::env::var_os("CARGO_FEATURE_STATIC").is_some() {
        config = config.link_kind(LinkKind::Static);
    }

    let target = Target::from_cargo_env()?;
    let installation = Probe::new(config, target).run()?;

    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or(ProbeError::MissingEnv("OUT_DIR"))?;
    let header = UmbrellaHeader::for_installation(&installation).write_to_dir(&out_dir)?;

    CargoDirectives::for_installation(&installation)
        .rerun_if_changed(installation.headers())
        .metadata("header", header.display())
        .metadata("source", installation.source)
        .emit()?;
    Ok(())
}
