//! Build automation tasks for the freetds-rs workspace.
//!
//! Run with `cargo xtask <command>`.
//!
//! ## Available Commands
//!
//! - `ci`: Run all CI checks (format, lint, test)
//! - `fmt`: Check/apply code formatting
//! - `clippy`: Run clippy lints
//! - `test`: Run all tests
//! - `doc`: Generate documentation
//! - `clean`: Clean build artifacts
//! - `probe`: Show where FreeTDS would be found for a target
//! - `shim`: Write the `cfreetds.h` umbrella header for a target
//! - `sys`: Build and test `freetds-sys` against the local FreeTDS
//! - `coverage`: Run code coverage

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use freetds_probe::{
    CargoDirectives, LinkKind, Probe, ProbeConfig, ProbeError, Target, UmbrellaHeader,
};
use tracing::level_filters::LevelFilter;
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for freetds-rs")]
struct Cli {
    /// Show probe debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all checks (format, lint, test)
    Ci,
    /// Run cargo fmt (--check by default, --fix to apply)
    Fmt {
        /// Apply formatting fixes
        #[arg(long)]
        fix: bool,
    },
    /// Run clippy with all features
    Clippy {
        /// Apply clippy suggestions
        #[arg(long)]
        fix: bool,
    },
    /// Run all tests
    Test {
        /// Test a specific package
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Generate documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Clean build artifacts
    Clean,
    /// Show where FreeTDS would be found
    Probe {
        #[command(flatten)]
        probe: ProbeArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Print the cargo directives a build script would emit
        #[arg(long)]
        directives: bool,
    },
    /// Write the cfreetds.h umbrella header
    Shim {
        #[command(flatten)]
        probe: ProbeArgs,
        /// Output directory
        #[arg(long, default_value = "target/freetds")]
        out: PathBuf,
    },
    /// Build and test freetds-sys (requires FreeTDS)
    Sys {
        /// Link libsybdb statically
        #[arg(long = "static")]
        static_link: bool,
    },
    /// Run code coverage
    Coverage {
        /// Output format (html, lcov, json)
        #[arg(long, default_value = "html")]
        format: String,
    },
}

#[derive(clap::Args)]
struct ProbeArgs {
    /// Target triple (defaults to the host)
    #[arg(long)]
    target: Option<String>,
    /// Look for libsybdb.a instead of the shared library
    #[arg(long = "static")]
    static_link: bool,
    /// Skip pkg-config
    #[arg(long)]
    no_pkg_config: bool,
    /// Extra prefix to search first (repeatable)
    #[arg(long = "prefix")]
    prefixes: Vec<PathBuf>,
}

impl ProbeArgs {
    fn probe(&self) -> Result<Probe> {
        let target = match &self.target {
            Some(triple) => Target::from_triple(triple)?,
            None => Target::host(),
        };

        let mut config = ProbeConfig::from_env();
        if self.static_link {
            config = config.link_kind(LinkKind::Static);
        }
        if self.no_pkg_config {
            config = config.use_pkg_config(false);
        }
        for prefix in &self.prefixes {
            config = config.add_prefix(prefix);
        }
        Ok(Probe::new(config, target))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let sh = Shell::new()?;

    // Change to workspace root
    let workspace_root = workspace_root()?;
    sh.change_dir(&workspace_root);

    match cli.command {
        Command::Ci => {
            println!("Running CI checks...");
            fmt(&sh, false)?;
            clippy(&sh, false)?;
            test(&sh, None)?;
            println!("\n✅ All CI checks passed!");
        }
        Command::Fmt { fix } => fmt(&sh, fix)?,
        Command::Clippy { fix } => clippy(&sh, fix)?,
        Command::Test { package } => test(&sh, package.as_deref())?,
        Command::Doc { open } => doc(&sh, open)?,
        Command::Clean => clean(&sh)?,
        Command::Probe {
            probe: args,
            json,
            directives,
        } => probe(&args, json, directives)?,
        Command::Shim { probe: args, out } => shim(&sh, &args, &out)?,
        Command::Sys { static_link } => sys(&sh, static_link)?,
        Command::Coverage { format } => coverage(&sh, &format)?,
    }

    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    let output = std::process::Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("failed to run cargo locate-project")?;

    let path = String::from_utf8(output.stdout)
        .context("invalid UTF-8 in cargo output")?
        .trim()
        .to_string();

    Ok(PathBuf::from(path)
        .parent()
        .context("failed to get workspace root")?
        .to_path_buf())
}

fn fmt(sh: &Shell, fix: bool) -> Result<()> {
    if fix {
        println!("Applying formatting...");
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Formatting applied.");
    } else {
        println!("Checking formatting...");
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Formatting check passed.");
    }
    Ok(())
}

fn clippy(sh: &Shell, fix: bool) -> Result<()> {
    // freetds-sys is left out: its build script needs a FreeTDS install
    if fix {
        println!("Applying clippy suggestions...");
        cmd!(
            sh,
            "cargo clippy --all-features --all-targets --fix --allow-dirty"
        )
        .run()?;
        println!("✅ Clippy suggestions applied.");
    } else {
        println!("Running clippy...");
        cmd!(
            sh,
            "cargo clippy --all-features --all-targets -- -D warnings"
        )
        .run()?;
        println!("✅ Clippy check passed.");
    }
    Ok(())
}

fn test(sh: &Shell, package: Option<&str>) -> Result<()> {
    println!("Running tests...");

    let mut args = vec!["test"];

    if let Some(pkg) = package {
        args.push("-p");
        args.push(pkg);
    }

    args.push("--all-features");

    cmd!(sh, "cargo {args...}").run()?;
    println!("✅ All tests passed.");
    Ok(())
}

fn doc(sh: &Shell, open: bool) -> Result<()> {
    println!("Generating documentation...");
    if open {
        cmd!(sh, "cargo doc --all-features --no-deps --open").run()?;
    } else {
        cmd!(sh, "cargo doc --all-features --no-deps").run()?;
    }
    println!("✅ Documentation generated.");
    Ok(())
}

fn clean(sh: &Shell) -> Result<()> {
    println!("Cleaning build artifacts...");
    cmd!(sh, "cargo clean").run()?;
    println!("✅ Clean complete.");
    Ok(())
}

fn probe(args: &ProbeArgs, json: bool, directives: bool) -> Result<()> {
    let probe = args.probe()?;
    let installation = match probe.run() {
        Ok(installation) => installation,
        Err(err @ ProbeError::NotFound { .. }) => {
            bail!("{err}\nTry `brew install freetds` or your distribution's freetds-dev package.")
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        let report = serde_json::json!({
            "target": probe.target(),
            "installation": installation,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if directives {
        CargoDirectives::for_installation(&installation)
            .rerun_if_env_changed(ProbeConfig::ENV_VARS)
            .emit()?;
        return Ok(());
    }

    println!("Target:   {}", probe.target());
    println!("Source:   {}", installation.source);
    match installation.include_dir() {
        Some(dir) => println!("Headers:  {}", dir.display()),
        None => println!("Headers:  (compiler default include path)"),
    }
    match &installation.library {
        Some(path) => println!("Library:  {} ({})", path.display(), installation.link_kind),
        None => println!(
            "Library:  -l{} ({}, default linker path)",
            installation.lib_name, installation.link_kind
        ),
    }
    if let Some(version) = &installation.version {
        println!("Version:  {version}");
    }
    println!("✅ FreeTDS found.");
    Ok(())
}

fn shim(sh: &Shell, args: &ProbeArgs, out: &std::path::Path) -> Result<()> {
    let installation = args.probe()?.run()?;
    let out_dir = sh.current_dir().join(out);
    let path = UmbrellaHeader::for_installation(&installation)
        .write_to_dir(&out_dir)
        .with_context(|| format!("failed to write header into {}", out_dir.display()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

fn sys(sh: &Shell, static_link: bool) -> Result<()> {
    println!("Building freetds-sys...");
    if static_link {
        cmd!(sh, "cargo test -p freetds-sys --features static").run()?;
    } else {
        cmd!(sh, "cargo test -p freetds-sys").run()?;
    }
    println!("✅ freetds-sys builds and links.");
    Ok(())
}

fn coverage(sh: &Shell, format: &str) -> Result<()> {
    println!("Running code coverage...");

    // Requires cargo-llvm-cov
    match format {
        "html" => {
            cmd!(sh, "cargo llvm-cov --all-features --html").run()?;
            println!("✅ Coverage report: target/llvm-cov/html/index.html");
        }
        "lcov" => {
            cmd!(
                sh,
                "cargo llvm-cov --all-features --lcov --output-path target/lcov.info"
            )
            .run()?;
            println!("✅ Coverage report: target/lcov.info");
        }
        "json" => {
            cmd!(
                sh,
                "cargo llvm-cov --all-features --json --output-path target/coverage.json"
            )
            .run()?;
            println!("✅ Coverage report: target/coverage.json");
        }
        _ => {
            bail!(
                "Unknown coverage format: {}. Use html, lcov, or json.",
                format
            );
        }
    }

    Ok(())
}
