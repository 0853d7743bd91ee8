//! The binary entry point for the Terrace terrain viewer.

use clap::Parser;
use terrace_app::AppError;
use terrace_app::headless::{ExportTargets, run_headless};
use terrace_app::platform::PlatformDirs;
use terrace_app::window::run_with_config;
use terrace_config::{CliArgs, Config};
use tracing::{info, warn};

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        eprintln!("terrace: {e}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    // Logging is not up yet, so a broken config file is reported on stderr.
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    terrace_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(
        config = %dirs.config_dir.display(),
        logs = %dirs.log_dir.display(),
        "Terrace starting"
    );

    if args.headless {
        let targets = ExportTargets {
            height_png: args.export_png.clone(),
            worley_png: args.export_worley.clone(),
        };
        let summary = run_headless(&config, &targets)?;
        info!(seed = summary.seed, files = summary.exported.len(), "headless run complete");
        return Ok(());
    }
    if args.export_png.is_some() || args.export_worley.is_some() {
        warn!("PNG export only runs with --headless; ignoring export paths");
    }

    run_with_config(config, Some(dirs.config_dir))
}
