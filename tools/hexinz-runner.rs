//! HexInz host runner
//!
//! Bootstraps the configured modules and reports the resulting module set.
//!
//! Usage:
//!   hexinz-runner --config <path> [--modules-dir <dir>] [--log-filter <filter>]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use hexinz_runner::config::{LoggingConfig, ENV_OVERRIDE_PREFIX};
use hexinz_runner::utils::{env_or_default, init_logging_from_config};
use hexinz_runner::{Configuration, HexInzApp, ServiceCollection};

#[derive(Parser, Debug)]
#[command(name = "hexinz-runner", about = "Bootstrap HexInz modules")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding module files, overriding `[Host] module_root`
    #[arg(long)]
    modules_dir: Option<PathBuf>,

    /// Log filter, overriding `[Logging] filter` (RUST_LOG still wins)
    #[arg(long)]
    log_filter: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Startup failed: {:#}", e);
        eprintln!("hexinz-runner: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(env_or_default("HEXINZ_CONFIG", "hexinz.toml")));
    let mut config = Configuration::from_toml_file(&config_path)
        .with_context(|| format!("loading configuration from {:?}", config_path))?
        .with_env_overrides(ENV_OVERRIDE_PREFIX);

    if let Some(dir) = &args.modules_dir {
        config.set(
            "Host.module_root",
            toml::Value::String(dir.to_string_lossy().into_owned()),
        );
    }

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut logging: LoggingConfig = config.section("Logging")?;
    if args.log_filter.is_some() {
        logging.filter = args.log_filter;
    }
    init_logging_from_config(Some(&logging));

    info!("Starting HexInz host with configuration {:?}", config_path);

    let mut services = ServiceCollection::new();
    let registered = HexInzApp::build(&mut services, &config).context("module registration")?;

    let provider = services.build();
    let modules = HexInzApp::init(registered, &provider, &config).context("module initialization")?;

    for definition in modules.registry().definitions() {
        let unit = definition.unit();
        let metadata = unit.metadata();
        info!(
            "Module ready: {} {} by {} via {} ({:?}, load {})",
            unit.id(),
            metadata.version,
            if metadata.author.is_empty() { "unknown" } else { metadata.author.as_str() },
            metadata.entry_point,
            unit.source_path(),
            unit.load_id()
        );
    }
    info!(
        "Bootstrap complete: {} modules, {} services",
        modules.registry().definition_count(),
        provider.len()
    );
    Ok(())
}
