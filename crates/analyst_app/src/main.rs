mod app;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use analyst_core::PanelVariant;
use analyst_engine::{ensure_output_dir, AtomicFileWriter, EngineHandle, ReqwestBackend};
use anyhow::Context;
use clap::Parser;
use engine_logging::engine_info;

use crate::app::App;
use crate::config::{AppConfig, LogSetting, VariantSetting, DEFAULT_CONFIG_PATH};
use crate::effects::EffectRunner;

/// Assisted-analysis chat for one dashboard session.
#[derive(Debug, Parser)]
#[command(name = "analyst", version, about)]
struct Args {
    /// Dashboard session to open the panel for.
    session_id: String,

    /// RON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides the panel variant from the config file.
    #[arg(long, value_enum)]
    variant: Option<VariantSetting>,

    /// Overrides where log lines go.
    #[arg(long, value_enum)]
    log: Option<LogSetting>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(&args.config)?;
    logging::initialize(args.log.unwrap_or(config.log), args.verbose);
    engine_info!("analyst starting with config {:?}", args.config);

    ensure_output_dir(&config.download_dir)
        .with_context(|| format!("download directory {:?}", config.download_dir))?;

    let backend = ReqwestBackend::new(config.backend_settings())
        .context("failed to build the HTTP client")?;
    let engine = EngineHandle::new(Arc::new(backend)).context("failed to start the engine")?;
    let runner = EffectRunner::new(
        engine,
        AtomicFileWriter::new(config.download_dir.clone()),
        io::stdout(),
    );

    let variant = PanelVariant::from(args.variant.unwrap_or(config.variant));
    App::new(variant, runner)
        .run(args.session_id)
        .context("terminal session failed")?;
    Ok(())
}
