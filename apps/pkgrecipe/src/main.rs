//! pkgrecipe - package recipe descriptor
//!
//! Host CLI around the descriptor crate: loads a recipe, runs one phase and
//! renders the outcome. Phases are synchronous and run on the blocking pool
//! while their events are drained into tracing.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::{OperationResult, OutputRenderer};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pkgrecipe_config::Config;
use pkgrecipe_events::{
    AppEvent, EventEmitter, EventReceiver, EventSender, RecipeEvent, RecipePhase,
};
use pkgrecipe_recipe::{resolve_all, CopyReport, LocalCache, PackageDescriptor, PhaseContext};
use pkgrecipe_types::{ColorChoice, OutputFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();

    init_tracing(cli.global.json, cli.global.debug);

    let config = match load_config(&cli.global).await {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.global.json),
    };

    // Errors follow the merged output setting, not just the flag
    let json_mode = config.general.default_output == OutputFormat::Json;
    if let Err(e) = run(cli, config).await {
        exit_with_error(&e, json_mode);
    }
}

fn exit_with_error(e: &CliError, json_mode: bool) -> ! {
    error!("Application error: {}", e);
    if json_mode {
        let failure = serde_json::json!({ "error": e.failure() });
        match serde_json::to_string_pretty(&failure) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error: {e}"),
        }
    } else {
        eprintln!("Error: {e}");
    }
    process::exit(1);
}

/// Configuration with proper precedence:
/// 1. file config (or defaults), 2. environment, 3. CLI flags
async fn load_config(global: &cli::GlobalArgs) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, global);
    Ok(config)
}

/// Main application logic
async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("Starting pkgrecipe v{}", env!("CARGO_PKG_VERSION"));

    let json_output = config.general.default_output == OutputFormat::Json;
    let renderer = OutputRenderer::new(json_output, config.general.color);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, json_output);

    let (event_sender, event_receiver) = pkgrecipe_events::channel();

    let result = execute_command_with_events(
        cli.command,
        config,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: Config,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, event_sender));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => return command_future.await,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: Config,
    event_sender: EventSender,
) -> Result<OperationResult, CliError> {
    let descriptor = load_descriptor(command.recipe().to_path_buf()).await?;
    let package = descriptor.id().to_string();
    let ctx = PhaseContext::new(event_sender).with_correlation_id(package.clone());

    let declaration = descriptor.declare();
    ctx.emit(AppEvent::Recipe(RecipeEvent::Declared {
        package: package.clone(),
        requirements: declaration
            .requirements
            .iter()
            .map(ToString::to_string)
            .collect(),
    }));

    let (phase, destination, report) = match command {
        Commands::Declare { .. } => return Ok(OperationResult::Declaration(declaration)),

        Commands::Export { recipe, dest } => {
            let recipe_dir = recipe_dir(&recipe);
            let report = {
                let ctx = ctx.clone();
                let dest = dest.clone();
                run_blocking(move || descriptor.export_sources(&recipe_dir, &dest, &ctx)).await?
            };
            (RecipePhase::Export, dest, report)
        }

        Commands::Package { root, dest, .. } => {
            let dest = dest.unwrap_or_else(|| config.package_dir());
            let report = {
                let ctx = ctx.clone();
                let dest = dest.clone();
                run_blocking(move || descriptor.package_with(&root, &dest, &ctx)).await?
            };
            (RecipePhase::Package, dest, report)
        }

        Commands::Imports { roots, dest, .. } => {
            let dest = dest.unwrap_or_else(|| config.import_dir());
            let roots = if roots.is_empty() {
                locate_requirements(&descriptor, &config, &ctx)?
            } else {
                roots
            };
            if roots.is_empty() {
                ctx.emit_warning("no dependency roots to import from");
            }
            let report = {
                let ctx = ctx.clone();
                let dest = dest.clone();
                run_blocking(move || descriptor.imports_from(&roots, &dest, &ctx)).await?
            };
            (RecipePhase::Imports, dest, report)
        }
    };

    if report.is_empty() {
        ctx.emit_warning_with_context(format!("{phase}: no files matched"), package.clone());
    }

    Ok(OperationResult::Copy {
        package,
        phase,
        destination,
        report,
    })
}

/// Parse and validate a recipe file off the async runtime
async fn load_descriptor(path: PathBuf) -> Result<PackageDescriptor, CliError> {
    let descriptor = tokio::task::spawn_blocking(move || PackageDescriptor::load(&path)).await??;
    Ok(descriptor)
}

async fn run_blocking<F>(phase: F) -> Result<CopyReport, CliError>
where
    F: FnOnce() -> pkgrecipe_errors::Result<CopyReport> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(phase).await??)
}

/// Dependency roots from the configured local cache, in declaration order
fn locate_requirements(
    descriptor: &PackageDescriptor,
    config: &Config,
    ctx: &PhaseContext,
) -> Result<Vec<PathBuf>, CliError> {
    let cache = LocalCache::new(config.cache_root());
    ctx.emit_debug_with_context(
        "locating requirements in local cache",
        HashMap::from([
            ("cache".to_string(), cache.root().display().to_string()),
            (
                "requirements".to_string(),
                descriptor.requirements().len().to_string(),
            ),
        ]),
    );

    let resolved = resolve_all(descriptor, &cache)?;
    Ok(resolved.into_iter().map(|(_, root)| root).collect())
}

/// Directory export patterns are relative to
fn recipe_dir(recipe: &Path) -> PathBuf {
    recipe
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let default_filter = if debug_enabled {
        "info,pkgrecipe=debug,pkgrecipe_recipe=debug,pkgrecipe_config=debug"
    } else {
        "warn,pkgrecipe=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    // Logs go to stderr so stdout only ever carries the rendered result
    if json_mode {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
}
