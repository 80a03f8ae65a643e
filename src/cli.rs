//! Minimal CLI: compose → (listing | declaration | models)
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use swagger_models::{compose_declaration, demo, resource_listing, Composed, Config, WebService};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate Swagger 1.2 documents for the built-in pet store services
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the resource listing
    Listing,
    /// print the API declaration of one resource
    Declaration(ResourceOut),
    /// print only the model registry of one resource
    Models(ResourceOut),
}

#[derive(Args, Debug, Clone)]
struct Settings {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// output .json file (stdout if omitted)
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// log at debug level (RUST_LOG overrides)
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,
}

#[derive(Args, Debug, Clone)]
struct ResourceOut {
    /// root path of the web service, e.g. /pet
    #[arg(long, short)]
    resource: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        init_tracing(self.settings.debug);
        let config = match &self.settings.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let services = demo::services();

        let json = match &self.cmd {
            Command::Listing => resource_listing(&services, &config).to_json_pretty()?,
            Command::Declaration(target) => {
                let composed = compose_resource(&services, &target.resource, &config)?;
                composed.declaration.to_json_pretty()?
            }
            Command::Models(target) => {
                let composed = compose_resource(&services, &target.resource, &config)?;
                serde_json::to_string_pretty(&composed.declaration.models)?
            }
        };
        emit(self.settings.out.as_deref(), &json)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn compose_resource(services: &[WebService], resource: &str, config: &Config) -> Result<Composed> {
    let ws = services
        .iter()
        .find(|ws| ws.root_path() == resource)
        .ok_or_else(|| {
            let known: Vec<_> = services.iter().map(WebService::root_path).collect();
            anyhow!("no web service at {resource} (known: {})", known.join(", "))
        })?;
    let composed = compose_declaration(ws, config)?;
    for diagnostic in &composed.diagnostics {
        eprintln!("{} {diagnostic}", "warning:".yellow().bold());
    }
    Ok(composed)
}

fn emit(out: Option<&Path>, json: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
