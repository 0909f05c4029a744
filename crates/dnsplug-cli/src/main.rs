//! dnsplug CLI - inspect and check DNS provider configuration
//!
//! Loads a directive-style config file, runs every DNS provider stanza through
//! its module's parser and (optionally) provisioning, and reports the result.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ModulesCommand, ProvisionCommand, ValidateCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "DNSPLUG_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "DNSPLUG_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every DNS provider stanza in a config file
    Validate(ValidateCommand),
    /// Parse and provision, expanding placeholders from the environment
    Provision(ProvisionCommand),
    /// List the registered provider modules
    Modules(ModulesCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // If RUST_LOG is set, use it as-is; otherwise scope the level to our crates
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) if std::env::var("RUST_LOG").is_ok() => filter,
        _ => tracing_subscriber::EnvFilter::new(format!(
            "dnsplug={level},dnsplug_core={level},dnsplug_digitalocean={level}",
            level = cli.log_level
        )),
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {}", e))?;

    match cli.command {
        Commands::Validate(cmd) => cmd.execute(),
        Commands::Provision(cmd) => cmd.execute(),
        Commands::Modules(cmd) => cmd.execute(),
    }
}
