//! rtport CLI
//!
//! Imports Salesforce tree-export data into an org whose record type ids
//! differ from the org the data was exported from.

mod commands;

use clap::{Parser, Subcommand};
use commands::CreateDataCommand;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RTPORT_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(
        long,
        default_value = "compact",
        env = "RTPORT_LOG_FORMAT",
        global = true
    )]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import data files or a data plan, remapping record types by name
    Create(CreateDataCommand),
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // If RUST_LOG is set, use it directly; otherwise scope the level to our crates
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()?
    } else {
        tracing_subscriber::EnvFilter::new(format!(
            "rtport_cli={level},\
             rtport_import={level},\
             rtport_import_types={level},\
             rtport_import_sfdx={level}",
            level = cli.log_level
        ))
    };

    // stdout is reserved for the result message
    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Create(create_cmd) => create_cmd.execute(),
    }
}
