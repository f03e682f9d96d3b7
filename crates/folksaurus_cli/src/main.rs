//! Folksaurus CLI
//!
//! Command-line access to the Folksaurus term service with a local cache.
//!
//! # Commands
//!
//! - `get` - Look a term up by app id, service id or name
//! - `get-or-create` - Look a term up by name, creating it if needed
//! - `search` - List terms starting with a prefix
//! - `version` - Show version information

mod commands;

use clap::{ArgGroup, Parser, Subcommand};
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Folksaurus term service client.
#[derive(Parser)]
#[command(name = "folksaurus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(global = true, short, long, default_value = "folksaurus.toml")]
    config: PathBuf,

    /// Configuration section to read instead of the top-level keys
    #[arg(global = true, long)]
    section: Option<String>,

    /// Path to the local term cache
    #[arg(global = true, long, default_value = "folksaurus-terms.json")]
    store: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look a term up
    #[command(group(ArgGroup::new("key").required(true).args(["app_id", "id", "name"])))]
    Get {
        /// Application id assigned by the local cache
        #[arg(long)]
        app_id: Option<String>,

        /// Service id
        #[arg(long)]
        id: Option<String>,

        /// Term name
        #[arg(long)]
        name: Option<String>,
    },

    /// Look a term up by name, creating it on the service if needed
    GetOrCreate {
        /// Term name
        name: String,
    },

    /// List terms whose names start with a prefix
    Search {
        /// Name prefix
        prefix: String,

        /// Maximum number of terms (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Folksaurus CLI v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let manager = commands::open_manager(&cli.config, cli.section.as_deref(), &cli.store)?;
    match cli.command {
        Commands::Get { app_id, id, name } => {
            let key = match (app_id, id, name) {
                (Some(app_id), _, _) => commands::get::Key::AppId(app_id.into()),
                (_, Some(id), _) => commands::get::Key::Id(id.into()),
                (_, _, Some(name)) => commands::get::Key::Name(name),
                _ => return Err("one of --app-id, --id or --name is required".into()),
            };
            commands::get::run(&manager, &key, cli.format)?;
        }
        Commands::GetOrCreate { name } => {
            commands::get_or_create::run(&manager, &name, cli.format)?;
        }
        Commands::Search { prefix, limit } => {
            commands::search::run(&manager, &prefix, limit, cli.format)?;
        }
        Commands::Version => {}
    }

    Ok(())
}
