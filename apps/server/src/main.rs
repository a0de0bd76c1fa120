//! Songbook command line entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use songbook_core::{AppConfig, LoggingBootstrap};
use songbook_storage::Database;
use songbook_web::{build_server, install_logging, open_database};
use tracing::info;
use tracing_subscriber::EnvFilter;

static LOGGING: LoggingBootstrap = LoggingBootstrap::new();

#[derive(Parser)]
#[command(name = "songbook", version, about = "Songbook web application")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web application
    Serve {
        /// Host/IP to bind (overrides the run-mode profile)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides the run-mode profile)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create the database and apply migrations, then exit
    CreateDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            let taxonomy = install_logging(&config, &LOGGING)?;
            let database = open_database(&config, &taxonomy)?;
            let server = build_server(config, taxonomy, database)?;
            server.run().await
        }
        Commands::CreateDb => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            let db = Database::open_location(&config.database)?;
            info!(
                "Database {:?} ready (schema version {})",
                config.database,
                db.schema_version()
            );
            Ok(())
        }
    }
}
