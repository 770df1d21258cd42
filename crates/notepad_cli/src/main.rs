//! Notepad server entry point.
//!
//! # Responsibility
//! - Merge environment configuration with command-line overrides.
//! - Initialize logging before any other subsystem.
//! - Run the HTTP server until shutdown.

use clap::Parser;
use log::error;
use notepad_server::{serve, ServerConfig};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notepad", version, about = "Serve the notepad HTTP API")]
struct Cli {
    /// Host to bind (overrides NOTEPAD_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides NOTEPAD_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite file, or `:memory:` (overrides NOTEPAD_DB_PATH)
    #[arg(long)]
    db_path: Option<String>,

    /// trace|debug|info|warn|error (overrides NOTEPAD_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides NOTEPAD_LOG_DIR)
    #[arg(long)]
    log_dir: Option<String>,

    /// Print core version and exit
    #[arg(long)]
    ping: bool,
}

impl Cli {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.http_host = host;
        }
        if let Some(port) = self.port {
            config.http_port = port;
        }
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.ping {
        println!("notepad_core ping={}", notepad_core::ping());
        println!("notepad_core version={}", notepad_core::core_version());
        return ExitCode::SUCCESS;
    }

    let config = match ServerConfig::from_env().and_then(|config| cli.apply(config).validated()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = notepad_core::init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("logging error: {err}");
        return ExitCode::FAILURE;
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=cli status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
