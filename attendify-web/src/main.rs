//! Attendify Web Server
//!
//! Serves the teacher and student pages plus the attendance API.

use anyhow::Context;
use attendify_core::{init_logging, AttendifyConfig};
use attendify_web::server::AttendifyServerBuilder;
use clap::Parser;
use std::path::PathBuf;

/// Attendify Web Server - QR code classroom attendance
#[derive(Parser)]
#[command(name = "attendify-web")]
#[command(about = "QR code attendance server")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding teacher.html, student.html and their assets
    #[arg(long)]
    static_dir: Option<String>,

    /// Public URL encoded into QR codes
    #[arg(long)]
    public_url: Option<String>,

    /// Webhook receiving accepted submissions
    #[arg(long)]
    sink_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Load the file, then apply environment and command line overrides
    fn into_config(self) -> anyhow::Result<AttendifyConfig> {
        let mut config = match &self.config {
            Some(path) => AttendifyConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => AttendifyConfig::default(),
        };

        config.apply_env()?;

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = dir;
        }
        if let Some(url) = self.public_url {
            config.public_base_url = Some(url);
        }
        if let Some(url) = self.sink_url {
            config.sink.url = Some(url);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }

        config.resolve_base_url();
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Args::parse().into_config()?;

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        address = %format!("{}:{}", config.server.host, config.server.port),
        base_url = %config.base_url(),
        sink = config.sink.url.as_deref().unwrap_or("log"),
        "Configuration loaded"
    );

    let server = AttendifyServerBuilder::from_config(config)
        .build()
        .context("Failed to build server")?;

    server.start().await.context("Server failed")?;
    Ok(())
}
