//! Static-file server binary for the browser front end.

use anyhow::{Context, Result};
use clap::Parser;
use img2pdf::server::{router, shutdown_signal};
use img2pdf::ServerConfig;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve the img2pdf web front end.
#[derive(Parser, Debug)]
#[command(name = "img2pdf-server", version, about = "Serve the img2pdf web front end")]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory of static assets.
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Page inside the public directory answered at `/`.
    #[arg(long, env = "LOGIN_PAGE", default_value = "login.html")]
    login_page: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "img2pdf=debug,tower_http=debug"
    } else {
        "img2pdf=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        public_dir: cli.public_dir,
        login_page: cli.login_page,
    };

    if !config.login_path().is_file() {
        tracing::warn!(
            "Login page {} not found; / will answer 404",
            config.login_path().display()
        );
    }

    let app = router(&config);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server started on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}
