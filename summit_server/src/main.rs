use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use summit_server::app_with_state;
use summit_server::config::read_config;
use summit_server::state::AppState;

#[derive(Parser, Debug)]
#[command(about = "Conference management API server")]
struct Args {
    /// Path to the YAML configuration file. Falls back to the
    /// SUMMIT_SERVER_CONFIG environment variable, then to defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = read_config(args.config);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging_config))
        .init();

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid host/port in config");

    let state = AppState::new(config).await;
    let app = app_with_state(state).await;

    tracing::info!("Listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .expect("Server failed");
}
