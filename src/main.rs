mod api;
mod config;
mod error;
mod models;
mod services;

use std::sync::Arc;

use dotenv::dotenv;

use api::AppState;
use config::Config;
use services::{ApiClient, ArchiveService, PostSource, SessionClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::from_env();

    // The bearer token selects the v2 API client; otherwise the
    // cookie-session client handles everything.
    let source: Arc<dyn PostSource> = match config.bearer_token.clone() {
        Some(token) => Arc::new(ApiClient::new(token)),
        None => Arc::new(SessionClient::new(&config)),
    };

    log::info!("Using the {} client", source.label());
    log::info!("Archiving results under {}", config.archive_dir.display());

    let state = Arc::new(AppState {
        source,
        archive: ArchiveService::new(config.archive_dir.clone()),
    });

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
