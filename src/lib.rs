pub mod api;
pub mod catalog;
pub mod config;
pub mod manual;
pub mod middleware;
pub mod outcome;
pub mod server;
pub mod story;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub use config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Catalog client error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Story client error: {0}")]
    Story(#[from] story::StoryError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the shared state from configuration.
pub fn build_state(config: Config) -> Result<server::AppState, ServerError> {
    let manual = Arc::new(manual::ManualStore::new(&config.manual_file));
    let catalog = Arc::new(catalog::TmdbClient::new(&config)?);
    let story = Arc::new(story::GeminiClient::new(&config)?);

    Ok(server::AppState::new(config, manual, catalog, story))
}

pub async fn run(config_path: Option<&str>) -> Result<(), ServerError> {
    let config = Config::load(config_path)?;

    if let Some(path) = config_path {
        info!("Using config file: {}", path);
    }
    info!("Manual overrides file: {}", config.manual_file);
    if config.tmdb_api_key().is_none() {
        info!("TMDB_API_KEY not set, trending and search will only serve local data");
    }
    if config.gemini_api_key().is_none() {
        info!("GEMINI_API_KEY not set, /find will serve a sample answer");
    }

    let address = config.listen.address.as_deref().unwrap_or("0.0.0.0");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = build_state(config)?;
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
