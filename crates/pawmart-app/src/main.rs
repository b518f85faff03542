use pawmart_hex::application::market_service::MarketService;
use pawmart_hex::config::Config;
use pawmart_hex::inbound::http::{HttpServer, HttpServerConfig};
use pawmart_store::{build_store, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for MONGO_URI / DB_NAME / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let store: Store = build_store(config.mongo_uri.as_deref(), &config.db_name).await?;
    let service = MarketService::new(store);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
