use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub mongo_uri: Option<String>,
    pub db_name: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "5000".into());
        let mongo_uri = env::var("MONGO_URI").ok();
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "pawmart".into());
        Ok(Self {
            server_port,
            mongo_uri,
            db_name,
        })
    }
}
