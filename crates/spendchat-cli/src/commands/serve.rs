//! Server command implementation

use std::path::Path;

use anyhow::Result;
use spendchat_server::{ServerConfig, CORS_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, static_dir: &Path) -> Result<()> {
    println!("🚀 Starting SpendChat web server...");
    println!("   Database: {}", db_path.display());
    if port == 0 {
        println!("   Listening: http://{} (free port, see log)", host);
    } else {
        println!("   Listening: http://{}:{}", host, port);
    }
    println!("   Static files: {}", static_dir.display());

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: any origin (set {} to restrict)", CORS_ORIGINS_ENV);
    } else {
        println!("   🔒 CORS: {}", config.allowed_origins.join(", "));
    }

    tracing::debug!(origins = ?config.allowed_origins, "CORS configuration");

    let db = open_db(db_path)?;
    let static_dir = static_dir.to_string_lossy();

    spendchat_server::serve_with_config(db, host, port, Some(&static_dir), config).await
}
