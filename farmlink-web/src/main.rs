//! farmlink-web service entry point

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use farmlink_common::config::{AppConfig, ConfigOverrides};
use farmlink_web::services::annotation::AnnotationClient;
use farmlink_web::services::media::MediaStore;
use farmlink_web::AppState;

/// Command-line options; each can also come from the environment
#[derive(Debug, Parser)]
#[command(name = "farmlink-web", version, about = "Farmer/consumer produce sharing service")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, env = "FARMLINK_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Storage root for the database and uploaded media
    #[arg(long, env = "FARMLINK_ROOT")]
    root: Option<std::path::PathBuf>,

    /// Address to listen on
    #[arg(long, env = "FARMLINK_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    info!("Starting farmlink-web");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::resolve(ConfigOverrides {
        config_file: args.config,
        root_folder: args.root,
        bind_address: args.bind,
    })?;
    info!("Storage root: {}", config.root_folder.display());

    let media = MediaStore::new(config.media_root());
    media.ensure_directories()?;

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let db = farmlink_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let annotation = match &config.gemini_api_key {
        Some(key) => Some(AnnotationClient::new(key.clone())?),
        None => {
            warn!("Gemini API key not configured; produce analysis is disabled");
            None
        }
    };

    let bind_address = config.bind_address.clone();
    let state = AppState::new(db, config, media, annotation);
    let app = farmlink_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
