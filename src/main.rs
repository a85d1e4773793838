#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use glasses_shop::{
    api::AppState,
    config::{database, settings::Settings},
    core::{auth::Authenticator, seed},
    errors::Result,
    server,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment directly
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Settings
    let settings = Settings::from_env().inspect_err(|e| error!("Invalid configuration: {e}"))?;

    // 4. Database: connect with retry, then make sure the tables exist
    let db = database::connect_with_retry(&settings.database)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Seed the catalog on first run
    seed::seed_catalog_if_empty(&db, &settings.catalog_seed_path)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {e}"))?;

    // 6. Keep pooled connections warm
    let keep_alive = server::spawn_keep_alive(db.clone(), settings.keep_alive_interval);

    // 7. Serve until shutdown
    let state = AppState::new(db, Authenticator::from_settings(&settings));
    let result = server::serve(state, settings.port).await;
    keep_alive.abort();
    result
}
