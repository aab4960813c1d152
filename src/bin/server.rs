//! Clinic API server: reads settings from the environment, prepares the store and serves
//! the router.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use vetclinic::{
    app_router, apply_migrations, ensure_database_exists, AppState, MemoryStore, PgStore, Settings, Store,
    StoreBackend,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vetclinic=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store: Arc<dyn Store> = match settings.backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            apply_migrations(&pool, &settings.schema).await?;
            Arc::new(PgStore::new(pool, settings.schema.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app_router(AppState::new(store), &settings.cors_origin)?;
    let listener = TcpListener::bind(settings.socket_addr()?).await?;
    tracing::info!(backend = ?settings.backend, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
