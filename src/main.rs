//! Gateway server: opens the existing SQLite database, loads field descriptions once,
//! mounts every route.

use acrn_gateway::{app, store, AppState, FieldDescriptions, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("acrn_gateway=info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    let pool = store::connect(&settings).await?;

    let descriptions = {
        let mut conn = pool.acquire().await?;
        FieldDescriptions::load(&mut conn, &settings.description_table).await?
    };
    tracing::info!(fields = descriptions.len(), "field descriptions loaded");

    let state = AppState::new(pool, descriptions);
    let router = app(state, &settings);

    let listener = TcpListener::bind(settings.listen_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
