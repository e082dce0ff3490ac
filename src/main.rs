use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use autofiller::api::{create_router, AppState};
use autofiller::database::models::MappingWritePolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://autofiller.db".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .context("PORT must be a number")?;
    let mapping_policy = match std::env::var("MAPPING_WRITE_POLICY") {
        Ok(raw) => MappingWritePolicy::from_str(&raw)
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid MAPPING_WRITE_POLICY")?,
        Err(_) => MappingWritePolicy::default(),
    };

    let opts = SqliteConnectOptions::from_str(&database_url)
        .context("Invalid DATABASE_URL")?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app = create_router(AppState {
        pool,
        mapping_policy,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    log::info!("Server started on port {port}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
