use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use hotelbook_api::{app, AppState, AuthConfig};
use hotelbook_store::{
    app_config::Config, DbClient, PgBookingRepository, PgRoomRepository, PgSessionRepository,
    PgTicketRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotelbook_api=debug,hotelbook_core=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting hotelbook API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    if config.database.run_migrations {
        db.migrate().await.context("Failed to run migrations")?;
    }

    let app_state = AppState::new(
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(PgRoomRepository::new(db.pool.clone())),
        Arc::new(PgTicketRepository::new(db.pool.clone())),
        Arc::new(PgSessionRepository::new(db.pool.clone())),
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
