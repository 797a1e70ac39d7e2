use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    api::health_checks::ok,
    app::App,
    boot::BootError,
    clock::SystemClock,
    config::Config,
    database::{migrations::Migrator, setup_database},
    environment::Environment,
    notifications::Notifier,
    persistence::DatabasePersistence,
    rate_limiting::RateLimitState,
    router::router,
    submissions::SubmissionPipeline,
};

pub async fn handle_serve_command(
    environment: Environment,
    config: Config,
) -> Result<(), BootError> {
    let port = config.server.port;

    // Answer liveness probes while migrations run
    let liveness_server_task = tokio::spawn(start_liveness_server(port));

    let (db, migration_receiver) = setup_database::<Migrator>(&config.database).await?;

    let migrations = migration_receiver.await;
    liveness_server_task.abort();
    let _ = liveness_server_task.await;

    match migrations {
        Ok(Ok(())) => info!("✅ Database is ready!"),
        Ok(Err(e)) => {
            error!("❌ Database setup failed: {}", e);
            return Err(e.into());
        }
        Err(_) => {
            error!("❌ Database setup channel closed unexpectedly");
            return Err(BootError::MigrationsInterrupted);
        }
    }

    let notifier = Notifier::from_config(&config.notifications)?;
    info!(destination = %notifier.destination(), "Notifications configured");

    if !config.rate_limiting.enabled {
        info!("Rate limiting is disabled");
    }

    let pipeline = SubmissionPipeline::new(
        RateLimitState::new(config.rate_limiting.clone()),
        Arc::new(DatabasePersistence::new(db.clone())),
        notifier,
        Arc::new(SystemClock),
        Duration::from_secs(config.notifications.timeout_secs),
    );

    let app = App {
        config,
        environment,
        db: Some(db),
        pipeline,
    };

    start_server(router(app), port).await
}

// Only serves /liveness
async fn start_liveness_server(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind liveness server on {}: {}", addr, e);
            return;
        }
    };

    let migration_router = Router::new().route("/liveness", get(ok));
    if let Err(e) = axum::serve(listener, migration_router).await {
        error!("Liveness server stopped: {}", e);
    }
}

async fn start_server(router: Router, port: u16) -> Result<(), BootError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("🌐 Server starting on http://{}", addr);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
