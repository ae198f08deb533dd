use rentalops_api::{
    api_v1_routes, config, db, events, handlers::AppServices, AppState,
};

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!(
        environment = %cfg.environment,
        "Starting rentalops-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_pool = Arc::new(db::establish_connection_from_app_config(&cfg).await?);
    if cfg.auto_migrate {
        db::run_migrations(&db_pool).await?;
    }

    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = events::EventSender::new(event_tx);
    tokio::spawn(events::process_events(event_rx));

    let services = AppServices::new(db_pool.clone(), Arc::new(event_sender.clone()));
    let state = AppState {
        db: db_pool,
        config: cfg.clone(),
        event_sender,
        services,
    };

    let cors = build_cors_layer(&cfg);

    let app = Router::new()
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            cfg.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

fn build_cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    match cfg.cors_allowed_origins.as_deref() {
        Some(origins) => {
            let parsed: Vec<_> = origins
                .split(',')
                .filter_map(|origin| match origin.trim().parse() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        error!(origin = origin.trim(), "Ignoring invalid CORS origin: {}", e);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        None => {
            if !cfg.is_development() {
                warn!("No CORS origins configured; falling back to permissive CORS");
            }
            CorsLayer::permissive()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
