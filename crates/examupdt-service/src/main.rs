use axum::http::{HeaderValue, Method, header};
use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use examupdt_service::{AppState, DefaultAppState, config::AppConfig, create_app, run_migrations};
use std::sync::{Arc, Mutex};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "Ignoring unusable CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examupdt_service=debug".parse().unwrap()),
        )
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|err| {
        error!(error = %err, "Invalid configuration");
        std::process::exit(1);
    });

    let database_url = config.database_url();
    let mut connection = SqliteConnection::establish(database_url).unwrap_or_else(|err| {
        error!(database_url = %database_url, error = %err, "Failed to connect to database");
        std::process::exit(1);
    });
    info!(database_url = %database_url, "Connected to database");

    match run_migrations(&mut connection) {
        Ok(0) => {}
        Ok(applied) => info!(applied, "Applied database migrations"),
        Err(err) => {
            error!(error = %err, "Failed to run database migrations");
            std::process::exit(1);
        }
    }

    let db = Arc::new(Mutex::new(connection));
    let app_state = DefaultAppState::with_session_ttl(db, config.session_ttl());

    if let Some(admin) = config.admin() {
        if let Err(err) = app_state
            .identity()
            .ensure_admin(&admin.email, &admin.password, admin.name.as_deref())
            .await
        {
            error!(error = %err, "Failed to bootstrap admin account");
            std::process::exit(1);
        }
    } else {
        warn!("ADMIN_EMAIL not set; no admin account will be created");
    }

    let app = create_app(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(cors_layer(&config)),
    );

    let listen_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .unwrap_or_else(|err| {
            error!(bind_address = %listen_addr, error = %err, "Failed to bind to address");
            std::process::exit(1);
        });

    info!(address = %listen_addr, "Server running");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!(error = %err, "Server error");
        std::process::exit(1);
    }
    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");
}
