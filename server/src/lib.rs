//! EduCMS backend.
//!
//! A thin CRUD proxy in front of a hosted Supabase project. Requests name a
//! legacy table in the path; the router resolves it against a closed table
//! vocabulary, translates field names in both directions, forwards the
//! operation over PostgREST, and relays the outcome in a uniform
//! `{success, data, message}` envelope.
//!
//! The server holds no state between requests. Whatever consistency the
//! storage backend provides is the consistency this system has.
//!
//! # Environment
//!
//! - `SUPABASE_URL`, `SUPABASE_KEY`: storage project endpoint and key
//! - `RUST_PORT`: listening port, defaults to 3000

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod schema;
pub mod state;
pub mod storage;
pub mod utils;

use routes::{
    create_handler, delete_handler, fallback_handler, get_handler, health_handler, home_handler,
    list_handler, schema_handler, stats_handler, update_handler,
};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/api/schema", get(schema_handler))
        .route("/api/dashboard/stats", get(stats_handler))
        .route("/api/{table}", get(list_handler).post(create_handler))
        .route(
            "/api/{table}/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new();

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
