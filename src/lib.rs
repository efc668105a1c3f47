//! Backend for a single-event wedding site: a small JSON API that collects
//! guest RSVPs and hands the couple an admin view of who is coming.
//!
//!
//!
//! # General Infrastructure
//! - Static frontend (invitation pages, animations, guest picker) is served
//!   separately and talks to this API over CORS
//! - This server owns exactly one collection: one RSVP record per invited
//!   party, stored in Redis and replaced in full on every resubmission
//! - The guest directory itself ships with the frontend; the API only sees
//!   the group identifier a guest submits
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | GET | `/api/health` | none |
//! | GET | `/api/rsvp/check/:group_id` | none |
//! | GET | `/api/rsvp/accepted` | none |
//! | POST | `/api/rsvp` | none |
//! | GET | `/api/rsvps` | admin key |
//! | DELETE | `/api/rsvps/:id` | admin key |
//!
//! The admin key is passed as an `x-admin-key` header or a `key` query
//! parameter.
//!
//!
//!
//! # Configuration
//!
//! Read once at startup from the environment:
//! - `PORT` (default 3001)
//! - `REDIS_URL` (default `redis://127.0.0.1:6379`)
//! - `ALLOWED_ORIGINS` (comma-separated CORS allow-list)
//! - `ADMIN_KEY`
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! docker run -d -p 6379:6379 redis:7
//! RUST_LOG=info cargo run
//! ```
//!
//! Smoke test.
//! ```sh
//! curl localhost:3001/api/health
//! curl -X POST localhost:3001/api/rsvp \
//!   -H 'content-type: application/json' \
//!   -d '{"groupId":"smith-family","attendance":"accept","respondedBy":"Jane Smith"}'
//! curl "localhost:3001/api/rsvps?key=$ADMIN_KEY"
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod rsvp;
pub mod state;
pub mod store;

use routes::{
    accepted_handler, admin_delete_handler, admin_list_handler, check_handler, health_handler,
    submit_handler,
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/rsvp/check/:group_id", get(check_handler))
        .route("/api/rsvp/accepted", get(accepted_handler))
        .route("/api/rsvp", post(submit_handler))
        .route("/api/rsvps", get(admin_list_handler))
        .route("/api/rsvps/:id", delete(admin_delete_handler))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| warn!("Ignoring invalid origin: {origin}"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-admin-key")])
        .max_age(Duration::from_secs(60 * 60))
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");
    let app = build_router(state.clone());

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
