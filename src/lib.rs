//! Backend of a language-exchange platform: users sign up, get introduced to
//! peers, send and accept friend requests, then chat or call through a
//! third-party SDK the backend never touches.
//!
//!
//!
//! # General Infrastructure
//! - Stateless axum server, one Redis instance as the document store
//! - Every route sits behind a bearer-token session gate; handlers receive an
//!   explicit request-scoped principal, never ambient auth state
//! - Sessions are issued elsewhere (auth service in production, the `seed`
//!   binary in development); this server only reads them
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | GET | `/` | recommended users |
//! | GET | `/friends` | caller's friends |
//! | POST | `/friend-request/{id}` | send request to user `{id}` |
//! | PUT | `/friend-request/{id}/accept` | accept request `{id}` |
//! | GET | `/friend-requests` | incoming pending requests |
//! | GET | `/outgoing-friend-requests` | outgoing pending requests |
//!
//!
//!
//! # Consistency
//!
//! The two invariants the data model cares about:
//!
//! - At most one friend request per unordered user pair. Enforced by an
//!   order-normalized pair key claimed with SET NX, so concurrent or
//!   reciprocal sends cannot both create a record.
//! - Accepted request means both users list each other. Acceptance rewrites
//!   the request document and SADDs both friend sets in one MULTI/EXEC, so
//!   the friend sets never go asymmetric.
//!
//! See [`database`] for the full key layout.
//!
//!
//!
//! # Setup
//!
//! Needs a reachable Redis (`REDIS_URL`, default `redis://127.0.0.1:6379`).
//!
//! ```sh
//! cargo run --bin seed   # demo users + one session token per user
//! cargo run              # serve on RUST_PORT (default 3000)
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod state;

use routes::{
    accept_request_handler, friends_handler, incoming_requests_handler, outgoing_requests_handler,
    recommended_handler, send_request_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/", get(recommended_handler))
        .route("/friends", get(friends_handler))
        .route("/friend-request/{id}", post(send_request_handler))
        .route("/friend-request/{id}/accept", put(accept_request_handler))
        .route("/friend-requests", get(incoming_requests_handler))
        .route("/outgoing-friend-requests", get(outgoing_requests_handler))
        .layer(cors)
        .with_state(state.clone());

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
