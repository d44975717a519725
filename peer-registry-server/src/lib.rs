pub mod api;
pub mod config;
pub mod errors;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use peer_registry_core::{DocumentStore, PeerRegistrar};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub struct AppState {
    pub registrar: PeerRegistrar,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            registrar: PeerRegistrar::new(store),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/register-peer", post(api::register_peer))
        .route("/api/peers", get(api::list_peers))
        .route("/health", get(|| async { "OK" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
