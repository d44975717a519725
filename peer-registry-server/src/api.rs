use crate::{
    errors::{ApiError, ServerError, ServerResult},
    AppState,
};
use axum::{body::Bytes, extract::State, Json};
use peer_registry_core::{PeersResponse, RegisterPeerRequest, RegisterPeerResponse};
use serde_json::Value;
use std::sync::Arc;

pub const PEER_ID_REQUIRED: &str = "peerId required";

pub async fn register_peer(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ServerResult<Json<RegisterPeerResponse>> {
    // Unparsable bodies are reported as server errors, not 400s
    let body: Value = serde_json::from_slice(&body)?;
    if body.is_null() {
        // Cannot be destructured; other non-object bodies just lack a peerId
        return Err(ServerError::NullBody);
    }

    let peer_id = RegisterPeerRequest::from_body(&body)
        .peer_id()
        .ok_or_else(|| ApiError::bad_request(PEER_ID_REQUIRED))?;

    state.registrar.register(&peer_id).await?;

    Ok(Json(RegisterPeerResponse::registered(peer_id)))
}

pub async fn list_peers(State(state): State<Arc<AppState>>) -> ServerResult<Json<PeersResponse>> {
    let peers = state.registrar.peers().await?;
    Ok(Json(PeersResponse { peers }))
}
