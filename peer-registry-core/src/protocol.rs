use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::PeerId;

/// Body of a peer registration request.
///
/// `peer_id` is kept as raw JSON so that missing, null and falsy values
/// can all be answered with the same validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterPeerRequest {
    #[serde(rename = "peerId", default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<Value>,
}

impl RegisterPeerRequest {
    /// Reads the request from an arbitrary JSON body. Bodies that are not
    /// objects simply carry no `peerId`.
    pub fn from_body(body: &Value) -> Self {
        Self {
            peer_id: body.get("peerId").cloned(),
        }
    }

    pub fn peer_id(&self) -> Option<PeerId> {
        PeerId::from_value(self.peer_id.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterPeerResponse {
    pub success: bool,
    #[serde(rename = "peerId")]
    pub peer_id: PeerId,
}

impl RegisterPeerResponse {
    pub fn registered(peer_id: PeerId) -> Self {
        Self {
            success: true,
            peer_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeersResponse {
    pub peers: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_non_object_body() {
        assert!(RegisterPeerRequest::from_body(&json!([1, 2])).peer_id().is_none());
        assert!(RegisterPeerRequest::from_body(&json!(null)).peer_id().is_none());
        assert!(RegisterPeerRequest::from_body(&json!({})).peer_id().is_none());
        assert_eq!(
            RegisterPeerRequest::from_body(&json!({"peerId": "abc", "extra": 1})).peer_id(),
            Some(PeerId::from("abc"))
        );
    }

    #[test]
    fn test_response_wire_format() {
        let body = serde_json::to_value(RegisterPeerResponse::registered(PeerId::from("abc"))).unwrap();
        assert_eq!(body, json!({"success": true, "peerId": "abc"}));
    }
}
