use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::RegistryResult;
use crate::models::{PeerId, Registration};
use crate::store::DocumentStore;

/// Registers peer identifiers into the user data document.
///
/// Each registration is one load, mutate, save cycle. The cycle runs under
/// `update_lock`, so registrations issued through the same registrar never
/// overwrite each other. Other processes writing the file are not
/// coordinated with.
pub struct PeerRegistrar {
    store: Arc<dyn DocumentStore>,
    update_lock: Mutex<()>,
}

impl PeerRegistrar {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            update_lock: Mutex::new(()),
        }
    }

    pub async fn register(&self, peer_id: &PeerId) -> RegistryResult<Registration> {
        let _guard = self.update_lock.lock().await;

        let mut document = self.store.load().await?;
        let outcome = document.add_peer(peer_id)?;

        match outcome {
            Registration::Added => {
                self.store.save(&document).await?;
                info!(peer_id = %peer_id, "Registered peer");
            }
            Registration::AlreadyPresent => {
                debug!(peer_id = %peer_id, "Peer already registered");
            }
        }

        Ok(outcome)
    }

    pub async fn peers(&self) -> RegistryResult<Vec<Value>> {
        let document = self.store.load().await?;
        Ok(document.peers()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryError;
    use crate::models::UserData;
    use crate::store::{JsonFileStore, MemoryStore};
    use serde_json::json;

    fn memory_registrar(raw: &str) -> (Arc<MemoryStore>, PeerRegistrar) {
        let store = Arc::new(MemoryStore::new(UserData::from_json_str(raw).unwrap()));
        let registrar = PeerRegistrar::new(store.clone());
        (store, registrar)
    }

    #[tokio::test]
    async fn test_register_into_empty_document() {
        let (store, registrar) = memory_registrar("{}");

        let outcome = registrar.register(&PeerId::from("abc")).await.unwrap();

        assert_eq!(outcome, Registration::Added);
        assert_eq!(
            serde_json::to_value(store.snapshot().await).unwrap(),
            json!({"peers": ["abc"]})
        );
    }

    #[tokio::test]
    async fn test_register_twice_matches_register_once() {
        let (store, registrar) = memory_registrar(r#"{"peers": ["x"]}"#);

        registrar.register(&PeerId::from("abc")).await.unwrap();
        let once = store.snapshot().await;
        let outcome = registrar.register(&PeerId::from("abc")).await.unwrap();

        assert_eq!(outcome, Registration::AlreadyPresent);
        assert_eq!(store.snapshot().await, once);
        assert_eq!(registrar.peers().await.unwrap(), vec![json!("x"), json!("abc")]);
    }

    #[tokio::test]
    async fn test_already_present_does_not_rewrite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userData.json");
        let original = r#"{"peers":["abc"],"keep":true}"#;
        std::fs::write(&path, original).unwrap();

        let registrar = PeerRegistrar::new(Arc::new(JsonFileStore::new(&path)));
        registrar.register(&PeerId::from("abc")).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_register_preserves_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userData.json");
        std::fs::write(
            &path,
            r#"{"orgId": "org-7", "address": "0xabc", "apiKey": {"activated": true}}"#,
        )
        .unwrap();

        let registrar = PeerRegistrar::new(Arc::new(JsonFileStore::new(&path)));
        registrar.register(&PeerId::from("peer-1")).await.unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "orgId": "org-7",
                "address": "0xabc",
                "apiKey": {"activated": true},
                "peers": ["peer-1"]
            })
        );
    }

    #[tokio::test]
    async fn test_register_with_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let registrar = PeerRegistrar::new(Arc::new(JsonFileStore::new(
            dir.path().join("userData.json"),
        )));

        let err = registrar.register(&PeerId::from("abc")).await.unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_peers_field_is_left_untouched() {
        let (store, registrar) = memory_registrar(r#"{"peers": {"a": 1}}"#);

        assert!(registrar.register(&PeerId::from("abc")).await.is_err());
        assert_eq!(
            serde_json::to_value(store.snapshot().await).unwrap(),
            json!({"peers": {"a": 1}})
        );
    }

    #[tokio::test]
    async fn test_concurrent_registrations_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userData.json");
        std::fs::write(&path, "{}").unwrap();

        let registrar = Arc::new(PeerRegistrar::new(Arc::new(JsonFileStore::new(&path))));
        let mut handles = Vec::new();
        for i in 0..20 {
            let registrar = registrar.clone();
            handles.push(tokio::spawn(async move {
                registrar.register(&PeerId::from(format!("peer-{i}").as_str())).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let peers = registrar.peers().await.unwrap();
        assert_eq!(peers.len(), 20);
        for i in 0..20 {
            assert!(peers.contains(&json!(format!("peer-{i}"))));
        }
    }
}
