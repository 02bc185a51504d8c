//! The client registry: one immutable record per first-time client, keyed by
//! a generated `client_NNNN` identifier.

use std::sync::Arc;

use chrono::Utc;

use atelier_core::errors::{AtelierError, AtelierResult};
use atelier_core::models::client::{ClientProfile, ClientRecord};

use crate::document::{decode, encode, DocumentStore};
use crate::ids::{IdGenerator, IdNamespace};

pub struct ClientRegistry {
    docs: Arc<dyn DocumentStore>,
    ids: IdGenerator,
}

impl ClientRegistry {
    pub fn new(docs: Arc<dyn DocumentStore>, namespace: IdNamespace) -> Self {
        Self {
            docs,
            ids: IdGenerator::new(namespace),
        }
    }

    /// Persists a new client under a freshly generated identifier.
    pub async fn create_client(&self, profile: ClientProfile) -> AtelierResult<ClientRecord> {
        let reserved = self.ids.reserve(self.docs.as_ref()).await?;
        let record = ClientRecord {
            id: reserved.id().to_string(),
            created: Utc::now(),
            profile,
        };
        let bytes = encode(&record.id, &record)?;
        self.docs.put(&record.id, &bytes).await?;
        tracing::debug!(client_id = %record.id, "client created");
        Ok(record)
    }

    /// Unlike week documents, a corrupt client record is never masked:
    /// decode errors propagate so no data loss goes unnoticed.
    pub async fn get_client(&self, id: &str) -> AtelierResult<ClientRecord> {
        let bytes = self
            .docs
            .get(id)
            .await?
            .ok_or_else(|| AtelierError::NotFound(format!("Client {id} not found")))?;
        decode(id, &bytes)
    }
}
