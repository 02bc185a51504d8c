//! Short human-friendly identifiers: a fixed prefix plus a zero-padded
//! random numeric suffix, checked against the store and retried on collision
//! up to a configured bound.
//!
//! Clients and requests draw from disjoint namespaces (different prefixes),
//! and each namespace serializes generation through its own lock so two
//! concurrent creators can never both claim the same candidate.

use rand::Rng;
use tokio::sync::{Mutex, MutexGuard};

use atelier_core::errors::{AtelierError, AtelierResult};

use crate::document::DocumentStore;

/// Configuration of one identifier namespace. The width and retry bound are
/// deployment knobs, not constants: a busier site widens the suffix.
#[derive(Debug, Clone)]
pub struct IdNamespace {
    pub prefix: String,
    pub width: usize,
    pub max: u32,
    pub max_attempts: u32,
}

impl IdNamespace {
    pub fn new(prefix: &str, width: usize, max_attempts: u32) -> Self {
        // Widths past the u32 range saturate rather than overflow.
        let max = 10u32
            .checked_pow(width as u32)
            .map_or(u32::MAX, |bound| bound - 1);
        Self {
            prefix: prefix.to_string(),
            width,
            max,
            max_attempts,
        }
    }

    /// `client_NNNN`, up to 9999 clients.
    pub fn clients() -> Self {
        Self::new("client_", 4, 100)
    }

    /// `req_NNNNN`, up to 99999 requests.
    pub fn requests() -> Self {
        Self::new("req_", 5, 1000)
    }
}

/// A generated identifier that stays unique for as long as the guard lives.
///
/// The namespace lock is held until this value is dropped; callers must keep
/// it alive across the write that persists the new document.
#[derive(Debug)]
pub struct ReservedId<'a> {
    id: String,
    _guard: MutexGuard<'a, ()>,
}

impl ReservedId<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

pub struct IdGenerator {
    namespace: IdNamespace,
    guard: Mutex<()>,
}

impl IdGenerator {
    pub fn new(namespace: IdNamespace) -> Self {
        Self {
            namespace,
            guard: Mutex::new(()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.namespace.prefix
    }

    /// Finds a free identifier, holding the namespace lock so the
    /// existence check stays atomic with respect to other generators.
    ///
    /// Fails with `IdExhaustion` when no free candidate turns up within the
    /// configured attempt bound, which signals a namespace too small for the
    /// current load.
    pub async fn reserve<'a>(
        &'a self,
        docs: &dyn DocumentStore,
    ) -> AtelierResult<ReservedId<'a>> {
        let guard = self.guard.lock().await;

        for _ in 0..self.namespace.max_attempts {
            let candidate = {
                let n = rand::thread_rng().gen_range(1..=self.namespace.max);
                format!(
                    "{}{:0width$}",
                    self.namespace.prefix,
                    n,
                    width = self.namespace.width
                )
            };
            if !docs.exists(&candidate).await? {
                return Ok(ReservedId {
                    id: candidate,
                    _guard: guard,
                });
            }
        }

        tracing::error!(
            namespace = %self.namespace.prefix,
            attempts = self.namespace.max_attempts,
            "identifier namespace exhausted"
        );
        Err(AtelierError::IdExhaustion {
            namespace: self.namespace.prefix.clone(),
            attempts: self.namespace.max_attempts,
        })
    }
}
