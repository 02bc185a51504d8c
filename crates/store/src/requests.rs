//! The reservation-request workflow store.
//!
//! Requests are created `pending` and move exactly once to `approved` or
//! `rejected`. Listing is newest-first by creation time — a contract, since
//! operators triage from the top.

use std::sync::Arc;

use chrono::{Duration, Utc};

use atelier_core::errors::{AtelierError, AtelierResult};
use atelier_core::models::request::{
    FullContact, RequestClient, RequestStats, RequestStatus, ReservationRequest, SlotRef,
};

use crate::document::{decode, encode, DocumentStore};
use crate::ids::{IdGenerator, IdNamespace};

/// Payload for a new request; everything else is filled in by the store.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub slot: SlotRef,
    pub client: RequestClient,
    pub full_contact: Option<FullContact>,
}

pub struct RequestStore {
    docs: Arc<dyn DocumentStore>,
    ids: IdGenerator,
}

impl RequestStore {
    pub fn new(docs: Arc<dyn DocumentStore>, namespace: IdNamespace) -> Self {
        Self {
            docs,
            ids: IdGenerator::new(namespace),
        }
    }

    pub async fn create_request(&self, new: NewRequest) -> AtelierResult<ReservationRequest> {
        let reserved = self.ids.reserve(self.docs.as_ref()).await?;
        let request = ReservationRequest {
            id: reserved.id().to_string(),
            slot: new.slot,
            client: new.client,
            full_contact: new.full_contact,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            final_client_name: None,
            rejection_reason: None,
        };
        self.write(&request).await?;
        tracing::debug!(request_id = %request.id, "reservation request created");
        Ok(request)
    }

    /// Decode errors propagate here; a targeted read never hides data loss.
    pub async fn get_request(&self, id: &str) -> AtelierResult<ReservationRequest> {
        let bytes = self
            .docs
            .get(id)
            .await?
            .ok_or_else(|| AtelierError::NotFound(format!("Request {id} not found")))?;
        decode(id, &bytes)
    }

    /// All requests, optionally restricted to one status, most recent first.
    /// A corrupt document is logged and skipped so one bad file cannot take
    /// down the whole triage list.
    pub async fn list_requests(
        &self,
        status: Option<RequestStatus>,
    ) -> AtelierResult<Vec<ReservationRequest>> {
        let ids = self.docs.list(self.ids.prefix()).await?;
        let mut requests = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(bytes) = self.docs.get(&id).await? else {
                continue;
            };
            match decode::<ReservationRequest>(&id, &bytes) {
                Ok(request) => {
                    if status.is_none_or(|s| request.status == s) {
                        requests.push(request);
                    }
                }
                Err(err) => {
                    tracing::error!(request_id = %id, error = %err, "skipping undecodable request");
                }
            }
        }
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    /// `pending → approved`, recording who processed it and the finalized
    /// client display name. A request that is not pending is "not in the
    /// expected state" and fails `NotFound` without being touched.
    pub async fn approve_request(
        &self,
        id: &str,
        approved_by: &str,
        final_client_name: &str,
    ) -> AtelierResult<ReservationRequest> {
        let mut request = self.pending(id).await?;
        request.status = RequestStatus::Approved;
        request.processed_at = Some(Utc::now());
        request.processed_by = Some(approved_by.to_string());
        request.final_client_name = Some(final_client_name.to_string());
        self.write(&request).await?;
        tracing::info!(request_id = %id, approved_by, "request approved");
        Ok(request)
    }

    /// `pending → rejected`, with a free-text reason. Does not touch the
    /// week store; releasing the speculative reservation is the caller's
    /// explicit follow-up.
    pub async fn reject_request(
        &self,
        id: &str,
        rejected_by: &str,
        reason: &str,
    ) -> AtelierResult<ReservationRequest> {
        let mut request = self.pending(id).await?;
        request.status = RequestStatus::Rejected;
        request.processed_at = Some(Utc::now());
        request.processed_by = Some(rejected_by.to_string());
        request.rejection_reason = Some(reason.to_string());
        self.write(&request).await?;
        tracing::info!(request_id = %id, rejected_by, "request rejected");
        Ok(request)
    }

    pub async fn delete_request(&self, id: &str) -> AtelierResult<bool> {
        self.docs.delete(id).await
    }

    /// Aggregate recomputed from the full list on every call; O(n), but
    /// always consistent with the store.
    pub async fn stats(&self) -> AtelierResult<RequestStats> {
        let requests = self.list_requests(None).await?;
        let mut stats = RequestStats {
            total: requests.len(),
            ..RequestStats::default()
        };
        for request in &requests {
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Approved => stats.approved += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
            if request.client.is_initiated {
                stats.initiated_clients += 1;
            } else {
                stats.new_clients += 1;
            }
        }
        Ok(stats)
    }

    /// Deletes terminal requests processed more than `max_age_days` ago.
    /// Pending requests are never removed, whatever their age.
    pub async fn cleanup_old_requests(&self, max_age_days: i64) -> AtelierResult<usize> {
        let cutoff = Utc::now() - Duration::days(max_age_days);
        let mut removed = 0;
        for request in self.list_requests(None).await? {
            let old_enough = request
                .processed_at
                .is_some_and(|processed| processed < cutoff);
            if request.status.is_terminal() && old_enough && self.delete_request(&request.id).await?
            {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::info!(removed, max_age_days, "cleaned up old requests");
        }
        Ok(removed)
    }

    async fn pending(&self, id: &str) -> AtelierResult<ReservationRequest> {
        let request = self.get_request(id).await?;
        if !request.is_pending() {
            return Err(AtelierError::NotFound(format!(
                "Request {id} has already been processed"
            )));
        }
        Ok(request)
    }

    async fn write(&self, request: &ReservationRequest) -> AtelierResult<()> {
        let bytes = encode(&request.id, request)?;
        self.docs.put(&request.id, &bytes).await
    }
}
