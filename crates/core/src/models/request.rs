//! Reservation requests: the operator-adjudicated workflow wrapping a
//! reservation. A request is created `pending` and transitions at most once,
//! to `approved` or `rejected`.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekKey;
use crate::models::hhmm;
use crate::models::week::Weekday;

/// Coordinates of the slot a request targets. A reference, not ownership:
/// the slot itself lives in the week document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub week: WeekKey,
    pub day: Weekday,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }
}

/// The quick client payload embedded in every request. Initiated clients
/// submit only this; first-time clients additionally provide [`FullContact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestClient {
    pub first_name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_initiated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullContact {
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// A persisted reservation request.
///
/// Invariant: `processed_at` and `processed_by` are `None` iff the status is
/// `pending`. They are serialized as explicit nulls so the persisted shape is
/// stable across the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub id: String,
    pub slot: SlotRef,
    pub client: RequestClient,
    #[serde(default)]
    pub full_contact: Option<FullContact>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ReservationRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Aggregate recomputed from the full request list; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub initiated_clients: usize,
    pub new_clients: usize,
}
