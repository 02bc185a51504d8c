use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile fields submitted with a first-time reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_initiated: bool,
}

/// A persisted client: profile plus generated identifier and creation time.
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub created: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: ClientProfile,
}
