//! Reservation intake: registers first-time clients, speculatively reserves
//! the slot, and opens the pending request an operator will adjudicate.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use atelier_core::errors::AtelierError;
use atelier_core::models::client::ClientProfile;
use atelier_core::models::request::{FullContact, RequestClient, RequestStatus, SlotRef};
use atelier_store::NewRequest;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub slot: SlotRef,
    pub client: RequestClient,
    #[serde(default)]
    pub full_contact: Option<FullContact>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub status: RequestStatus,
}

/// Creates a reservation: the slot is committed (reserved, unconfirmed) now,
/// and the request opens `pending` for later triage. A lost double-booking
/// race answers 409 and leaves no request behind.
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Response, AppError> {
    // First-time clients get a registry record; initiated clients are known
    // to the workshop already and submit only the quick payload.
    let client_record = if payload.client.is_initiated {
        None
    } else {
        let contact = payload.full_contact.clone().ok_or_else(|| {
            AtelierError::Validation(
                "Full contact details are required for first-time clients".to_string(),
            )
        })?;
        let record = state
            .clients
            .create_client(ClientProfile {
                first_name: payload.client.first_name.clone(),
                last_name: contact.last_name,
                email: contact.email,
                phone: contact.phone,
                message: payload.client.message.clone(),
                is_initiated: false,
            })
            .await?;
        Some(record)
    };

    let request = state
        .requests
        .create_request(NewRequest {
            slot: payload.slot,
            client: payload.client,
            full_contact: payload.full_contact,
        })
        .await?;

    // The slot on the calendar references the registry record when one
    // exists, and the request itself for initiated clients.
    let client_ref = client_record
        .as_ref()
        .map(|record| record.id.clone())
        .unwrap_or_else(|| request.id.clone());

    match state
        .weeks
        .reserve_slot(
            payload.slot.week,
            payload.slot.day,
            payload.slot.time,
            &client_ref,
        )
        .await
    {
        Ok(()) => {}
        Err(AtelierError::NotFound(_)) => {
            // Lost the race for the slot: withdraw the request again.
            state.requests.delete_request(&request.id).await?;
            return Ok((
                StatusCode::CONFLICT,
                Json(json!({ "error": "Slot is no longer available" })),
            )
                .into_response());
        }
        Err(err) => {
            // A request must never outlive a reservation that did not
            // happen, whatever the failure.
            state.requests.delete_request(&request.id).await?;
            return Err(err.into());
        }
    }

    let response = CreateReservationResponse {
        request_id: request.id,
        client_id: client_record.map(|record| record.id),
        status: request.status,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}
