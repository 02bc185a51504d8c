//! Calendar reads: the week document plus its dates and navigation keys,
//! everything a presentation layer needs to render one week.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use atelier_core::calendar::{next_week, previous_week, week_dates, WeekKey};
use atelier_core::models::week::WeekSlots;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
    pub week: WeekKey,
    pub dates: Vec<NaiveDate>,
    pub previous: WeekKey,
    pub next: WeekKey,
    pub slots: WeekSlots,
}

/// Returns the week document for `:week`, synthesizing a default when none
/// is persisted. A malformed or out-of-range key falls back to the current
/// week rather than failing — the calendar must always render something.
#[axum::debug_handler]
pub async fn get_week(
    State(state): State<Arc<ApiState>>,
    Path(week): Path<String>,
) -> Result<Json<WeekResponse>, AppError> {
    let key = resolve_week_key(&state, &week);
    let doc = state.weeks.get_week(key).await?;

    Ok(Json(WeekResponse {
        week: key,
        dates: week_dates(key).to_vec(),
        previous: previous_week(key),
        next: next_week(key),
        slots: doc.slots,
    }))
}

fn resolve_week_key(state: &ApiState, raw: &str) -> WeekKey {
    match raw.parse::<WeekKey>() {
        Ok(key) if state.config.valid_years.contains(&key.year()) => key,
        Ok(key) => {
            tracing::warn!(week = %key, "week outside the configured year range, falling back to current week");
            WeekKey::current(Utc::now())
        }
        Err(err) => {
            tracing::warn!(week = raw, error = %err, "invalid week key, falling back to current week");
            WeekKey::current(Utc::now())
        }
    }
}
