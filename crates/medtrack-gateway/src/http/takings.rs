use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app::AppState;
use crate::error::{ApiError, Result};
use crate::http::schedules::require_positive;

#[derive(Deserialize)]
pub struct TakingsQuery {
    pub user_id: Option<i64>,
}

#[derive(Serialize)]
pub struct TakingsResponse {
    pub medication: String,
    pub takings: Vec<DateTime<Utc>>,
}

/// GET /next_takings?user_id=N — for each active schedule, the single
/// next dose within the configured lookahead period. Schedules with no
/// upcoming dose are omitted.
pub async fn next_takings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TakingsQuery>,
) -> Result<Json<Vec<TakingsResponse>>> {
    let user_id = require_positive(query.user_id, ApiError::InvalidUserId)?;

    let schedules = state.service.next_takings(user_id, Utc::now())?;
    Ok(Json(
        schedules
            .into_iter()
            .map(|s| TakingsResponse {
                medication: s.medication,
                takings: s.takings,
            })
            .collect(),
    ))
}
