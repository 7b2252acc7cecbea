//! Schedule CRUD endpoints.
//!
//! Durations travel over the wire as human strings ("30m", "1h"); a
//! duration of "0" creates a perpetual schedule.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use medtrack_core::{format_duration, parse_duration};
use medtrack_engine::Schedule;

use crate::app::AppState;
use crate::error::{ApiError, Result};

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub user_id: i64,
    pub medication: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct ExactQuery {
    pub user_id: Option<i64>,
    pub schedule_id: Option<i64>,
}

#[derive(Serialize)]
pub struct ScheduleListResponse {
    pub schedule_ids: Vec<i64>,
}

/// Wire form of a full schedule, with durations rendered back to the
/// human string format the create endpoint accepts.
#[derive(Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub user_id: i64,
    pub medication: String,
    pub frequency: String,
    pub duration: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub takings: Vec<DateTime<Utc>>,
}

impl From<Schedule> for ScheduleResponse {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            medication: s.medication,
            frequency: format_duration(s.frequency),
            duration: format_duration(s.duration),
            start_time: s.start_time,
            end_time: s.end_time,
            takings: s.takings,
        }
    }
}

pub(crate) fn require_positive(value: Option<i64>, err: ApiError) -> Result<i64> {
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(err),
    }
}

/// POST /schedule — create a schedule, returning its assigned id.
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let frequency = parse_duration(&req.frequency)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let duration = parse_duration(&req.duration)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let schedule = Schedule::new(req.user_id, req.medication, frequency, duration);
    let id = state.service.create_schedule(schedule, Utc::now())?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// GET /schedules?user_id=N — IDs of the user's unexpired schedules.
/// An empty list is a normal outcome, not an error.
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ScheduleListResponse>> {
    let user_id = require_positive(query.user_id, ApiError::InvalidUserId)?;

    let schedules = state.service.schedules_by_user(user_id, Utc::now())?;
    Ok(Json(ScheduleListResponse {
        schedule_ids: schedules.into_iter().map(|s| s.id).collect(),
    }))
}

/// GET /schedule?user_id=N&schedule_id=M — one schedule with today's
/// dose instants attached.
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExactQuery>,
) -> Result<Json<ScheduleResponse>> {
    let user_id = require_positive(query.user_id, ApiError::InvalidUserId)?;
    let schedule_id = require_positive(query.schedule_id, ApiError::InvalidScheduleId)?;

    let schedule = state
        .service
        .schedule_by_ids(user_id, schedule_id, Utc::now())?;
    Ok(Json(schedule.into()))
}
