use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::{
    error::AppError,
    rsvp::{compute_stats, Attendance, SubmitRsvp},
    state::AppState,
};

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

/// Guest-facing lookup of a prior response. No prior response is a normal
/// outcome, reported as `found: false` rather than an error.
pub async fn check_handler(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.store.find_by_group(&group_id).await? {
        Some(rsvp) => Ok(Json(json!({
            "found": true,
            "attendance": rsvp.attendance,
            "respondedBy": rsvp.responded_by,
            "attendingMembers": rsvp.attending_members,
            "decliningMembers": rsvp.declining_members,
            "plusOneName": rsvp.plus_one_name,
            "totalAttending": rsvp.total_attending,
            "createdAt": rsvp.created_at,
        }))),
        None => Ok(Json(json!({ "found": false }))),
    }
}

/// Public "who's coming" projection. Deliberately minimal: never responder
/// identity, declining members, or timestamps.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedEntry {
    pub group_id: String,
    pub total_attending: u32,
    pub attending_members: Vec<String>,
}

pub async fn accepted_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AcceptedEntry>>, AppError> {
    let records = state.store.list_all().await?;

    Ok(Json(
        records
            .into_iter()
            .filter(|record| record.attendance == Attendance::Accept)
            .map(|record| AcceptedEntry {
                group_id: record.group_id,
                total_attending: record.total_attending,
                attending_members: record.attending_members,
            })
            .collect(),
    ))
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRsvp>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.into_record()?;
    let record = state.store.upsert(record).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "RSVP received!",
            "rsvp": {
                "id": record.id,
                "groupId": record.group_id,
                "displayName": record.display_name,
                "attendance": record.attendance,
            },
        })),
    ))
}

pub async fn admin_list_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin_key(&state, &headers, &query)?;

    let mut records = state.store.list_all().await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let stats = compute_stats(&records);

    Ok(Json(json!({ "stats": stats, "rsvps": records })))
}

pub async fn admin_delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin_key(&state, &headers, &query)?;

    if state.store.delete_by_id(&id).await? {
        Ok(Json(json!({ "message": "RSVP deleted", "id": id })))
    } else {
        Err(AppError::NotFound)
    }
}

/// Exact match against the configured secret, taken from the `x-admin-key`
/// header or the `key` query parameter. Missing and wrong keys get the
/// same answer.
fn require_admin_key(
    state: &AppState,
    headers: &HeaderMap,
    query: &HashMap<String, String>,
) -> Result<(), AppError> {
    let provided = headers
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.get("key").cloned());

    match provided {
        Some(key) if key == state.config.admin_key => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}
