//! Handlers for `/hunts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/hunts` | Listings with status name and role count |
//! | `POST`   | `/hunts` | Body: `{"name":..,"huntStatusId":..,"startDate":..}` |
//! | `GET`    | `/hunts/:id` | Detail view with aggregated role list |
//! | `PATCH`  | `/hunts/:id` | Partial update; `endDate: null` clears |
//! | `DELETE` | `/hunts/:id` | Cascades to roles and their interactions |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sigh_core::{
  Id,
  hunt::{Hunt, HuntPatch, NewHunt},
  interaction::TypeScope,
  report::{overview_roles, status_counts},
  store::TrackerStore,
};

use crate::{
  AppState,
  error::ApiError,
  wire::{non_empty, parse_ts},
};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /hunts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let hunts = state.store.list_hunts().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "hunts": hunts })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub name:           Option<String>,
  pub hunt_status_id: Option<Id>,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
}

/// `POST /hunts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let name = non_empty(body.name)
    .ok_or_else(|| ApiError::BadRequest("Name is required.".to_string()))?;
  let hunt_status_id = body.hunt_status_id.ok_or_else(|| {
    ApiError::BadRequest("A hunt status is required.".to_string())
  })?;
  state
    .store
    .get_hunt_status(hunt_status_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest(format!("Unknown hunt status {hunt_status_id}."))
    })?;

  let hunt = state
    .store
    .create_hunt(NewHunt {
      hunt_status_id,
      name,
      start_date: parse_ts(body.start_date.as_deref()).unwrap_or_else(Utc::now),
      end_date: parse_ts(body.end_date.as_deref()),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(hunt)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HuntDetail {
  #[serde(flatten)]
  hunt:   Hunt,
  status: String,
}

/// `GET /hunts/:id` — the hunt, the lookup collections its page needs, and
/// the aggregated role list with status counts.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let hunt = state
    .store
    .get_hunt(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("hunt {id} not found")))?;

  let statuses = state
    .store
    .list_hunt_statuses()
    .await
    .map_err(ApiError::store)?;
  let status = statuses
    .iter()
    .find(|s| s.id == hunt.hunt_status_id)
    .map(|s| s.name.clone())
    .unwrap_or_default();

  let roles = state.store.roles_for_hunt(id).await.map_err(ApiError::store)?;
  let interactions = state
    .store
    .interactions_for_hunt(id)
    .await
    .map_err(ApiError::store)?;
  let tag_links = state
    .store
    .role_tags_for_hunt(id)
    .await
    .map_err(ApiError::store)?;
  let overviews = overview_roles(roles, &interactions, &tag_links);
  let counts = status_counts(&overviews);

  let interaction_types = state
    .store
    .list_interaction_types(TypeScope::Role)
    .await
    .map_err(ApiError::store)?;
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;

  Ok(Json(json!({
    "hunt": HuntDetail { hunt, status },
    "huntStatuses": statuses,
    "interactionTypes": interaction_types,
    "tags": tags,
    "roles": overviews,
    "statusCounts": counts,
  })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub name:           Option<String>,
  pub hunt_status_id: Option<Id>,
  pub start_date:     Option<String>,
  /// Absent leaves the end date untouched; `null` or `""` clears it.
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub end_date:       Option<Option<String>>,
}

/// `PATCH /hunts/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Hunt>, ApiError>
where
  S: TrackerStore,
{
  if body.name.is_none()
    && body.hunt_status_id.is_none()
    && body.start_date.is_none()
    && body.end_date.is_none()
  {
    return Err(ApiError::BadRequest("No updates provided.".to_string()));
  }

  let existing = state
    .store
    .get_hunt(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("hunt {id} not found")))?;

  let mut patch = HuntPatch::default();
  if let Some(name) = body.name {
    patch.name = Some(non_empty(Some(name)).ok_or_else(|| {
      ApiError::BadRequest("Name cannot be empty.".to_string())
    })?);
  }
  if let Some(status_id) = body.hunt_status_id {
    state
      .store
      .get_hunt_status(status_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown hunt status {status_id}."))
      })?;
    patch.hunt_status_id = Some(status_id);
  }
  if let Some(raw) = body.start_date {
    let parsed = parse_ts(Some(&raw)).ok_or_else(|| {
      ApiError::BadRequest("Invalid start date.".to_string())
    })?;
    patch.start_date = Some(parsed);
  }
  if let Some(raw) = body.end_date {
    // `null` and blank clear; anything else must parse.
    patch.end_date = Some(match raw.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(s) => Some(parse_ts(Some(s)).ok_or_else(|| {
        ApiError::BadRequest("End date must be a valid date.".to_string())
      })?),
    });
  }

  // Validate the ordering over the merged values.
  let start = patch.start_date.unwrap_or(existing.start_date);
  let end = patch.end_date.unwrap_or(existing.end_date);
  if let Some(end) = end
    && end < start
  {
    return Err(ApiError::BadRequest(
      "End date must be on or after the start date.".to_string(),
    ));
  }

  let hunt = state
    .store
    .update_hunt(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("hunt {id} not found")))?;
  Ok(Json(hunt))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /hunts/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state.store.delete_hunt(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("hunt {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
