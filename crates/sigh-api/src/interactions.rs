//! Handlers for `/interactions` (role-scoped) and `/person-interactions`
//! (person-scoped) endpoints.
//!
//! PATCH is a full re-point in both cases: the type is required and every
//! mutable field is replaced, including dropping a person attribution.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use sigh_core::{
  Id,
  interaction::{
    NewPersonInteraction, NewRoleInteraction, PersonInteraction,
    PersonInteractionUpdate, RoleInteraction, RoleInteractionUpdate, TypeScope,
  },
  store::TrackerStore,
};

use crate::{
  AppState,
  error::ApiError,
  wire::{non_empty, parse_ts},
};

use chrono::Utc;

async fn check_type<S>(
  state: &AppState<S>,
  scope: TypeScope,
  type_id: Id,
) -> Result<(), ApiError>
where
  S: TrackerStore,
{
  state
    .store
    .get_interaction_type(scope, type_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest(format!("Unknown interaction type {type_id}."))
    })?;
  Ok(())
}

async fn check_person<S>(state: &AppState<S>, person_id: Id) -> Result<(), ApiError>
where
  S: TrackerStore,
{
  state
    .store
    .get_person(person_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::BadRequest(format!("Unknown person {person_id}.")))?;
  Ok(())
}

// ─── Role-scoped ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub role_id:             Option<Id>,
  pub interaction_type_id: Option<Id>,
  pub person_id:           Option<Id>,
  pub occurred_at:         Option<String>,
  pub notes:               Option<String>,
}

/// `POST /interactions` — `company_id` is denormalised from the role.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let role_id = body
    .role_id
    .ok_or_else(|| ApiError::BadRequest("A role is required.".to_string()))?;
  let role = state
    .store
    .get_role(role_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::BadRequest(format!("Unknown role {role_id}.")))?;
  let interaction_type_id = body.interaction_type_id.ok_or_else(|| {
    ApiError::BadRequest("An interaction type is required.".to_string())
  })?;
  check_type(&state, TypeScope::Role, interaction_type_id).await?;
  if let Some(person_id) = body.person_id {
    check_person(&state, person_id).await?;
  }

  let interaction = state
    .store
    .create_role_interaction(NewRoleInteraction {
      company_id: role.company_id,
      person_id: body.person_id,
      role_id,
      interaction_type_id,
      occurred_at: parse_ts(body.occurred_at.as_deref())
        .unwrap_or_else(Utc::now),
      notes: non_empty(body.notes),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(interaction)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub interaction_type_id: Option<Id>,
  pub person_id:           Option<Id>,
  pub occurred_at:         Option<String>,
  pub notes:               Option<String>,
}

/// `PATCH /interactions/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<RoleInteraction>, ApiError>
where
  S: TrackerStore,
{
  let existing = state
    .store
    .get_role_interaction(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("interaction {id} not found")))?;

  let interaction_type_id = body.interaction_type_id.ok_or_else(|| {
    ApiError::BadRequest("An interaction type is required.".to_string())
  })?;
  check_type(&state, TypeScope::Role, interaction_type_id).await?;
  if let Some(person_id) = body.person_id {
    check_person(&state, person_id).await?;
  }

  let interaction = state
    .store
    .update_role_interaction(id, RoleInteractionUpdate {
      interaction_type_id,
      person_id: body.person_id,
      occurred_at: parse_ts(body.occurred_at.as_deref())
        .unwrap_or(existing.occurred_at),
      notes: non_empty(body.notes),
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("interaction {id} not found")))?;
  Ok(Json(interaction))
}

/// `DELETE /interactions/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state
    .store
    .delete_role_interaction(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("interaction {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Person-scoped ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonScopedBody {
  pub person_id:           Option<Id>,
  pub interaction_type_id: Option<Id>,
  pub occurred_at:         Option<String>,
  pub notes:               Option<String>,
}

/// `POST /person-interactions`
pub async fn create_person_scoped<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreatePersonScopedBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let person_id = body
    .person_id
    .ok_or_else(|| ApiError::BadRequest("A person is required.".to_string()))?;
  check_person(&state, person_id).await?;
  let interaction_type_id = body.interaction_type_id.ok_or_else(|| {
    ApiError::BadRequest("An interaction type is required.".to_string())
  })?;
  check_type(&state, TypeScope::Person, interaction_type_id).await?;

  let interaction = state
    .store
    .create_person_interaction(NewPersonInteraction {
      person_id,
      interaction_type_id,
      occurred_at: parse_ts(body.occurred_at.as_deref())
        .unwrap_or_else(Utc::now),
      notes: non_empty(body.notes),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(interaction)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonScopedBody {
  pub interaction_type_id: Option<Id>,
  pub occurred_at:         Option<String>,
  pub notes:               Option<String>,
}

/// `PATCH /person-interactions/:id`
pub async fn update_person_scoped<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdatePersonScopedBody>,
) -> Result<Json<PersonInteraction>, ApiError>
where
  S: TrackerStore,
{
  let existing = state
    .store
    .get_person_interaction(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("interaction {id} not found")))?;

  let interaction_type_id = body.interaction_type_id.ok_or_else(|| {
    ApiError::BadRequest("An interaction type is required.".to_string())
  })?;
  check_type(&state, TypeScope::Person, interaction_type_id).await?;

  let interaction = state
    .store
    .update_person_interaction(id, PersonInteractionUpdate {
      interaction_type_id,
      occurred_at: parse_ts(body.occurred_at.as_deref())
        .unwrap_or(existing.occurred_at),
      notes: non_empty(body.notes),
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("interaction {id} not found")))?;
  Ok(Json(interaction))
}

/// `DELETE /person-interactions/:id`
pub async fn delete_person_scoped<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state
    .store
    .delete_person_interaction(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("interaction {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
