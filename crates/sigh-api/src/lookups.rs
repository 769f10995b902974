//! Handlers for the small lookup collections: hunt statuses, interaction
//! type catalogues, currencies, and tags.
//!
//! All the POSTs are get-or-create; re-posting an existing name returns the
//! existing row.

use axum::{
  Json,
  extract::State,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use sigh_core::{
  interaction::{InteractionType, TypeScope},
  store::TrackerStore,
};

use crate::{AppState, error::ApiError, wire::non_empty};

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: Option<String>,
}

/// `GET /hunt-statuses`
pub async fn hunt_statuses<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let statuses = state
    .store
    .list_hunt_statuses()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "statuses": statuses })))
}

// ─── Interaction types ───────────────────────────────────────────────────────

async fn interaction_types<S>(
  state: &AppState<S>,
  scope: TypeScope,
) -> Result<Json<Value>, ApiError>
where
  S: TrackerStore,
{
  let types = state
    .store
    .list_interaction_types(scope)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "types": types })))
}

async fn create_interaction_type<S>(
  state: &AppState<S>,
  scope: TypeScope,
  body: NameBody,
) -> Result<Json<InteractionType>, ApiError>
where
  S: TrackerStore,
{
  let name = non_empty(body.name)
    .ok_or_else(|| ApiError::BadRequest("Name is required.".to_string()))?;
  let ty = state
    .store
    .create_interaction_type(scope, name)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(ty))
}

/// `GET /interaction-types`
pub async fn role_interaction_types<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError>
where
  S: TrackerStore,
{
  interaction_types(&state, TypeScope::Role).await
}

/// `POST /interaction-types`
pub async fn create_role_interaction_type<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NameBody>,
) -> Result<Json<InteractionType>, ApiError>
where
  S: TrackerStore,
{
  create_interaction_type(&state, TypeScope::Role, body).await
}

/// `GET /person-interaction-types`
pub async fn person_interaction_types<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError>
where
  S: TrackerStore,
{
  interaction_types(&state, TypeScope::Person).await
}

/// `POST /person-interaction-types`
pub async fn create_person_interaction_type<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NameBody>,
) -> Result<Json<InteractionType>, ApiError>
where
  S: TrackerStore,
{
  create_interaction_type(&state, TypeScope::Person, body).await
}

// ─── Currencies ──────────────────────────────────────────────────────────────

/// `GET /currencies`
pub async fn currencies<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let currencies = state
    .store
    .list_currencies()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "currencies": currencies })))
}

#[derive(Debug, Deserialize)]
pub struct CurrencyBody {
  pub code: Option<String>,
}

/// `POST /currencies` — the code is trimmed and uppercased.
pub async fn create_currency<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CurrencyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let code = non_empty(body.code)
    .ok_or_else(|| ApiError::BadRequest("Code is required.".to_string()))?
    .to_uppercase();
  let currency = state
    .store
    .create_currency(code)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(currency))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// `GET /tags`
pub async fn tags<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let tags = state.store.list_tags().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "tags": tags })))
}

/// `POST /tags`
pub async fn create_tag<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let name = non_empty(body.name)
    .ok_or_else(|| ApiError::BadRequest("Name is required.".to_string()))?;
  let tag = state.store.create_tag(name).await.map_err(ApiError::store)?;
  Ok(Json(tag))
}
