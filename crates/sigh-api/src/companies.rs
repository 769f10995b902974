//! Handlers for `/companies` endpoints.
//!
//! `POST /companies` is get-or-create on the exact name, matching how roles
//! resolve their company.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sigh_core::{
  Id,
  company::{CompanyPatch, NewCompany},
  role::CompanyRole,
  status::{RoleStatus, derive_role_status},
  store::TrackerStore,
};

use crate::{AppState, error::ApiError, wire::non_empty};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /companies` — summaries with counts and last interaction.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let companies = state
    .store
    .company_summaries()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "companies": companies })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub name:     Option<String>,
  pub url:      Option<String>,
  pub linkedin: Option<String>,
}

/// `POST /companies` — returns the existing row when the name is taken.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let name = non_empty(body.name)
    .ok_or_else(|| ApiError::BadRequest("Name is required.".to_string()))?;

  if let Some(existing) = state
    .store
    .find_company(&name)
    .await
    .map_err(ApiError::store)?
  {
    return Ok((StatusCode::OK, Json(existing)));
  }

  let company = state
    .store
    .create_company(NewCompany {
      name,
      url: non_empty(body.url),
      linkedin: non_empty(body.linkedin),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(company)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompanyRoleDetail {
  #[serde(flatten)]
  role:   CompanyRole,
  status: RoleStatus,
}

/// `GET /companies/:id` — the company with its roles (and their derived
/// statuses), people, and interactions.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let company = state
    .store
    .get_company(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("company {id} not found")))?;

  let roles = state
    .store
    .roles_for_company(id)
    .await
    .map_err(ApiError::store)?;
  let people = state
    .store
    .people_for_company(id)
    .await
    .map_err(ApiError::store)?;
  let interactions = state
    .store
    .interactions_for_company(id)
    .await
    .map_err(ApiError::store)?;

  // Interactions come back newest first, which is what the derivation wants.
  let roles: Vec<CompanyRoleDetail> = roles
    .into_iter()
    .map(|role| {
      let status = derive_role_status(
        interactions
          .iter()
          .filter(|i| i.role_id == role.id)
          .map(|i| i.type_name.as_str()),
      );
      CompanyRoleDetail { role, status }
    })
    .collect();

  Ok(Json(json!({
    "company": company,
    "roles": roles,
    "people": people,
    "interactions": interactions,
  })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub name:     Option<String>,
  /// Absent leaves the column untouched; `null` or `""` clears it.
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub url:      Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub linkedin: Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub notes:    Option<Option<String>>,
}

/// `PATCH /companies/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let mut patch = CompanyPatch::default();
  if let Some(name) = body.name {
    patch.name = Some(non_empty(Some(name)).ok_or_else(|| {
      ApiError::BadRequest("Name cannot be empty.".to_string())
    })?);
  }
  if let Some(url) = body.url {
    patch.url = Some(non_empty(url));
  }
  if let Some(linkedin) = body.linkedin {
    patch.linkedin = Some(non_empty(linkedin));
  }
  if let Some(notes) = body.notes {
    patch.notes = Some(non_empty(notes));
  }

  let company = state
    .store
    .update_company(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("company {id} not found")))?;
  Ok(Json(company))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /companies/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state
    .store
    .delete_company(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("company {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
