//! Handlers for `/roles` endpoints, including tag links and the description
//! document upload.

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sigh_core::{
  Id,
  company::NewCompany,
  interaction::TypeScope,
  role::{NewRole, Role, RolePatch},
  status::{RoleStatus, derive_role_status},
  store::TrackerStore,
  tag::Tag,
};

use crate::{AppState, error::ApiError, wire::non_empty};

fn check_salary(
  lower: Option<i64>,
  higher: Option<i64>,
) -> Result<(), ApiError> {
  if lower.is_some_and(|v| v < 0) || higher.is_some_and(|v| v < 0) {
    return Err(ApiError::BadRequest(
      "Salary must be a non-negative amount.".to_string(),
    ));
  }
  if let (Some(lower), Some(higher)) = (lower, higher)
    && lower > higher
  {
    return Err(ApiError::BadRequest(
      "Salary lower end cannot exceed the higher end.".to_string(),
    ));
  }
  Ok(())
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub title:             Option<String>,
  pub hunt_id:           Option<Id>,
  pub company_id:        Option<Id>,
  pub company_name:      Option<String>,
  pub company_url:       Option<String>,
  pub company_linkedin:  Option<String>,
  pub description:       Option<String>,
  pub salary_lower_end:  Option<i64>,
  pub salary_higher_end: Option<i64>,
  pub currency_id:       Option<Id>,
}

/// `POST /roles` — the company is referenced by id or resolved (get or
/// create) by name.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let title = non_empty(body.title)
    .ok_or_else(|| ApiError::BadRequest("Title is required.".to_string()))?;
  let hunt_id = body
    .hunt_id
    .ok_or_else(|| ApiError::BadRequest("A hunt is required.".to_string()))?;
  state
    .store
    .get_hunt(hunt_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::BadRequest(format!("Unknown hunt {hunt_id}.")))?;

  let company_id = match body.company_id {
    Some(company_id) => {
      state
        .store
        .get_company(company_id)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| {
          ApiError::BadRequest(format!("Unknown company {company_id}."))
        })?
        .id
    }
    None => {
      let name = non_empty(body.company_name).ok_or_else(|| {
        ApiError::BadRequest("A company is required.".to_string())
      })?;
      match state
        .store
        .find_company(&name)
        .await
        .map_err(ApiError::store)?
      {
        Some(existing) => existing.id,
        None => {
          state
            .store
            .create_company(NewCompany {
              name,
              url: non_empty(body.company_url),
              linkedin: non_empty(body.company_linkedin),
            })
            .await
            .map_err(ApiError::store)?
            .id
        }
      }
    }
  };

  check_salary(body.salary_lower_end, body.salary_higher_end)?;
  if let Some(currency_id) = body.currency_id {
    state
      .store
      .get_currency(currency_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown currency {currency_id}."))
      })?;
  }

  let role = state
    .store
    .create_role(NewRole {
      hunt_id,
      company_id,
      title,
      description: non_empty(body.description),
      salary_lower_end: body.salary_lower_end,
      salary_higher_end: body.salary_higher_end,
      currency_id: body.currency_id,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(role)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleDetail {
  #[serde(flatten)]
  role:         Role,
  company_name: String,
  hunt_name:    String,
  status:       RoleStatus,
}

/// `GET /roles/:id` — the role with its context, derived status, tags,
/// lookup collections, the company's people, and its interactions.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let role = state
    .store
    .get_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;

  let company = state
    .store
    .get_company(role.company_id)
    .await
    .map_err(ApiError::store)?;
  let hunt = state
    .store
    .get_hunt(role.hunt_id)
    .await
    .map_err(ApiError::store)?;
  let currency = match role.currency_id {
    Some(currency_id) => state
      .store
      .get_currency(currency_id)
      .await
      .map_err(ApiError::store)?,
    None => None,
  };

  let interactions = state
    .store
    .interactions_for_role(id)
    .await
    .map_err(ApiError::store)?;
  let status =
    derive_role_status(interactions.iter().map(|i| i.type_name.as_str()));
  let tags = state.store.tags_for_role(id).await.map_err(ApiError::store)?;
  let people = state
    .store
    .people_for_company(role.company_id)
    .await
    .map_err(ApiError::store)?;
  let currencies = state
    .store
    .list_currencies()
    .await
    .map_err(ApiError::store)?;
  let interaction_types = state
    .store
    .list_interaction_types(TypeScope::Role)
    .await
    .map_err(ApiError::store)?;

  let company_name = company.as_ref().map(|c| c.name.clone()).unwrap_or_default();
  let hunt_name = hunt.map(|h| h.name).unwrap_or_default();

  Ok(Json(json!({
    "role": RoleDetail { role, company_name, hunt_name, status },
    "company": company,
    "currency": currency,
    "tags": tags,
    "people": people,
    "currencies": currencies,
    "interactionTypes": interaction_types,
    "interactions": interactions,
  })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub title:             Option<String>,
  pub company_id:        Option<Id>,
  /// Absent leaves the column untouched; `null` or `""` clears it.
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub description:       Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub notes:             Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub salary_lower_end:  Option<Option<i64>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub salary_higher_end: Option<Option<i64>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub currency_id:       Option<Option<Id>>,
}

/// `PATCH /roles/:id` — the salary ordering check runs over the merged
/// (existing + patched) values.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Role>, ApiError>
where
  S: TrackerStore,
{
  let existing = state
    .store
    .get_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;

  let mut patch = RolePatch::default();
  if let Some(title) = body.title {
    patch.title = Some(non_empty(Some(title)).ok_or_else(|| {
      ApiError::BadRequest("Title cannot be empty.".to_string())
    })?);
  }
  if let Some(company_id) = body.company_id {
    state
      .store
      .get_company(company_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown company {company_id}."))
      })?;
    patch.company_id = Some(company_id);
  }
  if let Some(description) = body.description {
    patch.description = Some(non_empty(description));
  }
  if let Some(notes) = body.notes {
    patch.notes = Some(non_empty(notes));
  }
  if let Some(lower) = body.salary_lower_end {
    patch.salary_lower_end = Some(lower);
  }
  if let Some(higher) = body.salary_higher_end {
    patch.salary_higher_end = Some(higher);
  }
  if let Some(currency_id) = body.currency_id {
    if let Some(currency_id) = currency_id {
      state
        .store
        .get_currency(currency_id)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| {
          ApiError::BadRequest(format!("Unknown currency {currency_id}."))
        })?;
    }
    patch.currency_id = Some(currency_id);
  }

  let lower = patch
    .salary_lower_end
    .unwrap_or(existing.salary_lower_end);
  let higher = patch
    .salary_higher_end
    .unwrap_or(existing.salary_higher_end);
  check_salary(lower, higher)?;

  let role = state
    .store
    .update_role(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;
  Ok(Json(role))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /roles/:id` — cascades in the store, then best-effort removes the
/// stored description document.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state
    .store
    .delete_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;
  if let Some(stored) = deleted.description_document_path {
    state.attachments.remove(&stored).await;
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Tag links ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBody {
  pub tag_id: Id,
}

async fn check_role_and_tag<S>(
  state: &AppState<S>,
  role_id: Id,
  tag_id: Id,
) -> Result<(), ApiError>
where
  S: TrackerStore,
{
  state
    .store
    .get_role(role_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {role_id} not found")))?;
  state
    .store
    .get_tag(tag_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("tag {tag_id} not found")))?;
  Ok(())
}

/// `POST /roles/:id/tags` — idempotent attach; returns the role's tags.
pub async fn add_tag<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<TagBody>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: TrackerStore,
{
  check_role_and_tag(&state, id, body.tag_id).await?;
  state
    .store
    .add_role_tag(id, body.tag_id)
    .await
    .map_err(ApiError::store)?;
  let tags = state.store.tags_for_role(id).await.map_err(ApiError::store)?;
  Ok(Json(tags))
}

/// `DELETE /roles/:id/tags` — detach; returns the role's remaining tags.
pub async fn remove_tag<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<TagBody>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: TrackerStore,
{
  check_role_and_tag(&state, id, body.tag_id).await?;
  state
    .store
    .remove_role_tag(id, body.tag_id)
    .await
    .map_err(ApiError::store)?;
  let tags = state.store.tags_for_role(id).await.map_err(ApiError::store)?;
  Ok(Json(tags))
}

// ─── Description document ────────────────────────────────────────────────────

/// `POST /roles/:id/description-document` — multipart upload, field `file`.
/// Replaces any previously stored document.
pub async fn upload_document<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let role = state
    .store
    .get_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;

  let mut upload: Option<(String, Vec<u8>)> = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?
  {
    if field.name() != Some("file") {
      continue;
    }
    let original = field
      .file_name()
      .map(str::to_string)
      .unwrap_or_else(|| "document".to_string());
    let bytes = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    upload = Some((original, bytes.to_vec()));
    break;
  }
  let (original, bytes) = upload.ok_or_else(|| {
    ApiError::BadRequest("A `file` field is required.".to_string())
  })?;

  let stored = state
    .attachments
    .save(&original, &bytes)
    .await
    .map_err(ApiError::store)?;
  if let Some(previous) = role.description_document_path {
    state.attachments.remove(&previous).await;
  }
  state
    .store
    .set_role_document(id, stored.clone(), original.clone())
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    Json(json!({ "path": stored, "name": original })),
  ))
}

/// `DELETE /roles/:id/description-document`
pub async fn delete_document<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let role = state
    .store
    .get_role(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("role {id} not found")))?;
  if let Some(stored) = role.description_document_path {
    state.attachments.remove(&stored).await;
  }
  state
    .store
    .clear_role_document(id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
