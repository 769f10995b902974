//! Handlers for `/people` endpoints, including per-person tag links.

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
  person::{NewPerson, Person, PersonPatch},
  report::merge_timeline,
  store::TrackerStore,
  tag::Tag,
};

use crate::{AppState, error::ApiError, wire::non_empty};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /people` — overview rows with company names, tags, and interaction
/// stats.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let people = state
    .store
    .people_overview()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "people": people })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub company_id: Option<Id>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub title:      Option<String>,
  pub phone:      Option<String>,
  pub email:      Option<String>,
  pub linkedin:   Option<String>,
}

/// `POST /people`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let company_id = body.company_id.ok_or_else(|| {
    ApiError::BadRequest("A company is required.".to_string())
  })?;
  state
    .store
    .get_company(company_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest(format!("Unknown company {company_id}."))
    })?;
  let first_name = non_empty(body.first_name).ok_or_else(|| {
    ApiError::BadRequest("First name is required.".to_string())
  })?;
  let last_name = non_empty(body.last_name).ok_or_else(|| {
    ApiError::BadRequest("Last name is required.".to_string())
  })?;

  let person = state
    .store
    .create_person(NewPerson {
      company_id,
      first_name,
      last_name,
      title: non_empty(body.title),
      phone: non_empty(body.phone),
      email: non_empty(body.email),
      linkedin: non_empty(body.linkedin),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersonDetail {
  #[serde(flatten)]
  person:       Person,
  company_name: String,
}

/// `GET /people/:id` — the person with their tags and the merged interaction
/// timeline (person-scoped plus attributed role-scoped, newest first).
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TrackerStore,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  let company_name = state
    .store
    .get_company(person.company_id)
    .await
    .map_err(ApiError::store)?
    .map(|c| c.name)
    .unwrap_or_default();
  let tags = state
    .store
    .tags_for_person(id)
    .await
    .map_err(ApiError::store)?;

  let mut events = state
    .store
    .person_events(id)
    .await
    .map_err(ApiError::store)?;
  events.extend(
    state
      .store
      .role_events_for_person(id)
      .await
      .map_err(ApiError::store)?,
  );
  let timeline = merge_timeline(events);

  Ok(Json(json!({
    "person": PersonDetail { person, company_name },
    "tags": tags,
    "timeline": timeline,
  })))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub company_id: Option<Id>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  /// Absent leaves the column untouched; `null` or `""` clears it.
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub title:      Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub phone:      Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub email:      Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub linkedin:   Option<Option<String>>,
  #[serde(default, deserialize_with = "crate::wire::double_option")]
  pub notes:      Option<Option<String>>,
}

/// `PATCH /people/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Person>, ApiError>
where
  S: TrackerStore,
{
  let mut patch = PersonPatch::default();
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
  if let Some(first_name) = body.first_name {
    patch.first_name = Some(non_empty(Some(first_name)).ok_or_else(|| {
      ApiError::BadRequest("First name cannot be empty.".to_string())
    })?);
  }
  if let Some(last_name) = body.last_name {
    patch.last_name = Some(non_empty(Some(last_name)).ok_or_else(|| {
      ApiError::BadRequest("Last name cannot be empty.".to_string())
    })?);
  }
  if let Some(title) = body.title {
    patch.title = Some(non_empty(title));
  }
  if let Some(phone) = body.phone {
    patch.phone = Some(non_empty(phone));
  }
  if let Some(email) = body.email {
    patch.email = Some(non_empty(email));
  }
  if let Some(linkedin) = body.linkedin {
    patch.linkedin = Some(non_empty(linkedin));
  }
  if let Some(notes) = body.notes {
    patch.notes = Some(non_empty(notes));
  }

  let person = state
    .store
    .update_person(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError>
where
  S: TrackerStore,
{
  let deleted = state.store.delete_person(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("person {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Tag links ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBody {
  pub tag_id: Id,
}

async fn check_person_and_tag<S>(
  state: &AppState<S>,
  person_id: Id,
  tag_id: Id,
) -> Result<(), ApiError>
where
  S: TrackerStore,
{
  state
    .store
    .get_person(person_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {person_id} not found")))?;
  state
    .store
    .get_tag(tag_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("tag {tag_id} not found")))?;
  Ok(())
}

/// `POST /people/:id/tags` — idempotent attach; returns the person's tags.
pub async fn add_tag<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<TagBody>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: TrackerStore,
{
  check_person_and_tag(&state, id, body.tag_id).await?;
  state
    .store
    .add_person_tag(id, body.tag_id)
    .await
    .map_err(ApiError::store)?;
  let tags = state
    .store
    .tags_for_person(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(tags))
}

/// `DELETE /people/:id/tags` — detach; returns the person's remaining tags.
pub async fn remove_tag<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Id>,
  Json(body): Json<TagBody>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: TrackerStore,
{
  check_person_and_tag(&state, id, body.tag_id).await?;
  state
    .store
    .remove_person_tag(id, body.tag_id)
    .await
    .map_err(ApiError::store)?;
  let tags = state
    .store
    .tags_for_person(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(tags))
}
