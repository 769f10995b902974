//! Interactions — timestamped touch-points recorded against a role or a
//! person.
//!
//! Role-scoped and person-scoped interactions use two separate tables with
//! two separate type catalogues; the catalogues share one shape and are
//! addressed through [`TypeScope`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// Which interaction-type catalogue a type id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeScope {
  Role,
  Person,
}

/// A row from one of the interaction-type catalogues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionType {
  pub id:   Id,
  pub name: String,
}

// ─── Role-scoped ─────────────────────────────────────────────────────────────

/// An interaction recorded against a role. `company_id` is denormalised from
/// the role at insert time; `person_id` optionally attributes the touch-point
/// to a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInteraction {
  pub id:                  Id,
  pub company_id:          Id,
  pub person_id:           Option<Id>,
  pub role_id:             Id,
  pub interaction_type_id: Id,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

/// Input to [`crate::store::TrackerStore::create_role_interaction`].
#[derive(Debug, Clone)]
pub struct NewRoleInteraction {
  pub company_id:          Id,
  pub person_id:           Option<Id>,
  pub role_id:             Id,
  pub interaction_type_id: Id,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

/// Full re-point of a role interaction (PATCH semantics from the original
/// app: every mutable field is replaced, including `person_id = None`).
#[derive(Debug, Clone)]
pub struct RoleInteractionUpdate {
  pub interaction_type_id: Id,
  pub person_id:           Option<Id>,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

/// The minimal projection the hunt-page aggregation runs over: one row per
/// role interaction within a hunt, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInteractionDigest {
  pub id:          Id,
  pub role_id:     Id,
  pub type_name:   String,
  pub occurred_at: DateTime<Utc>,
}

/// A role interaction as listed on role and company pages, joined with its
/// type name and the attributed person's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInteractionView {
  pub id:                  Id,
  pub role_id:             Id,
  pub role_title:          String,
  pub interaction_type_id: Id,
  pub type_name:           String,
  pub person_id:           Option<Id>,
  pub person_name:         Option<String>,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

// ─── Person-scoped ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInteraction {
  pub id:                  Id,
  pub person_id:           Id,
  pub interaction_type_id: Id,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPersonInteraction {
  pub person_id:           Id,
  pub interaction_type_id: Id,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

#[derive(Debug, Clone)]
pub struct PersonInteractionUpdate {
  pub interaction_type_id: Id,
  pub occurred_at:         DateTime<Utc>,
  pub notes:               Option<String>,
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// Where a timeline event came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum EventSource {
  /// A person-scoped interaction.
  Person,
  /// A role-scoped interaction attributed to the person.
  #[serde(rename_all = "camelCase")]
  Role { role_id: Id, role_title: String },
}

/// One entry in a person's merged interaction timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
  pub id:          Id,
  #[serde(flatten)]
  pub source:      EventSource,
  pub type_name:   String,
  pub occurred_at: DateTime<Utc>,
  pub notes:       Option<String>,
}
