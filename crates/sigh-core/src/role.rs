//! Role — a job posting tracked within a hunt, linked to a company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// A salary currency (`USD`, `EUR`, ...). Seeded at store initialisation;
/// new codes can be added through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
  pub id:   Id,
  pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
  pub id:                        Id,
  pub hunt_id:                   Id,
  pub company_id:                Id,
  pub title:                     String,
  /// Server-assigned at creation; never updated.
  pub created_at:                DateTime<Utc>,
  pub description:               Option<String>,
  /// Stored filename of the uploaded description document, relative to the
  /// attachments root.
  pub description_document_path: Option<String>,
  /// The original filename the document was uploaded with.
  pub description_document_name: Option<String>,
  pub notes:                     Option<String>,
  pub salary_lower_end:          Option<i64>,
  pub salary_higher_end:         Option<i64>,
  pub currency_id:               Option<Id>,
}

/// Input to [`crate::store::TrackerStore::create_role`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewRole {
  pub hunt_id:           Id,
  pub company_id:        Id,
  pub title:             String,
  pub description:       Option<String>,
  pub salary_lower_end:  Option<i64>,
  pub salary_higher_end: Option<i64>,
  pub currency_id:       Option<Id>,
}

/// Partial update for a role. Inner `None` clears the column.
#[derive(Debug, Clone, Default)]
pub struct RolePatch {
  pub title:             Option<String>,
  pub company_id:        Option<Id>,
  pub description:       Option<Option<String>>,
  pub notes:             Option<Option<String>>,
  pub salary_lower_end:  Option<Option<i64>>,
  pub salary_higher_end: Option<Option<i64>>,
  pub currency_id:       Option<Option<Id>>,
}

/// A role row joined with its company name, as listed on a hunt page before
/// aggregation (see [`crate::report`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntRole {
  pub id:           Id,
  pub title:        String,
  pub company_name: String,
  pub created_at:   DateTime<Utc>,
}

/// A role as listed on a company page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRole {
  pub id:         Id,
  pub hunt_id:    Id,
  pub title:      String,
  pub created_at: DateTime<Utc>,
}

/// A (role, tag) link row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTagLink {
  pub role_id: Id,
  pub tag_id:  Id,
}
