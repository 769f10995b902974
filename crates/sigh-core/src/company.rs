//! Company — an employer tracked across hunts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
  pub id:       Id,
  pub name:     String,
  pub url:      Option<String>,
  pub linkedin: Option<String>,
  pub notes:    Option<String>,
}

/// Input to [`crate::store::TrackerStore::create_company`].
#[derive(Debug, Clone)]
pub struct NewCompany {
  pub name:     String,
  pub url:      Option<String>,
  pub linkedin: Option<String>,
}

/// Partial update for a company. Inner `None` clears the column.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
  pub name:     Option<String>,
  pub url:      Option<Option<String>>,
  pub linkedin: Option<Option<String>>,
  pub notes:    Option<Option<String>>,
}

/// A company with the aggregates shown on the companies index: how many
/// roles and people reference it, and the most recent interaction recorded
/// against any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
  pub id:                  Id,
  pub name:                String,
  pub url:                 Option<String>,
  pub linkedin:            Option<String>,
  pub role_count:          i64,
  pub person_count:        i64,
  pub last_interaction_at: Option<DateTime<Utc>>,
}
