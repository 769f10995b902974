//! Hunt — a named job-search campaign with a status and date range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// A reference row from the `hunt_status` table.
/// Seeded values: `active`, `cancelled`, `failed`, `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntStatus {
  pub id:   Id,
  pub name: String,
}

/// A job-search campaign. Roles hang off a hunt; deleting the hunt cascades
/// to its roles and their interactions and tag links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunt {
  pub id:             Id,
  pub hunt_status_id: Id,
  pub name:           String,
  pub notes:          Option<String>,
  pub start_date:     DateTime<Utc>,
  pub end_date:       Option<DateTime<Utc>>,
}

/// Input to [`crate::store::TrackerStore::create_hunt`].
#[derive(Debug, Clone)]
pub struct NewHunt {
  pub hunt_status_id: Id,
  pub name:           String,
  pub start_date:     DateTime<Utc>,
  pub end_date:       Option<DateTime<Utc>>,
}

/// Partial update for a hunt. `None` leaves a field untouched;
/// `end_date: Some(None)` clears the end date.
#[derive(Debug, Clone, Default)]
pub struct HuntPatch {
  pub name:           Option<String>,
  pub hunt_status_id: Option<Id>,
  pub start_date:     Option<DateTime<Utc>>,
  pub end_date:       Option<Option<DateTime<Utc>>>,
}

/// A hunt row joined with its status name and role count, as returned by the
/// hunts index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntListing {
  pub id:         Id,
  pub name:       String,
  pub start_date: DateTime<Utc>,
  pub end_date:   Option<DateTime<Utc>>,
  pub status_id:  Id,
  pub status:     String,
  pub role_count: i64,
}
