//! Person — a contact attached to a company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:         Id,
  pub company_id: Id,
  pub first_name: String,
  pub last_name:  String,
  pub title:      Option<String>,
  pub phone:      Option<String>,
  pub email:      Option<String>,
  pub linkedin:   Option<String>,
  pub notes:      Option<String>,
}

/// First and last name joined, skipping empty parts.
pub fn format_person_name(first_name: &str, last_name: &str) -> String {
  let first = first_name.trim();
  let last = last_name.trim();
  [first, last]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Input to [`crate::store::TrackerStore::create_person`].
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub company_id: Id,
  pub first_name: String,
  pub last_name:  String,
  pub title:      Option<String>,
  pub phone:      Option<String>,
  pub email:      Option<String>,
  pub linkedin:   Option<String>,
}

/// Partial update for a person. Inner `None` clears the column.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
  pub company_id: Option<Id>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub title:      Option<Option<String>>,
  pub phone:      Option<Option<String>>,
  pub email:      Option<Option<String>>,
  pub linkedin:   Option<Option<String>>,
  pub notes:      Option<Option<String>>,
}

/// A person with the derived fields shown on the people index: company name,
/// attached tag ids, and interaction stats merged across person-scoped and
/// role-scoped interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonOverview {
  pub id:                  Id,
  pub first_name:          String,
  pub last_name:           String,
  pub title:               Option<String>,
  pub email:               Option<String>,
  pub phone:               Option<String>,
  pub linkedin:            Option<String>,
  pub company_id:          Id,
  pub company_name:        String,
  pub tag_ids:             Vec<Id>,
  pub interaction_count:   i64,
  pub last_interaction_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use super::format_person_name;

  #[test]
  fn joins_first_and_last() {
    assert_eq!(format_person_name("Ada", "Lovelace"), "Ada Lovelace");
  }

  #[test]
  fn skips_empty_parts() {
    assert_eq!(format_person_name("  ", "Lovelace"), "Lovelace");
    assert_eq!(format_person_name("Ada", ""), "Ada");
    assert_eq!(format_person_name(" ", ""), "");
  }
}
