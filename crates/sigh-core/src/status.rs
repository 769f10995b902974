//! Derived role status.
//!
//! A role's status is never stored. It is decided by the most recent
//! interaction whose type name carries a terminal meaning; everything else
//! (emails, calls, interviews) leaves the role `Open`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The derived status label of a role.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum RoleStatus {
  #[default]
  Open,
  Accepted,
  Rejected,
  Closed,
}

/// All statuses, in the order the hunt page lists its counters.
pub const ROLE_STATUSES: [RoleStatus; 4] = [
  RoleStatus::Open,
  RoleStatus::Accepted,
  RoleStatus::Rejected,
  RoleStatus::Closed,
];

impl RoleStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      RoleStatus::Open => "Open",
      RoleStatus::Accepted => "Accepted",
      RoleStatus::Rejected => "Rejected",
      RoleStatus::Closed => "Closed",
    }
  }
}

impl fmt::Display for RoleStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Map an interaction-type name to the status it implies, if any.
/// Matching is trimmed and case-insensitive.
pub fn status_for_interaction_type(type_name: &str) -> Option<RoleStatus> {
  match type_name.trim().to_lowercase().as_str() {
    "offer accepted" => Some(RoleStatus::Accepted),
    "offer declined" => Some(RoleStatus::Closed),
    "decision to not pursue" => Some(RoleStatus::Closed),
    "rejected" => Some(RoleStatus::Rejected),
    "ghosted" => Some(RoleStatus::Rejected),
    _ => None,
  }
}

/// Derive a role's status from its interaction-type names, newest first.
/// The first name that maps to a status wins; a role with no mapping
/// interactions is `Open`.
pub fn derive_role_status<'a>(
  type_names_newest_first: impl IntoIterator<Item = &'a str>,
) -> RoleStatus {
  type_names_newest_first
    .into_iter()
    .find_map(status_for_interaction_type)
    .unwrap_or_default()
}
