//! Tags — user-defined labels shared by roles and people.

use serde::{Deserialize, Serialize};

use crate::Id;

/// Tag names are unique; creating an existing name returns the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub id:   Id,
  pub name: String,
}
