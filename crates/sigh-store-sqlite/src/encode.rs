//! Row-level encoding between SQLite column values and domain types.
//!
//! Timestamps live in the database as INTEGER milliseconds since the epoch.
//! Rows are read into `Raw*` structs inside the connection closure (where
//! only [`rusqlite::Error`] can surface) and converted to domain types
//! outside it, where a bad timestamp maps to [`Error::Timestamp`].

use chrono::{DateTime, TimeZone, Utc};

use sigh_core::{
  company::CompanySummary,
  hunt::{Hunt, HuntListing},
  interaction::{
    PersonInteraction, RoleInteraction, RoleInteractionDigest,
    RoleInteractionView,
  },
  person::format_person_name,
  role::{CompanyRole, HuntRole, Role},
};

use crate::{Error, Result};

pub fn encode_ts(ts: DateTime<Utc>) -> i64 {
  ts.timestamp_millis()
}

pub fn encode_ts_opt(ts: Option<DateTime<Utc>>) -> Option<i64> {
  ts.map(encode_ts)
}

pub fn decode_ts(ms: i64) -> Result<DateTime<Utc>> {
  Utc.timestamp_millis_opt(ms).single().ok_or(Error::Timestamp(ms))
}

pub fn decode_ts_opt(ms: Option<i64>) -> Result<Option<DateTime<Utc>>> {
  ms.map(decode_ts).transpose()
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawHunt {
  pub id:             i64,
  pub hunt_status_id: i64,
  pub name:           String,
  pub notes:          Option<String>,
  pub start_date:     i64,
  pub end_date:       Option<i64>,
}

impl RawHunt {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      hunt_status_id: row.get(1)?,
      name:           row.get(2)?,
      notes:          row.get(3)?,
      start_date:     row.get(4)?,
      end_date:       row.get(5)?,
    })
  }

  pub fn into_hunt(self) -> Result<Hunt> {
    Ok(Hunt {
      id:             self.id,
      hunt_status_id: self.hunt_status_id,
      name:           self.name,
      notes:          self.notes,
      start_date:     decode_ts(self.start_date)?,
      end_date:       decode_ts_opt(self.end_date)?,
    })
  }
}

pub struct RawHuntListing {
  pub id:         i64,
  pub name:       String,
  pub start_date: i64,
  pub end_date:   Option<i64>,
  pub status_id:  i64,
  pub status:     String,
  pub role_count: i64,
}

impl RawHuntListing {
  pub fn into_listing(self) -> Result<HuntListing> {
    Ok(HuntListing {
      id:         self.id,
      name:       self.name,
      start_date: decode_ts(self.start_date)?,
      end_date:   decode_ts_opt(self.end_date)?,
      status_id:  self.status_id,
      status:     self.status,
      role_count: self.role_count,
    })
  }
}

pub struct RawRole {
  pub id:                        i64,
  pub hunt_id:                   i64,
  pub company_id:                i64,
  pub title:                     String,
  pub created_at:                i64,
  pub description:               Option<String>,
  pub description_document_path: Option<String>,
  pub description_document_name: Option<String>,
  pub notes:                     Option<String>,
  pub salary_lower_end:          Option<i64>,
  pub salary_higher_end:         Option<i64>,
  pub currency_id:               Option<i64>,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                        row.get(0)?,
      hunt_id:                   row.get(1)?,
      company_id:                row.get(2)?,
      title:                     row.get(3)?,
      created_at:                row.get(4)?,
      description:               row.get(5)?,
      description_document_path: row.get(6)?,
      description_document_name: row.get(7)?,
      notes:                     row.get(8)?,
      salary_lower_end:          row.get(9)?,
      salary_higher_end:         row.get(10)?,
      currency_id:               row.get(11)?,
    })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role {
      id:                        self.id,
      hunt_id:                   self.hunt_id,
      company_id:                self.company_id,
      title:                     self.title,
      created_at:                decode_ts(self.created_at)?,
      description:               self.description,
      description_document_path: self.description_document_path,
      description_document_name: self.description_document_name,
      notes:                     self.notes,
      salary_lower_end:          self.salary_lower_end,
      salary_higher_end:         self.salary_higher_end,
      currency_id:               self.currency_id,
    })
  }
}

pub struct RawHuntRole {
  pub id:           i64,
  pub title:        String,
  pub company_name: String,
  pub created_at:   i64,
}

impl RawHuntRole {
  pub fn into_hunt_role(self) -> Result<HuntRole> {
    Ok(HuntRole {
      id:           self.id,
      title:        self.title,
      company_name: self.company_name,
      created_at:   decode_ts(self.created_at)?,
    })
  }
}

pub struct RawCompanyRole {
  pub id:         i64,
  pub hunt_id:    i64,
  pub title:      String,
  pub created_at: i64,
}

impl RawCompanyRole {
  pub fn into_company_role(self) -> Result<CompanyRole> {
    Ok(CompanyRole {
      id:         self.id,
      hunt_id:    self.hunt_id,
      title:      self.title,
      created_at: decode_ts(self.created_at)?,
    })
  }
}

pub struct RawCompanySummary {
  pub id:                  i64,
  pub name:                String,
  pub url:                 Option<String>,
  pub linkedin:            Option<String>,
  pub role_count:          i64,
  pub person_count:        i64,
  pub last_interaction_at: Option<i64>,
}

impl RawCompanySummary {
  pub fn into_summary(self) -> Result<CompanySummary> {
    Ok(CompanySummary {
      id:                  self.id,
      name:                self.name,
      url:                 self.url,
      linkedin:            self.linkedin,
      role_count:          self.role_count,
      person_count:        self.person_count,
      last_interaction_at: decode_ts_opt(self.last_interaction_at)?,
    })
  }
}

pub struct RawRoleInteraction {
  pub id:                  i64,
  pub company_id:          i64,
  pub person_id:           Option<i64>,
  pub role_id:             i64,
  pub interaction_type_id: i64,
  pub occurred_at:         i64,
  pub notes:               Option<String>,
}

impl RawRoleInteraction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      company_id:          row.get(1)?,
      person_id:           row.get(2)?,
      role_id:             row.get(3)?,
      interaction_type_id: row.get(4)?,
      occurred_at:         row.get(5)?,
      notes:               row.get(6)?,
    })
  }

  pub fn into_interaction(self) -> Result<RoleInteraction> {
    Ok(RoleInteraction {
      id:                  self.id,
      company_id:          self.company_id,
      person_id:           self.person_id,
      role_id:             self.role_id,
      interaction_type_id: self.interaction_type_id,
      occurred_at:         decode_ts(self.occurred_at)?,
      notes:               self.notes,
    })
  }
}

pub struct RawRoleInteractionDigest {
  pub id:          i64,
  pub role_id:     i64,
  pub type_name:   String,
  pub occurred_at: i64,
}

impl RawRoleInteractionDigest {
  pub fn into_digest(self) -> Result<RoleInteractionDigest> {
    Ok(RoleInteractionDigest {
      id:          self.id,
      role_id:     self.role_id,
      type_name:   self.type_name,
      occurred_at: decode_ts(self.occurred_at)?,
    })
  }
}

/// Joined interaction row before name formatting; person columns come from a
/// LEFT JOIN and are NULL for unattributed interactions.
pub struct RawRoleInteractionView {
  pub id:                  i64,
  pub role_id:             i64,
  pub role_title:          String,
  pub interaction_type_id: i64,
  pub type_name:           String,
  pub person_id:           Option<i64>,
  pub first_name:          Option<String>,
  pub last_name:           Option<String>,
  pub occurred_at:         i64,
  pub notes:               Option<String>,
}

impl RawRoleInteractionView {
  pub fn into_view(self) -> Result<RoleInteractionView> {
    let person_name = self.person_id.map(|_| {
      format_person_name(
        self.first_name.as_deref().unwrap_or(""),
        self.last_name.as_deref().unwrap_or(""),
      )
    });
    Ok(RoleInteractionView {
      id:                  self.id,
      role_id:             self.role_id,
      role_title:          self.role_title,
      interaction_type_id: self.interaction_type_id,
      type_name:           self.type_name,
      person_id:           self.person_id,
      person_name,
      occurred_at:         decode_ts(self.occurred_at)?,
      notes:               self.notes,
    })
  }
}

pub struct RawPersonInteraction {
  pub id:                  i64,
  pub person_id:           i64,
  pub interaction_type_id: i64,
  pub occurred_at:         i64,
  pub notes:               Option<String>,
}

impl RawPersonInteraction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      person_id:           row.get(1)?,
      interaction_type_id: row.get(2)?,
      occurred_at:         row.get(3)?,
      notes:               row.get(4)?,
    })
  }

  pub fn into_interaction(self) -> Result<PersonInteraction> {
    Ok(PersonInteraction {
      id:                  self.id,
      person_id:           self.person_id,
      interaction_type_id: self.interaction_type_id,
      occurred_at:         decode_ts(self.occurred_at)?,
      notes:               self.notes,
    })
  }
}
