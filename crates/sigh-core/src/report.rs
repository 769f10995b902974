//! In-memory aggregation over rows already fetched — the derived read models
//! behind the hunt, company, and person views.
//!
//! All of this is O(n) map-building plus one sort. Inputs that carry
//! interactions are expected newest first (occurred_at desc, id desc), which
//! is how the store returns them.

use std::{cmp::Ordering, collections::HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Id,
  interaction::{InteractionEvent, RoleInteractionDigest},
  role::{HuntRole, RoleTagLink},
  status::{ROLE_STATUSES, RoleStatus, status_for_interaction_type},
};

// ─── Role overview ───────────────────────────────────────────────────────────

/// The latest interaction recorded against a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastInteraction {
  pub id:          Id,
  pub type_name:   String,
  pub occurred_at: DateTime<Utc>,
}

/// A role with its derived display fields, as listed on the hunt page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOverview {
  pub id:                    Id,
  pub title:                 String,
  pub company_name:          String,
  pub created_at:            DateTime<Utc>,
  pub last_interaction_type: Option<String>,
  pub last_interaction_at:   Option<DateTime<Utc>>,
  pub status:                RoleStatus,
  pub tag_ids:               Vec<Id>,
}

/// Per-role derived state extracted from a newest-first interaction list.
#[derive(Debug, Default)]
pub struct RoleActivity {
  pub last_by_role:   HashMap<Id, LastInteraction>,
  pub status_by_role: HashMap<Id, RoleStatus>,
}

/// One pass over the interactions: the first row seen per role is its last
/// interaction, and the first row whose type maps to a status decides the
/// role's status.
pub fn role_activity(
  interactions_newest_first: &[RoleInteractionDigest],
) -> RoleActivity {
  let mut activity = RoleActivity::default();
  for entry in interactions_newest_first {
    activity
      .last_by_role
      .entry(entry.role_id)
      .or_insert_with(|| LastInteraction {
        id:          entry.id,
        type_name:   entry.type_name.clone(),
        occurred_at: entry.occurred_at,
      });
    if !activity.status_by_role.contains_key(&entry.role_id)
      && let Some(status) = status_for_interaction_type(&entry.type_name)
    {
      activity.status_by_role.insert(entry.role_id, status);
    }
  }
  activity
}

/// Assemble and sort the role list for a hunt page.
///
/// Sort order: most recent activity first, where a role's activity is its
/// last interaction or, failing that, its creation time. Ties fall back to
/// the higher last-interaction id (when both roles have one), then to the
/// role title.
pub fn overview_roles(
  roles: Vec<HuntRole>,
  interactions_newest_first: &[RoleInteractionDigest],
  tag_links: &[RoleTagLink],
) -> Vec<RoleOverview> {
  let activity = role_activity(interactions_newest_first);

  let mut tags_by_role: HashMap<Id, Vec<Id>> = HashMap::new();
  for link in tag_links {
    tags_by_role.entry(link.role_id).or_default().push(link.tag_id);
  }

  let mut overviews: Vec<RoleOverview> = roles
    .into_iter()
    .map(|role| {
      let last = activity.last_by_role.get(&role.id);
      RoleOverview {
        id:                    role.id,
        title:                 role.title,
        company_name:          role.company_name,
        created_at:            role.created_at,
        last_interaction_type: last.map(|l| l.type_name.clone()),
        last_interaction_at:   last.map(|l| l.occurred_at),
        status:                activity
          .status_by_role
          .get(&role.id)
          .copied()
          .unwrap_or_default(),
        tag_ids:               tags_by_role.remove(&role.id).unwrap_or_default(),
      }
    })
    .collect();

  let last_id = |o: &RoleOverview| activity.last_by_role.get(&o.id).map(|l| l.id);
  overviews.sort_by(|a, b| {
    let a_key = a.last_interaction_at.unwrap_or(a.created_at);
    let b_key = b.last_interaction_at.unwrap_or(b.created_at);
    match b_key.cmp(&a_key) {
      Ordering::Equal => match (last_id(a), last_id(b)) {
        (Some(a_id), Some(b_id)) if a_id != b_id => b_id.cmp(&a_id),
        _ => a.title.cmp(&b.title),
      },
      other => other,
    }
  });

  overviews
}

/// Count of roles per status, zero-filled over all four statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
  pub status: RoleStatus,
  pub count:  usize,
}

pub fn status_counts(overviews: &[RoleOverview]) -> Vec<StatusCount> {
  ROLE_STATUSES
    .iter()
    .map(|&status| StatusCount {
      status,
      count: overviews.iter().filter(|o| o.status == status).count(),
    })
    .collect()
}

// ─── Timelines ───────────────────────────────────────────────────────────────

/// Merge interaction events from multiple sources into one timeline, newest
/// first; same-instant events fall back to descending id.
pub fn merge_timeline(mut events: Vec<InteractionEvent>) -> Vec<InteractionEvent> {
  events.sort_by(|a, b| {
    b.occurred_at
      .cmp(&a.occurred_at)
      .then_with(|| b.id.cmp(&a.id))
  });
  events
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::interaction::EventSource;

  fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
  }

  fn role(id: Id, title: &str, created: i64) -> HuntRole {
    HuntRole {
      id,
      title: title.to_string(),
      company_name: "Acme".to_string(),
      created_at: at(created),
    }
  }

  fn digest(id: Id, role_id: Id, name: &str, occurred: i64) -> RoleInteractionDigest {
    RoleInteractionDigest {
      id,
      role_id,
      type_name: name.to_string(),
      occurred_at: at(occurred),
    }
  }

  #[test]
  fn last_interaction_is_first_row_seen() {
    let digests = vec![
      digest(9, 1, "Email", 300),
      digest(5, 1, "Interviewed", 200),
      digest(2, 1, "Application Submitted", 100),
    ];
    let activity = role_activity(&digests);
    let last = activity.last_by_role.get(&1).unwrap();
    assert_eq!(last.id, 9);
    assert_eq!(last.type_name, "Email");
  }

  #[test]
  fn status_comes_from_newest_mapping_interaction() {
    let digests = vec![
      digest(9, 1, "Email", 300),
      digest(5, 1, "Rejected", 200),
      digest(2, 1, "Offer Accepted", 100),
    ];
    let activity = role_activity(&digests);
    assert_eq!(activity.status_by_role.get(&1), Some(&RoleStatus::Rejected));
  }

  #[test]
  fn roles_sort_by_last_interaction_then_created_at() {
    let roles = vec![
      role(1, "Backend", 50),
      role(2, "Frontend", 400), // no interactions; keys on created_at
      role(3, "Platform", 60),
    ];
    let digests = vec![
      digest(20, 3, "Email", 500),
      digest(10, 1, "Email", 100),
    ];
    let sorted = overview_roles(roles, &digests, &[]);
    let ids: Vec<Id> = sorted.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
  }

  #[test]
  fn equal_keys_tie_break_on_interaction_id_then_title() {
    let roles = vec![
      role(1, "Zeppelin Wrangler", 50),
      role(2, "Analyst", 50),
      role(3, "Janitor", 50),
    ];
    // Roles 1 and 2 interacted at the same instant; role 2's row is newer.
    let digests = vec![
      digest(7, 2, "Email", 100),
      digest(4, 1, "Email", 100),
    ];
    let sorted = overview_roles(roles, &digests, &[]);
    let ids: Vec<Id> = sorted.iter().map(|o| o.id).collect();
    // 2 before 1 (higher interaction id); 3 last (older key, created_at only).
    assert_eq!(ids, vec![2, 1, 3]);

    // Neither has interactions: title decides.
    let roles = vec![role(1, "Zeppelin Wrangler", 50), role(2, "Analyst", 50)];
    let sorted = overview_roles(roles, &[], &[]);
    let titles: Vec<&str> = sorted.iter().map(|o| o.title.as_str()).collect();
    assert_eq!(titles, vec!["Analyst", "Zeppelin Wrangler"]);
  }

  #[test]
  fn tag_ids_attach_to_their_role() {
    let roles = vec![role(1, "Backend", 50), role(2, "Frontend", 60)];
    let links = vec![
      RoleTagLink { role_id: 1, tag_id: 11 },
      RoleTagLink { role_id: 1, tag_id: 12 },
    ];
    let sorted = overview_roles(roles, &[], &links);
    let backend = sorted.iter().find(|o| o.id == 1).unwrap();
    let frontend = sorted.iter().find(|o| o.id == 2).unwrap();
    assert_eq!(backend.tag_ids, vec![11, 12]);
    assert!(frontend.tag_ids.is_empty());
  }

  #[test]
  fn counts_are_zero_filled() {
    let roles = vec![role(1, "Backend", 50), role(2, "Frontend", 60)];
    let digests = vec![digest(1, 1, "Ghosted", 100)];
    let overviews = overview_roles(roles, &digests, &[]);
    let counts = status_counts(&overviews);

    let get = |status: RoleStatus| {
      counts.iter().find(|c| c.status == status).unwrap().count
    };
    assert_eq!(get(RoleStatus::Open), 1);
    assert_eq!(get(RoleStatus::Rejected), 1);
    assert_eq!(get(RoleStatus::Accepted), 0);
    assert_eq!(get(RoleStatus::Closed), 0);
    assert_eq!(counts.len(), 4);
  }

  #[test]
  fn timeline_merges_newest_first() {
    let event = |id: Id, occurred: i64| InteractionEvent {
      id,
      source: EventSource::Person,
      type_name: "Email".to_string(),
      occurred_at: at(occurred),
      notes: None,
    };
    let merged = merge_timeline(vec![event(1, 100), event(3, 300), event(2, 300)]);
    let ids: Vec<Id> = merged.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
  }
}
