//! [`SqliteStore`] — the SQLite implementation of [`TrackerStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, params, params_from_iter, types::Value};

use sigh_core::{
  Id,
  company::{Company, CompanyPatch, CompanySummary, NewCompany},
  hunt::{Hunt, HuntListing, HuntPatch, HuntStatus, NewHunt},
  interaction::{
    EventSource, InteractionEvent, InteractionType, NewPersonInteraction,
    NewRoleInteraction, PersonInteraction, PersonInteractionUpdate,
    RoleInteraction, RoleInteractionDigest, RoleInteractionUpdate,
    RoleInteractionView, TypeScope,
  },
  person::{NewPerson, Person, PersonOverview, PersonPatch},
  role::{CompanyRole, Currency, HuntRole, NewRole, Role, RolePatch, RoleTagLink},
  store::TrackerStore,
  tag::Tag,
};

use crate::{
  Error, Result,
  encode::{
    RawCompanyRole, RawCompanySummary, RawHunt, RawHuntListing, RawHuntRole,
    RawPersonInteraction, RawRole, RawRoleInteraction, RawRoleInteractionDigest,
    RawRoleInteractionView, decode_ts, decode_ts_opt, encode_ts, encode_ts_opt,
  },
  schema::{SCHEMA, SEED},
};

const HUNT_COLS: &str = "id, hunt_status_id, name, notes, start_date, end_date";
const COMPANY_COLS: &str = "id, name, url, linkedin, notes";
const PERSON_COLS: &str =
  "id, company_id, first_name, last_name, title, phone, email, linkedin, notes";
const ROLE_COLS: &str = "id, hunt_id, company_id, title, created_at, \
   description, description_document_path, description_document_name, notes, \
   salary_lower_end, salary_higher_end, currency_id";
const ROLE_INTERACTION_COLS: &str =
  "id, company_id, person_id, role_id, interaction_type_id, occurred_at, notes";
const PERSON_INTERACTION_COLS: &str =
  "id, person_id, interaction_type_id, occurred_at, notes";

fn company_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Company> {
  Ok(Company {
    id:       row.get(0)?,
    name:     row.get(1)?,
    url:      row.get(2)?,
    linkedin: row.get(3)?,
    notes:    row.get(4)?,
  })
}

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:         row.get(0)?,
    company_id: row.get(1)?,
    first_name: row.get(2)?,
    last_name:  row.get(3)?,
    title:      row.get(4)?,
    phone:      row.get(5)?,
    email:      row.get(6)?,
    linkedin:   row.get(7)?,
    notes:      row.get(8)?,
  })
}

/// The interaction-type catalogue table for a scope.
fn type_table(scope: TypeScope) -> &'static str {
  match scope {
    TypeScope::Role => "interaction_type_role",
    TypeScope::Person => "interaction_type_person",
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sigh tracker store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and seed
  /// the reference tables.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(SEED)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_hunt(&self, id: Id) -> Result<Option<Hunt>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {HUNT_COLS} FROM hunt WHERE id = ?1"),
            params![id],
            RawHunt::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawHunt::into_hunt).transpose()
  }

  async fn fetch_role(&self, id: Id) -> Result<Option<Role>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {ROLE_COLS} FROM role WHERE id = ?1"),
            params![id],
            RawRole::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawRole::into_role).transpose()
  }
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = Error;

  // ── Hunts ─────────────────────────────────────────────────────────────

  async fn list_hunts(&self) -> Result<Vec<HuntListing>> {
    let raw = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT h.id, h.name, h.start_date, h.end_date,
                  h.hunt_status_id, s.name, COUNT(r.id)
             FROM hunt h
             JOIN hunt_status s ON s.id = h.hunt_status_id
             LEFT JOIN role r ON r.hunt_id = h.id
            GROUP BY h.id
            ORDER BY h.start_date DESC, h.id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawHuntListing {
              id:         row.get(0)?,
              name:       row.get(1)?,
              start_date: row.get(2)?,
              end_date:   row.get(3)?,
              status_id:  row.get(4)?,
              status:     row.get(5)?,
              role_count: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawHuntListing::into_listing).collect()
  }

  async fn get_hunt(&self, id: Id) -> Result<Option<Hunt>> {
    self.fetch_hunt(id).await
  }

  async fn create_hunt(&self, input: NewHunt) -> Result<Hunt> {
    let start_date = encode_ts(input.start_date);
    let end_date = encode_ts_opt(input.end_date);
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO hunt (hunt_status_id, name, start_date, end_date)
           VALUES (?1, ?2, ?3, ?4)",
          params![input.hunt_status_id, input.name, start_date, end_date],
        )?;
        let id = conn.last_insert_rowid();
        let raw = conn.query_row(
          &format!("SELECT {HUNT_COLS} FROM hunt WHERE id = ?1"),
          params![id],
          RawHunt::from_row,
        )?;
        Ok(raw)
      })
      .await?;
    raw.into_hunt()
  }

  async fn update_hunt(&self, id: Id, patch: HuntPatch) -> Result<Option<Hunt>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = patch.name {
          sets.push("name = ?");
          values.push(Value::from(name));
        }
        if let Some(status_id) = patch.hunt_status_id {
          sets.push("hunt_status_id = ?");
          values.push(Value::from(status_id));
        }
        if let Some(start) = patch.start_date {
          sets.push("start_date = ?");
          values.push(Value::from(encode_ts(start)));
        }
        if let Some(end) = patch.end_date {
          sets.push("end_date = ?");
          values.push(Value::from(encode_ts_opt(end)));
        }
        if !sets.is_empty() {
          values.push(Value::from(id));
          conn.execute(
            &format!("UPDATE hunt SET {} WHERE id = ?", sets.join(", ")),
            params_from_iter(values),
          )?;
        }
        let raw = conn
          .query_row(
            &format!("SELECT {HUNT_COLS} FROM hunt WHERE id = ?1"),
            params![id],
            RawHunt::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawHunt::into_hunt).transpose()
  }

  async fn delete_hunt(&self, id: Id) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row("SELECT 1 FROM hunt WHERE id = ?1", params![id], |_| {
            Ok(true)
          })
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "DELETE FROM interaction_role
            WHERE role_id IN (SELECT id FROM role WHERE hunt_id = ?1)",
          params![id],
        )?;
        tx.execute(
          "DELETE FROM role_tag
            WHERE role_id IN (SELECT id FROM role WHERE hunt_id = ?1)",
          params![id],
        )?;
        tx.execute("DELETE FROM role WHERE hunt_id = ?1", params![id])?;
        tx.execute("DELETE FROM hunt WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  async fn list_hunt_statuses(&self) -> Result<Vec<HuntStatus>> {
    let statuses = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name FROM hunt_status ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(HuntStatus { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(statuses)
  }

  async fn get_hunt_status(&self, id: Id) -> Result<Option<HuntStatus>> {
    let status = self
      .conn
      .call(move |conn| {
        let status = conn
          .query_row(
            "SELECT id, name FROM hunt_status WHERE id = ?1",
            params![id],
            |row| Ok(HuntStatus { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?;
        Ok(status)
      })
      .await?;
    Ok(status)
  }

  // ── Companies ─────────────────────────────────────────────────────────

  async fn company_summaries(&self) -> Result<Vec<CompanySummary>> {
    let raw = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, url, linkedin FROM company ORDER BY name, id",
        )?;
        let companies = stmt
          .query_map([], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, Option<String>>(2)?,
              row.get::<_, Option<String>>(3)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let counts = |sql: &str| -> rusqlite::Result<HashMap<i64, i64>> {
          let mut stmt = conn.prepare(sql)?;
          let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(i64, i64)>>>()?;
          Ok(rows.into_iter().collect())
        };
        let role_counts =
          counts("SELECT company_id, COUNT(*) FROM role GROUP BY company_id")?;
        let person_counts =
          counts("SELECT company_id, COUNT(*) FROM person GROUP BY company_id")?;
        let last_role = counts(
          "SELECT company_id, MAX(occurred_at)
             FROM interaction_role GROUP BY company_id",
        )?;
        let last_person = counts(
          "SELECT p.company_id, MAX(ip.occurred_at)
             FROM interaction_person ip
             JOIN person p ON p.id = ip.person_id
            GROUP BY p.company_id",
        )?;

        let summaries = companies
          .into_iter()
          .map(|(id, name, url, linkedin)| {
            let last = match (last_role.get(&id), last_person.get(&id)) {
              (Some(&a), Some(&b)) => Some(a.max(b)),
              (Some(&a), None) => Some(a),
              (None, Some(&b)) => Some(b),
              (None, None) => None,
            };
            RawCompanySummary {
              id,
              name,
              url,
              linkedin,
              role_count: role_counts.get(&id).copied().unwrap_or(0),
              person_count: person_counts.get(&id).copied().unwrap_or(0),
              last_interaction_at: last,
            }
          })
          .collect::<Vec<_>>();
        Ok(summaries)
      })
      .await?;
    raw.into_iter().map(RawCompanySummary::into_summary).collect()
  }

  async fn get_company(&self, id: Id) -> Result<Option<Company>> {
    let company = self
      .conn
      .call(move |conn| {
        let company = conn
          .query_row(
            &format!("SELECT {COMPANY_COLS} FROM company WHERE id = ?1"),
            params![id],
            company_from_row,
          )
          .optional()?;
        Ok(company)
      })
      .await?;
    Ok(company)
  }

  async fn find_company(&self, name: &str) -> Result<Option<Company>> {
    let name = name.to_owned();
    let company = self
      .conn
      .call(move |conn| {
        let company = conn
          .query_row(
            &format!("SELECT {COMPANY_COLS} FROM company WHERE name = ?1"),
            params![name],
            company_from_row,
          )
          .optional()?;
        Ok(company)
      })
      .await?;
    Ok(company)
  }

  async fn create_company(&self, input: NewCompany) -> Result<Company> {
    let company = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO company (name, url, linkedin) VALUES (?1, ?2, ?3)",
          params![input.name, input.url, input.linkedin],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Company {
          id,
          name: input.name,
          url: input.url,
          linkedin: input.linkedin,
          notes: None,
        })
      })
      .await?;
    Ok(company)
  }

  async fn update_company(
    &self,
    id: Id,
    patch: CompanyPatch,
  ) -> Result<Option<Company>> {
    let company = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(name) = patch.name {
          sets.push("name = ?");
          values.push(Value::from(name));
        }
        if let Some(url) = patch.url {
          sets.push("url = ?");
          values.push(Value::from(url));
        }
        if let Some(linkedin) = patch.linkedin {
          sets.push("linkedin = ?");
          values.push(Value::from(linkedin));
        }
        if let Some(notes) = patch.notes {
          sets.push("notes = ?");
          values.push(Value::from(notes));
        }
        if !sets.is_empty() {
          values.push(Value::from(id));
          conn.execute(
            &format!("UPDATE company SET {} WHERE id = ?", sets.join(", ")),
            params_from_iter(values),
          )?;
        }
        let company = conn
          .query_row(
            &format!("SELECT {COMPANY_COLS} FROM company WHERE id = ?1"),
            params![id],
            company_from_row,
          )
          .optional()?;
        Ok(company)
      })
      .await?;
    Ok(company)
  }

  async fn delete_company(&self, id: Id) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row("SELECT 1 FROM company WHERE id = ?1", params![id], |_| {
            Ok(true)
          })
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        // Roles and everything hanging off them.
        tx.execute(
          "DELETE FROM interaction_role
            WHERE role_id IN (SELECT id FROM role WHERE company_id = ?1)",
          params![id],
        )?;
        tx.execute(
          "DELETE FROM role_tag
            WHERE role_id IN (SELECT id FROM role WHERE company_id = ?1)",
          params![id],
        )?;
        tx.execute("DELETE FROM role WHERE company_id = ?1", params![id])?;
        // People: detach from surviving role interactions, then remove.
        tx.execute(
          "UPDATE interaction_role SET person_id = NULL
            WHERE person_id IN (SELECT id FROM person WHERE company_id = ?1)",
          params![id],
        )?;
        tx.execute(
          "DELETE FROM interaction_person
            WHERE person_id IN (SELECT id FROM person WHERE company_id = ?1)",
          params![id],
        )?;
        tx.execute(
          "DELETE FROM person_tag
            WHERE person_id IN (SELECT id FROM person WHERE company_id = ?1)",
          params![id],
        )?;
        tx.execute("DELETE FROM person WHERE company_id = ?1", params![id])?;
        tx.execute("DELETE FROM company WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  // ── People ────────────────────────────────────────────────────────────

  async fn people_overview(&self) -> Result<Vec<PersonOverview>> {
    type BaseRow = (
      i64,
      String,
      String,
      Option<String>,
      Option<String>,
      Option<String>,
      Option<String>,
      i64,
      String,
    );
    let (people, tag_links, touches) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.id, p.first_name, p.last_name, p.title, p.email,
                  p.phone, p.linkedin, p.company_id, c.name
             FROM person p
             JOIN company c ON c.id = p.company_id
            ORDER BY p.first_name, p.last_name, p.id",
        )?;
        let people = stmt
          .query_map([], |row| {
            Ok::<BaseRow, _>((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
              row.get(5)?,
              row.get(6)?,
              row.get(7)?,
              row.get(8)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn
          .prepare("SELECT person_id, tag_id FROM person_tag ORDER BY tag_id")?;
        let tag_links = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<(i64, i64)>>>()?;

        let mut stmt = conn.prepare(
          "SELECT person_id, occurred_at FROM interaction_person
           UNION ALL
           SELECT person_id, occurred_at FROM interaction_role
            WHERE person_id IS NOT NULL",
        )?;
        let touches = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<(i64, i64)>>>()?;

        Ok((people, tag_links, touches))
      })
      .await?;

    let mut tags_by_person: HashMap<i64, Vec<Id>> = HashMap::new();
    for (person_id, tag_id) in tag_links {
      tags_by_person.entry(person_id).or_default().push(tag_id);
    }
    let mut count_by_person: HashMap<i64, i64> = HashMap::new();
    let mut last_by_person: HashMap<i64, i64> = HashMap::new();
    for (person_id, occurred_at) in touches {
      *count_by_person.entry(person_id).or_insert(0) += 1;
      last_by_person
        .entry(person_id)
        .and_modify(|last| *last = (*last).max(occurred_at))
        .or_insert(occurred_at);
    }

    people
      .into_iter()
      .map(
        |(
          id,
          first_name,
          last_name,
          title,
          email,
          phone,
          linkedin,
          company_id,
          company_name,
        )| {
          Ok(PersonOverview {
            id,
            first_name,
            last_name,
            title,
            email,
            phone,
            linkedin,
            company_id,
            company_name,
            tag_ids: tags_by_person.remove(&id).unwrap_or_default(),
            interaction_count: count_by_person.get(&id).copied().unwrap_or(0),
            last_interaction_at: decode_ts_opt(
              last_by_person.get(&id).copied(),
            )?,
          })
        },
      )
      .collect()
  }

  async fn get_person(&self, id: Id) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| {
        let person = conn
          .query_row(
            &format!("SELECT {PERSON_COLS} FROM person WHERE id = ?1"),
            params![id],
            person_from_row,
          )
          .optional()?;
        Ok(person)
      })
      .await?;
    Ok(person)
  }

  async fn people_for_company(&self, company_id: Id) -> Result<Vec<Person>> {
    let people = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM person
            WHERE company_id = ?1
            ORDER BY first_name, last_name, id"
        ))?;
        let rows = stmt
          .query_map(params![company_id], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(people)
  }

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let person = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO person
             (company_id, first_name, last_name, title, phone, email, linkedin)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            input.company_id,
            input.first_name,
            input.last_name,
            input.title,
            input.phone,
            input.email,
            input.linkedin,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Person {
          id,
          company_id: input.company_id,
          first_name: input.first_name,
          last_name: input.last_name,
          title: input.title,
          phone: input.phone,
          email: input.email,
          linkedin: input.linkedin,
          notes: None,
        })
      })
      .await?;
    Ok(person)
  }

  async fn update_person(
    &self,
    id: Id,
    patch: PersonPatch,
  ) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(company_id) = patch.company_id {
          sets.push("company_id = ?");
          values.push(Value::from(company_id));
        }
        if let Some(first_name) = patch.first_name {
          sets.push("first_name = ?");
          values.push(Value::from(first_name));
        }
        if let Some(last_name) = patch.last_name {
          sets.push("last_name = ?");
          values.push(Value::from(last_name));
        }
        if let Some(title) = patch.title {
          sets.push("title = ?");
          values.push(Value::from(title));
        }
        if let Some(phone) = patch.phone {
          sets.push("phone = ?");
          values.push(Value::from(phone));
        }
        if let Some(email) = patch.email {
          sets.push("email = ?");
          values.push(Value::from(email));
        }
        if let Some(linkedin) = patch.linkedin {
          sets.push("linkedin = ?");
          values.push(Value::from(linkedin));
        }
        if let Some(notes) = patch.notes {
          sets.push("notes = ?");
          values.push(Value::from(notes));
        }
        if !sets.is_empty() {
          values.push(Value::from(id));
          conn.execute(
            &format!("UPDATE person SET {} WHERE id = ?", sets.join(", ")),
            params_from_iter(values),
          )?;
        }
        let person = conn
          .query_row(
            &format!("SELECT {PERSON_COLS} FROM person WHERE id = ?1"),
            params![id],
            person_from_row,
          )
          .optional()?;
        Ok(person)
      })
      .await?;
    Ok(person)
  }

  async fn delete_person(&self, id: Id) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row("SELECT 1 FROM person WHERE id = ?1", params![id], |_| {
            Ok(true)
          })
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "UPDATE interaction_role SET person_id = NULL WHERE person_id = ?1",
          params![id],
        )?;
        tx.execute(
          "DELETE FROM interaction_person WHERE person_id = ?1",
          params![id],
        )?;
        tx.execute("DELETE FROM person_tag WHERE person_id = ?1", params![id])?;
        tx.execute("DELETE FROM person WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  // ── Roles ─────────────────────────────────────────────────────────────

  async fn get_role(&self, id: Id) -> Result<Option<Role>> {
    self.fetch_role(id).await
  }

  async fn create_role(&self, input: NewRole) -> Result<Role> {
    let created_at = encode_ts(Utc::now());
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO role
             (hunt_id, company_id, title, created_at, description,
              salary_lower_end, salary_higher_end, currency_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          params![
            input.hunt_id,
            input.company_id,
            input.title,
            created_at,
            input.description,
            input.salary_lower_end,
            input.salary_higher_end,
            input.currency_id,
          ],
        )?;
        let id = conn.last_insert_rowid();
        let raw = conn.query_row(
          &format!("SELECT {ROLE_COLS} FROM role WHERE id = ?1"),
          params![id],
          RawRole::from_row,
        )?;
        Ok(raw)
      })
      .await?;
    raw.into_role()
  }

  async fn update_role(&self, id: Id, patch: RolePatch) -> Result<Option<Role>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(title) = patch.title {
          sets.push("title = ?");
          values.push(Value::from(title));
        }
        if let Some(company_id) = patch.company_id {
          sets.push("company_id = ?");
          values.push(Value::from(company_id));
        }
        if let Some(description) = patch.description {
          sets.push("description = ?");
          values.push(Value::from(description));
        }
        if let Some(notes) = patch.notes {
          sets.push("notes = ?");
          values.push(Value::from(notes));
        }
        if let Some(lower) = patch.salary_lower_end {
          sets.push("salary_lower_end = ?");
          values.push(Value::from(lower));
        }
        if let Some(higher) = patch.salary_higher_end {
          sets.push("salary_higher_end = ?");
          values.push(Value::from(higher));
        }
        if let Some(currency_id) = patch.currency_id {
          sets.push("currency_id = ?");
          values.push(Value::from(currency_id));
        }
        if !sets.is_empty() {
          values.push(Value::from(id));
          conn.execute(
            &format!("UPDATE role SET {} WHERE id = ?", sets.join(", ")),
            params_from_iter(values),
          )?;
        }
        let raw = conn
          .query_row(
            &format!("SELECT {ROLE_COLS} FROM role WHERE id = ?1"),
            params![id],
            RawRole::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawRole::into_role).transpose()
  }

  async fn delete_role(&self, id: Id) -> Result<Option<Role>> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {ROLE_COLS} FROM role WHERE id = ?1"),
            params![id],
            RawRole::from_row,
          )
          .optional()?;
        if raw.is_none() {
          return Ok(None);
        }
        tx.execute(
          "DELETE FROM interaction_role WHERE role_id = ?1",
          params![id],
        )?;
        tx.execute("DELETE FROM role_tag WHERE role_id = ?1", params![id])?;
        tx.execute("DELETE FROM role WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawRole::into_role).transpose()
  }

  async fn roles_for_hunt(&self, hunt_id: Id) -> Result<Vec<HuntRole>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.id, r.title, c.name, r.created_at
             FROM role r
             JOIN company c ON c.id = r.company_id
            WHERE r.hunt_id = ?1",
        )?;
        let rows = stmt
          .query_map(params![hunt_id], |row| {
            Ok(RawHuntRole {
              id:           row.get(0)?,
              title:        row.get(1)?,
              company_name: row.get(2)?,
              created_at:   row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawHuntRole::into_hunt_role).collect()
  }

  async fn roles_for_company(&self, company_id: Id) -> Result<Vec<CompanyRole>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, hunt_id, title, created_at
             FROM role
            WHERE company_id = ?1
            ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(params![company_id], |row| {
            Ok(RawCompanyRole {
              id:         row.get(0)?,
              hunt_id:    row.get(1)?,
              title:      row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawCompanyRole::into_company_role).collect()
  }

  async fn set_role_document(
    &self,
    id: Id,
    stored_name: String,
    original_name: String,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE role
              SET description_document_path = ?1,
                  description_document_name = ?2
            WHERE id = ?3",
          params![stored_name, original_name, id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn clear_role_document(&self, id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE role
              SET description_document_path = NULL,
                  description_document_name = NULL
            WHERE id = ?1",
          params![id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Tags and tag links ────────────────────────────────────────────────

  async fn list_tags(&self) -> Result<Vec<Tag>> {
    let tags = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM tag ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tags)
  }

  async fn get_tag(&self, id: Id) -> Result<Option<Tag>> {
    let tag = self
      .conn
      .call(move |conn| {
        let tag = conn
          .query_row(
            "SELECT id, name FROM tag WHERE id = ?1",
            params![id],
            |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?;
        Ok(tag)
      })
      .await?;
    Ok(tag)
  }

  async fn create_tag(&self, name: String) -> Result<Tag> {
    let tag = self
      .conn
      .call(move |conn| {
        if let Some(tag) = conn
          .query_row(
            "SELECT id, name FROM tag WHERE name = ?1",
            params![name],
            |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?
        {
          return Ok(tag);
        }
        conn.execute("INSERT INTO tag (name) VALUES (?1)", params![name])?;
        Ok(Tag { id: conn.last_insert_rowid(), name })
      })
      .await?;
    Ok(tag)
  }

  async fn tags_for_role(&self, role_id: Id) -> Result<Vec<Tag>> {
    let tags = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.id, t.name FROM tag t
             JOIN role_tag rt ON rt.tag_id = t.id
            WHERE rt.role_id = ?1
            ORDER BY t.name",
        )?;
        let rows = stmt
          .query_map(params![role_id], |row| {
            Ok(Tag { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tags)
  }

  async fn tags_for_person(&self, person_id: Id) -> Result<Vec<Tag>> {
    let tags = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.id, t.name FROM tag t
             JOIN person_tag pt ON pt.tag_id = t.id
            WHERE pt.person_id = ?1
            ORDER BY t.name",
        )?;
        let rows = stmt
          .query_map(params![person_id], |row| {
            Ok(Tag { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tags)
  }

  async fn role_tags_for_hunt(&self, hunt_id: Id) -> Result<Vec<RoleTagLink>> {
    let links = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT rt.role_id, rt.tag_id FROM role_tag rt
             JOIN role r ON r.id = rt.role_id
            WHERE r.hunt_id = ?1
            ORDER BY rt.tag_id",
        )?;
        let rows = stmt
          .query_map(params![hunt_id], |row| {
            Ok(RoleTagLink { role_id: row.get(0)?, tag_id: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(links)
  }

  async fn add_role_tag(&self, role_id: Id, tag_id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO role_tag (role_id, tag_id) VALUES (?1, ?2)",
          params![role_id, tag_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_role_tag(&self, role_id: Id, tag_id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM role_tag WHERE role_id = ?1 AND tag_id = ?2",
          params![role_id, tag_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn add_person_tag(&self, person_id: Id, tag_id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO person_tag (person_id, tag_id) VALUES (?1, ?2)",
          params![person_id, tag_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_person_tag(&self, person_id: Id, tag_id: Id) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM person_tag WHERE person_id = ?1 AND tag_id = ?2",
          params![person_id, tag_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Interaction types ─────────────────────────────────────────────────

  async fn list_interaction_types(
    &self,
    scope: TypeScope,
  ) -> Result<Vec<InteractionType>> {
    let table = type_table(scope);
    let types = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT id, name FROM {table} ORDER BY id"))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(InteractionType { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(types)
  }

  async fn get_interaction_type(
    &self,
    scope: TypeScope,
    id: Id,
  ) -> Result<Option<InteractionType>> {
    let table = type_table(scope);
    let ty = self
      .conn
      .call(move |conn| {
        let ty = conn
          .query_row(
            &format!("SELECT id, name FROM {table} WHERE id = ?1"),
            params![id],
            |row| Ok(InteractionType { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?;
        Ok(ty)
      })
      .await?;
    Ok(ty)
  }

  async fn create_interaction_type(
    &self,
    scope: TypeScope,
    name: String,
  ) -> Result<InteractionType> {
    let table = type_table(scope);
    let ty = self
      .conn
      .call(move |conn| {
        if let Some(ty) = conn
          .query_row(
            &format!("SELECT id, name FROM {table} WHERE name = ?1"),
            params![name],
            |row| Ok(InteractionType { id: row.get(0)?, name: row.get(1)? }),
          )
          .optional()?
        {
          return Ok(ty);
        }
        conn.execute(
          &format!("INSERT INTO {table} (name) VALUES (?1)"),
          params![name],
        )?;
        Ok(InteractionType { id: conn.last_insert_rowid(), name })
      })
      .await?;
    Ok(ty)
  }

  // ── Role interactions ─────────────────────────────────────────────────

  async fn get_role_interaction(&self, id: Id) -> Result<Option<RoleInteraction>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {ROLE_INTERACTION_COLS} FROM interaction_role WHERE id = ?1"
            ),
            params![id],
            RawRoleInteraction::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawRoleInteraction::into_interaction).transpose()
  }

  async fn create_role_interaction(
    &self,
    input: NewRoleInteraction,
  ) -> Result<RoleInteraction> {
    let occurred_at = encode_ts(input.occurred_at);
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interaction_role
             (company_id, person_id, role_id, interaction_type_id,
              occurred_at, notes)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            input.company_id,
            input.person_id,
            input.role_id,
            input.interaction_type_id,
            occurred_at,
            input.notes,
          ],
        )?;
        let id = conn.last_insert_rowid();
        let raw = conn.query_row(
          &format!(
            "SELECT {ROLE_INTERACTION_COLS} FROM interaction_role WHERE id = ?1"
          ),
          params![id],
          RawRoleInteraction::from_row,
        )?;
        Ok(raw)
      })
      .await?;
    raw.into_interaction()
  }

  async fn update_role_interaction(
    &self,
    id: Id,
    update: RoleInteractionUpdate,
  ) -> Result<Option<RoleInteraction>> {
    let occurred_at = encode_ts(update.occurred_at);
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE interaction_role
              SET interaction_type_id = ?1, person_id = ?2,
                  occurred_at = ?3, notes = ?4
            WHERE id = ?5",
          params![
            update.interaction_type_id,
            update.person_id,
            occurred_at,
            update.notes,
            id,
          ],
        )?;
        let raw = conn
          .query_row(
            &format!(
              "SELECT {ROLE_INTERACTION_COLS} FROM interaction_role WHERE id = ?1"
            ),
            params![id],
            RawRoleInteraction::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawRoleInteraction::into_interaction).transpose()
  }

  async fn delete_role_interaction(&self, id: Id) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n =
          conn.execute("DELETE FROM interaction_role WHERE id = ?1", params![id])?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn interactions_for_hunt(
    &self,
    hunt_id: Id,
  ) -> Result<Vec<RoleInteractionDigest>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ir.id, ir.role_id, it.name, ir.occurred_at
             FROM interaction_role ir
             JOIN role r ON r.id = ir.role_id
             JOIN interaction_type_role it ON it.id = ir.interaction_type_id
            WHERE r.hunt_id = ?1
            ORDER BY ir.occurred_at DESC, ir.id DESC",
        )?;
        let rows = stmt
          .query_map(params![hunt_id], |row| {
            Ok(RawRoleInteractionDigest {
              id:          row.get(0)?,
              role_id:     row.get(1)?,
              type_name:   row.get(2)?,
              occurred_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw
      .into_iter()
      .map(RawRoleInteractionDigest::into_digest)
      .collect()
  }

  async fn interactions_for_role(
    &self,
    role_id: Id,
  ) -> Result<Vec<RoleInteractionView>> {
    self.interaction_views("ir.role_id = ?1", role_id).await
  }

  async fn interactions_for_company(
    &self,
    company_id: Id,
  ) -> Result<Vec<RoleInteractionView>> {
    self.interaction_views("ir.company_id = ?1", company_id).await
  }

  async fn role_events_for_person(
    &self,
    person_id: Id,
  ) -> Result<Vec<InteractionEvent>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ir.id, r.id, r.title, it.name, ir.occurred_at, ir.notes
             FROM interaction_role ir
             JOIN role r ON r.id = ir.role_id
             JOIN interaction_type_role it ON it.id = ir.interaction_type_id
            WHERE ir.person_id = ?1
            ORDER BY ir.occurred_at DESC, ir.id DESC",
        )?;
        let rows = stmt
          .query_map(params![person_id], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, i64>(1)?,
              row.get::<_, String>(2)?,
              row.get::<_, String>(3)?,
              row.get::<_, i64>(4)?,
              row.get::<_, Option<String>>(5)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw
      .into_iter()
      .map(|(id, role_id, role_title, type_name, occurred_at, notes)| {
        Ok(InteractionEvent {
          id,
          source: EventSource::Role { role_id, role_title },
          type_name,
          occurred_at: decode_ts(occurred_at)?,
          notes,
        })
      })
      .collect()
  }

  // ── Person interactions ───────────────────────────────────────────────

  async fn get_person_interaction(
    &self,
    id: Id,
  ) -> Result<Option<PersonInteraction>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {PERSON_INTERACTION_COLS} FROM interaction_person
                WHERE id = ?1"
            ),
            params![id],
            RawPersonInteraction::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawPersonInteraction::into_interaction).transpose()
  }

  async fn create_person_interaction(
    &self,
    input: NewPersonInteraction,
  ) -> Result<PersonInteraction> {
    let occurred_at = encode_ts(input.occurred_at);
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interaction_person
             (person_id, interaction_type_id, occurred_at, notes)
           VALUES (?1, ?2, ?3, ?4)",
          params![
            input.person_id,
            input.interaction_type_id,
            occurred_at,
            input.notes,
          ],
        )?;
        let id = conn.last_insert_rowid();
        let raw = conn.query_row(
          &format!(
            "SELECT {PERSON_INTERACTION_COLS} FROM interaction_person
              WHERE id = ?1"
          ),
          params![id],
          RawPersonInteraction::from_row,
        )?;
        Ok(raw)
      })
      .await?;
    raw.into_interaction()
  }

  async fn update_person_interaction(
    &self,
    id: Id,
    update: PersonInteractionUpdate,
  ) -> Result<Option<PersonInteraction>> {
    let occurred_at = encode_ts(update.occurred_at);
    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE interaction_person
              SET interaction_type_id = ?1, occurred_at = ?2, notes = ?3
            WHERE id = ?4",
          params![update.interaction_type_id, occurred_at, update.notes, id],
        )?;
        let raw = conn
          .query_row(
            &format!(
              "SELECT {PERSON_INTERACTION_COLS} FROM interaction_person
                WHERE id = ?1"
            ),
            params![id],
            RawPersonInteraction::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    raw.map(RawPersonInteraction::into_interaction).transpose()
  }

  async fn delete_person_interaction(&self, id: Id) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn
          .execute("DELETE FROM interaction_person WHERE id = ?1", params![id])?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  async fn person_events(&self, person_id: Id) -> Result<Vec<InteractionEvent>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT ip.id, it.name, ip.occurred_at, ip.notes
             FROM interaction_person ip
             JOIN interaction_type_person it ON it.id = ip.interaction_type_id
            WHERE ip.person_id = ?1
            ORDER BY ip.occurred_at DESC, ip.id DESC",
        )?;
        let rows = stmt
          .query_map(params![person_id], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, i64>(2)?,
              row.get::<_, Option<String>>(3)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw
      .into_iter()
      .map(|(id, type_name, occurred_at, notes)| {
        Ok(InteractionEvent {
          id,
          source: EventSource::Person,
          type_name,
          occurred_at: decode_ts(occurred_at)?,
          notes,
        })
      })
      .collect()
  }

  // ── Currencies ────────────────────────────────────────────────────────

  async fn list_currencies(&self) -> Result<Vec<Currency>> {
    let currencies = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, code FROM currency ORDER BY code")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Currency { id: row.get(0)?, code: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(currencies)
  }

  async fn get_currency(&self, id: Id) -> Result<Option<Currency>> {
    let currency = self
      .conn
      .call(move |conn| {
        let currency = conn
          .query_row(
            "SELECT id, code FROM currency WHERE id = ?1",
            params![id],
            |row| Ok(Currency { id: row.get(0)?, code: row.get(1)? }),
          )
          .optional()?;
        Ok(currency)
      })
      .await?;
    Ok(currency)
  }

  async fn create_currency(&self, code: String) -> Result<Currency> {
    let currency = self
      .conn
      .call(move |conn| {
        if let Some(currency) = conn
          .query_row(
            "SELECT id, code FROM currency WHERE code = ?1",
            params![code],
            |row| Ok(Currency { id: row.get(0)?, code: row.get(1)? }),
          )
          .optional()?
        {
          return Ok(currency);
        }
        conn.execute("INSERT INTO currency (code) VALUES (?1)", params![code])?;
        Ok(Currency { id: conn.last_insert_rowid(), code })
      })
      .await?;
    Ok(currency)
  }
}

impl SqliteStore {
  /// Shared query for the joined interaction listings; `filter` is a WHERE
  /// clause over `ir` with a single `?1` placeholder.
  async fn interaction_views(
    &self,
    filter: &'static str,
    key: Id,
  ) -> Result<Vec<RoleInteractionView>> {
    let raw = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT ir.id, ir.role_id, r.title, ir.interaction_type_id, it.name,
                  ir.person_id, p.first_name, p.last_name,
                  ir.occurred_at, ir.notes
             FROM interaction_role ir
             JOIN role r ON r.id = ir.role_id
             JOIN interaction_type_role it ON it.id = ir.interaction_type_id
             LEFT JOIN person p ON p.id = ir.person_id
            WHERE {filter}
            ORDER BY ir.occurred_at DESC, ir.id DESC"
        ))?;
        let rows = stmt
          .query_map(params![key], |row| {
            Ok(RawRoleInteractionView {
              id:                  row.get(0)?,
              role_id:             row.get(1)?,
              role_title:          row.get(2)?,
              interaction_type_id: row.get(3)?,
              type_name:           row.get(4)?,
              person_id:           row.get(5)?,
              first_name:          row.get(6)?,
              last_name:           row.get(7)?,
              occurred_at:         row.get(8)?,
              notes:               row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raw.into_iter().map(RawRoleInteractionView::into_view).collect()
  }
}
