//! The `TrackerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `sigh-store-sqlite`).
//! Higher layers (`sigh-api`, `sigh-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Mutations are plain row-level CRUD; cross-entity cascades (hunt, company,
//! person, role deletion) are single operations so a backend can run them in
//! one transaction. Referential validation that produces user-facing errors
//! lives in the API layer, which checks existence before writing — the same
//! split the original route handlers used.

use std::future::Future;

use crate::{
  Id,
  company::{Company, CompanyPatch, CompanySummary, NewCompany},
  hunt::{Hunt, HuntListing, HuntPatch, HuntStatus, NewHunt},
  interaction::{
    InteractionEvent, InteractionType, NewPersonInteraction,
    NewRoleInteraction, PersonInteraction, PersonInteractionUpdate,
    RoleInteraction, RoleInteractionDigest, RoleInteractionUpdate,
    RoleInteractionView, TypeScope,
  },
  person::{NewPerson, Person, PersonOverview, PersonPatch},
  role::{CompanyRole, Currency, HuntRole, NewRole, Role, RolePatch, RoleTagLink},
  tag::Tag,
};

/// Abstraction over a Sigh tracker store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Hunts ─────────────────────────────────────────────────────────────

  /// All hunts with status name and role count, start_date desc, id desc.
  fn list_hunts(
    &self,
  ) -> impl Future<Output = Result<Vec<HuntListing>, Self::Error>> + Send + '_;

  fn get_hunt(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Hunt>, Self::Error>> + Send + '_;

  fn create_hunt(
    &self,
    input: NewHunt,
  ) -> impl Future<Output = Result<Hunt, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns the updated row, or `None` if the hunt
  /// does not exist.
  fn update_hunt(
    &self,
    id: Id,
    patch: HuntPatch,
  ) -> impl Future<Output = Result<Option<Hunt>, Self::Error>> + Send + '_;

  /// Delete a hunt and cascade to its roles, their interactions, and their
  /// tag links. Returns `false` if the hunt does not exist.
  fn delete_hunt(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Hunt statuses ordered by name.
  fn list_hunt_statuses(
    &self,
  ) -> impl Future<Output = Result<Vec<HuntStatus>, Self::Error>> + Send + '_;

  fn get_hunt_status(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<HuntStatus>, Self::Error>> + Send + '_;

  // ── Companies ─────────────────────────────────────────────────────────

  /// Companies with role/person counts and the latest interaction timestamp
  /// across role- and person-scoped interactions, ordered by name.
  fn company_summaries(
    &self,
  ) -> impl Future<Output = Result<Vec<CompanySummary>, Self::Error>> + Send + '_;

  fn get_company(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// Exact-name lookup, used by get-or-create flows.
  fn find_company<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + 'a;

  fn create_company(
    &self,
    input: NewCompany,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  fn update_company(
    &self,
    id: Id,
    patch: CompanyPatch,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// Delete a company, cascading to its roles (with their interactions and
  /// tag links) and its people (detaching them from role interactions,
  /// deleting their interactions and tag links).
  fn delete_company(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── People ────────────────────────────────────────────────────────────

  /// People with company name, tags, and merged interaction stats, ordered
  /// by first name, last name, id.
  fn people_overview(
    &self,
  ) -> impl Future<Output = Result<Vec<PersonOverview>, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn people_for_company(
    &self,
    company_id: Id,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn update_person(
    &self,
    id: Id,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person: role interactions keep their row but drop the
  /// attribution; person interactions and tag links are deleted.
  fn delete_person(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Roles ─────────────────────────────────────────────────────────────

  fn get_role(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  /// Create a role. `created_at` is set by the store.
  fn create_role(
    &self,
    input: NewRole,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  fn update_role(
    &self,
    id: Id,
    patch: RolePatch,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  /// Delete a role and cascade to its interactions and tag links. Returns
  /// the deleted row so the caller can clean up the stored document.
  fn delete_role(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  /// A hunt's roles joined with their company names, unordered (the
  /// aggregation layer sorts).
  fn roles_for_hunt(
    &self,
    hunt_id: Id,
  ) -> impl Future<Output = Result<Vec<HuntRole>, Self::Error>> + Send + '_;

  fn roles_for_company(
    &self,
    company_id: Id,
  ) -> impl Future<Output = Result<Vec<CompanyRole>, Self::Error>> + Send + '_;

  /// Record which stored document backs a role's description.
  fn set_role_document(
    &self,
    id: Id,
    stored_name: String,
    original_name: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn clear_role_document(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Tags and tag links ────────────────────────────────────────────────

  /// Tags ordered by name.
  fn list_tags(
    &self,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;

  fn get_tag(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send + '_;

  /// Get-or-create by exact name.
  fn create_tag(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Tag, Self::Error>> + Send + '_;

  fn tags_for_role(
    &self,
    role_id: Id,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;

  fn tags_for_person(
    &self,
    person_id: Id,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;

  /// Tag links for all roles of a hunt.
  fn role_tags_for_hunt(
    &self,
    hunt_id: Id,
  ) -> impl Future<Output = Result<Vec<RoleTagLink>, Self::Error>> + Send + '_;

  /// Idempotent attach.
  fn add_role_tag(
    &self,
    role_id: Id,
    tag_id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_role_tag(
    &self,
    role_id: Id,
    tag_id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_person_tag(
    &self,
    person_id: Id,
    tag_id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_person_tag(
    &self,
    person_id: Id,
    tag_id: Id,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Interaction types ─────────────────────────────────────────────────

  /// Catalogue entries ordered by id.
  fn list_interaction_types(
    &self,
    scope: TypeScope,
  ) -> impl Future<Output = Result<Vec<InteractionType>, Self::Error>> + Send + '_;

  fn get_interaction_type(
    &self,
    scope: TypeScope,
    id: Id,
  ) -> impl Future<Output = Result<Option<InteractionType>, Self::Error>> + Send + '_;

  /// Get-or-create by exact name.
  fn create_interaction_type(
    &self,
    scope: TypeScope,
    name: String,
  ) -> impl Future<Output = Result<InteractionType, Self::Error>> + Send + '_;

  // ── Role interactions ─────────────────────────────────────────────────

  fn get_role_interaction(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<RoleInteraction>, Self::Error>> + Send + '_;

  fn create_role_interaction(
    &self,
    input: NewRoleInteraction,
  ) -> impl Future<Output = Result<RoleInteraction, Self::Error>> + Send + '_;

  fn update_role_interaction(
    &self,
    id: Id,
    update: RoleInteractionUpdate,
  ) -> impl Future<Output = Result<Option<RoleInteraction>, Self::Error>> + Send + '_;

  fn delete_role_interaction(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All role interactions within a hunt, newest first (occurred_at desc,
  /// id desc) — the input to [`crate::report::overview_roles`].
  fn interactions_for_hunt(
    &self,
    hunt_id: Id,
  ) -> impl Future<Output = Result<Vec<RoleInteractionDigest>, Self::Error>> + Send + '_;

  /// A role's interactions joined with type and person names, newest first.
  fn interactions_for_role(
    &self,
    role_id: Id,
  ) -> impl Future<Output = Result<Vec<RoleInteractionView>, Self::Error>> + Send + '_;

  /// A company's role interactions joined with type, role, and person
  /// names, newest first.
  fn interactions_for_company(
    &self,
    company_id: Id,
  ) -> impl Future<Output = Result<Vec<RoleInteractionView>, Self::Error>> + Send + '_;

  /// Role-scoped interactions attributed to a person, as timeline events.
  fn role_events_for_person(
    &self,
    person_id: Id,
  ) -> impl Future<Output = Result<Vec<InteractionEvent>, Self::Error>> + Send + '_;

  // ── Person interactions ───────────────────────────────────────────────

  fn get_person_interaction(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<PersonInteraction>, Self::Error>> + Send + '_;

  fn create_person_interaction(
    &self,
    input: NewPersonInteraction,
  ) -> impl Future<Output = Result<PersonInteraction, Self::Error>> + Send + '_;

  fn update_person_interaction(
    &self,
    id: Id,
    update: PersonInteractionUpdate,
  ) -> impl Future<Output = Result<Option<PersonInteraction>, Self::Error>> + Send + '_;

  fn delete_person_interaction(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Person-scoped interactions for a person, as timeline events.
  fn person_events(
    &self,
    person_id: Id,
  ) -> impl Future<Output = Result<Vec<InteractionEvent>, Self::Error>> + Send + '_;

  // ── Currencies ────────────────────────────────────────────────────────

  /// Currencies ordered by code.
  fn list_currencies(
    &self,
  ) -> impl Future<Output = Result<Vec<Currency>, Self::Error>> + Send + '_;

  fn get_currency(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Currency>, Self::Error>> + Send + '_;

  /// Get-or-create by exact code (callers are expected to uppercase).
  fn create_currency(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Currency, Self::Error>> + Send + '_;
}
