//! JSON REST API for Sigh.
//!
//! Exposes an axum [`Router`] backed by any [`sigh_core::store::TrackerStore`]
//! plus an [`AttachmentStore`] directory for uploaded documents. TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sigh_api::api_router(store, attachments))
//! ```

pub mod attachments;
pub mod companies;
pub mod error;
pub mod hunts;
pub mod interactions;
pub mod lookups;
pub mod people;
pub mod roles;

mod wire;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use sigh_core::store::TrackerStore;

pub use attachments::AttachmentStore;
pub use error::ApiError;

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub attachments: Arc<AttachmentStore>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      attachments: Arc::clone(&self.attachments),
    }
  }
}

/// Build a fully-materialised API router for `store` and `attachments`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(
  store: Arc<S>,
  attachments: Arc<AttachmentStore>,
) -> Router<()>
where
  S: TrackerStore + 'static,
{
  let state = AppState { store, attachments };
  Router::new()
    // Hunts
    .route("/hunts", get(hunts::list::<S>).post(hunts::create::<S>))
    .route(
      "/hunts/{id}",
      get(hunts::get_one::<S>)
        .patch(hunts::update::<S>)
        .delete(hunts::delete::<S>),
    )
    // Companies
    .route(
      "/companies",
      get(companies::list::<S>).post(companies::create::<S>),
    )
    .route(
      "/companies/{id}",
      get(companies::get_one::<S>)
        .patch(companies::update::<S>)
        .delete(companies::delete::<S>),
    )
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .patch(people::update::<S>)
        .delete(people::delete::<S>),
    )
    .route(
      "/people/{id}/tags",
      post(people::add_tag::<S>).delete(people::remove_tag::<S>),
    )
    // Roles
    .route("/roles", post(roles::create::<S>))
    .route(
      "/roles/{id}",
      get(roles::get_one::<S>)
        .patch(roles::update::<S>)
        .delete(roles::delete::<S>),
    )
    .route(
      "/roles/{id}/tags",
      post(roles::add_tag::<S>).delete(roles::remove_tag::<S>),
    )
    .route(
      "/roles/{id}/description-document",
      post(roles::upload_document::<S>).delete(roles::delete_document::<S>),
    )
    // Interactions
    .route("/interactions", post(interactions::create::<S>))
    .route(
      "/interactions/{id}",
      patch(interactions::update::<S>).delete(interactions::delete::<S>),
    )
    .route(
      "/person-interactions",
      post(interactions::create_person_scoped::<S>),
    )
    .route(
      "/person-interactions/{id}",
      patch(interactions::update_person_scoped::<S>)
        .delete(interactions::delete_person_scoped::<S>),
    )
    // Lookup collections
    .route("/hunt-statuses", get(lookups::hunt_statuses::<S>))
    .route(
      "/interaction-types",
      get(lookups::role_interaction_types::<S>)
        .post(lookups::create_role_interaction_type::<S>),
    )
    .route(
      "/person-interaction-types",
      get(lookups::person_interaction_types::<S>)
        .post(lookups::create_person_interaction_type::<S>),
    )
    .route(
      "/currencies",
      get(lookups::currencies::<S>).post(lookups::create_currency::<S>),
    )
    .route("/tags", get(lookups::tags::<S>).post(lookups::create_tag::<S>))
    // Attachments
    .route("/attachments/{filename}", get(attachments::serve::<S>))
    .with_state(state)
}
