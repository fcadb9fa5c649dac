//! JSON REST API for the Kisan portal.
//!
//! Exposes an axum [`Router`] backed by any [`kisan_core::store::PortalStore`].
//! Authentication is the identity service's job: it forwards the signed-in
//! user id in a request header, and every request builds its own
//! [`kisan_core::session::Session`] from that (see [`session`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kisan_api::api_router(store.clone(), IdentityConfig::default()))
//! ```

pub mod admin;
pub mod communities;
pub mod error;
pub mod extract;
pub mod portal;
pub mod posts;
pub mod profiles;
pub mod reactions;
pub mod session;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use kisan_core::store::PortalStore;

pub use error::ApiError;

/// Header the identity service uses to assert the signed-in user id.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-kisan-user";

/// How the signed-in user is identified on incoming requests.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
  pub header: String,
}

impl Default for IdentityConfig {
  fn default() -> Self { Self { header: DEFAULT_IDENTITY_HEADER.to_owned() } }
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub identity: Arc<IdentityConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      identity: Arc::clone(&self.identity),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, identity: IdentityConfig) -> Router<()>
where
  S: PortalStore + 'static,
{
  let state = ApiState { store, identity: Arc::new(identity) };

  Router::new()
    // Public
    .route("/stats", get(portal::stats::<S>))
    .route("/categories", get(portal::categories))
    .route("/session", get(session::current::<S>))
    // Profiles
    .route("/profiles", post(profiles::register::<S>))
    .route(
      "/profiles/me",
      get(profiles::me::<S>)
        .patch(profiles::update_me::<S>)
        .delete(profiles::delete_me::<S>),
    )
    // Communities
    .route("/communities", get(communities::list::<S>))
    .route("/communities/{name}", get(communities::get_one::<S>))
    .route("/communities/{name}/join", post(communities::join::<S>))
    .route("/communities/{name}/leave", post(communities::leave::<S>))
    .route(
      "/communities/{name}/posts",
      get(communities::list_posts::<S>).post(communities::create_post::<S>),
    )
    // Posts and comments
    .route(
      "/posts/{id}",
      get(posts::get_one::<S>)
        .patch(posts::update::<S>)
        .delete(posts::remove::<S>),
    )
    .route("/posts/{id}/comments", post(posts::add_comment::<S>))
    .route("/comments/{id}", delete(posts::remove_comment::<S>))
    // Reactions
    .route("/posts/{id}/reactions", post(reactions::on_post::<S>))
    .route("/comments/{id}/reactions", post(reactions::on_comment::<S>))
    // Admin
    .route("/admin/members", get(admin::list_members::<S>))
    .route("/admin/members/{user_id}", delete(admin::delete_member::<S>))
    .route("/admin/members/{user_id}/creator", post(admin::toggle_creator::<S>))
    .route("/admin/communities", post(admin::create_community::<S>))
    .route(
      "/admin/communities/{id}",
      patch(admin::update_community::<S>).delete(admin::delete_community::<S>),
    )
    .with_state(state)
}
