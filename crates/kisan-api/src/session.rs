//! Per-request session extraction and `GET /session`.
//!
//! The identity service forwards the signed-in user id in the configured
//! header. A missing or blank header means the request is anonymous. The
//! profile and membership are re-read on every request so that role and
//! membership always reflect the latest writes.

use axum::{
  extract::{FromRequestParts, State},
  http::request::Parts,
};
use kisan_core::{
  community::normalize_name,
  profile::{Profile, UserId},
  role::Role,
  session::{Session, Viewer},
  store::PortalStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, extract::{Json, Query}};

/// The caller's session, built fresh for this request.
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<ApiState<S>> for CurrentSession
where
  S: PortalStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let asserted = parts
      .headers
      .get(state.identity.header.as_str())
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty());

    let Some(raw) = asserted else {
      return Ok(Self(Session::Anonymous));
    };
    let user_id = UserId::new(raw)?;
    Ok(Self(load_session(state.store.as_ref(), user_id).await?))
  }
}

/// Build an authenticated session for `user_id` from the store.
pub async fn load_session<S>(store: &S, user_id: UserId) -> Result<Session, ApiError>
where
  S: PortalStore,
{
  let profile = store.get_profile(&user_id).await.map_err(ApiError::store)?;
  let membership = store.get_membership(&user_id).await.map_err(ApiError::store)?;
  Ok(Session::Authenticated(Viewer { user_id, profile, membership }))
}

// ─── GET /session ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SessionParams {
  pub community: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub signed_in:   bool,
  pub user_id:     Option<UserId>,
  /// `false` between sign-up and profile registration.
  pub registered:  bool,
  pub role:        Role,
  pub profile:     Option<Profile>,
  pub communities: Vec<String>,
}

/// `GET /session[?community=<name>]`: who the caller is and their role,
/// optionally in the context of one community.
pub async fn current<S>(
  State(_state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Query(params): Query<SessionParams>,
) -> Json<SessionView>
where
  S: PortalStore + 'static,
{
  let community = params.community.as_deref().map(normalize_name);
  let role = session.role(community.as_deref());

  let view = match session {
    Session::Anonymous => SessionView {
      signed_in: false,
      user_id: None,
      registered: false,
      role,
      profile: None,
      communities: Vec::new(),
    },
    Session::Authenticated(viewer) => SessionView {
      signed_in: true,
      registered: viewer.profile.is_some(),
      user_id: Some(viewer.user_id),
      role,
      profile: viewer.profile,
      communities: viewer.membership.communities.into_iter().collect(),
    },
  };
  Json(view)
}
