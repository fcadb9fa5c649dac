//! Like/dislike toggles.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/posts/{id}/reactions` | Body: `{"kind":"like"\|"dislike"}` |
//! | `POST` | `/comments/{id}/reactions` | Same body |
//!
//! Sending the kind you already hold removes it; sending the other kind
//! switches. Only members of the target's community may react.

use axum::extract::State;
use kisan_core::{
  reaction::{ReactionKind, ReactionTarget},
  session::Session,
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  communities::find_by_id,
  error::ApiError,
  extract::{Json, Path},
  posts::{find_comment, find_post},
  session::CurrentSession,
  views::ReactionSummary,
};

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
  pub kind: ReactionKind,
}

/// `POST /posts/{id}/reactions`
pub async fn on_post<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<ReactionBody>,
) -> Result<Json<ReactionSummary>, ApiError>
where
  S: PortalStore + 'static,
{
  let post = find_post(state.store.as_ref(), id).await?;
  react(&state, &session, post.community_id, ReactionTarget::post(id), body.kind).await
}

/// `POST /comments/{id}/reactions`
pub async fn on_comment<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  Json(body): Json<ReactionBody>,
) -> Result<Json<ReactionSummary>, ApiError>
where
  S: PortalStore + 'static,
{
  let comment = find_comment(state.store.as_ref(), id).await?;
  react(&state, &session, comment.community_id, ReactionTarget::comment(id), body.kind).await
}

async fn react<S>(
  state: &ApiState<S>,
  session: &Session,
  community_id: Uuid,
  target: ReactionTarget,
  kind: ReactionKind,
) -> Result<Json<ReactionSummary>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let community = find_by_id(state.store.as_ref(), community_id).await?;
  viewer.require_joined(&community.name)?;

  let outcome = state
    .store
    .apply_reaction(target, &viewer.user_id, kind)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    kind = %target.kind,
    id = %target.id,
    user_id = %viewer.user_id,
    ?outcome,
    "reaction toggled"
  );

  let summary = ReactionSummary::load(state.store.as_ref(), target, Some(&viewer.user_id)).await?;
  Ok(Json(summary))
}
