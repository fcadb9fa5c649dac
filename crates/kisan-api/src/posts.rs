//! Handlers for `/posts` and `/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts/{id}` | Post with its comments, oldest comment first |
//! | `PATCH`  | `/posts/{id}` | Author or admin; body: [`PostUpdate`] |
//! | `DELETE` | `/posts/{id}` | Author or admin; removes comments and reactions |
//! | `POST`   | `/posts/{id}/comments` | Joined members; body: `{"content":"..."}` |
//! | `DELETE` | `/comments/{id}` | Author or admin; removes its reactions |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kisan_core::{
  content::{Comment, NewComment, Post, PostUpdate},
  store::{CascadeReport, PortalStore},
  validate::{require, require_if_present},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  ApiState,
  communities::find_by_id,
  error::ApiError,
  extract::{Json, Path},
  session::CurrentSession,
  views::{CommentView, PostDetail, PostView},
};

pub(crate) async fn find_post<S>(store: &S, id: Uuid) -> Result<Post, ApiError>
where
  S: PortalStore,
{
  store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))
}

pub(crate) async fn find_comment<S>(store: &S, id: Uuid) -> Result<Comment, ApiError>
where
  S: PortalStore,
{
  store
    .get_comment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("comment {id} not found")))
}

// ─── Posts ────────────────────────────────────────────────────────────────────

/// `GET /posts/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<PostDetail>, ApiError>
where
  S: PortalStore + 'static,
{
  let store = state.store.as_ref();
  let viewer_id = session.viewer().map(|v| &v.user_id);

  let post = find_post(store, id).await?;
  let comments = store.list_comments(id).await.map_err(ApiError::store)?;

  let mut comment_views = Vec::with_capacity(comments.len());
  for comment in comments {
    comment_views.push(CommentView::load(store, comment, viewer_id).await?);
  }

  Ok(Json(PostDetail {
    post:     PostView::load(store, post, viewer_id).await?,
    comments: comment_views,
  }))
}

/// `PATCH /posts/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
  Json(update): Json<PostUpdate>,
) -> Result<Json<PostView>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let post = find_post(state.store.as_ref(), id).await?;
  viewer.require_author_or_admin(&post.author_id)?;

  if update.is_empty() {
    return Err(ApiError::BadRequest("nothing to update".into()));
  }
  require_if_present("title", update.title.as_deref())?;
  require_if_present("content", update.content.as_deref())?;

  let post = state
    .store
    .update_post(id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;

  tracing::info!(post_id = %id, by = %viewer.user_id, "post updated");
  Ok(Json(PostView::load(state.store.as_ref(), post, Some(&viewer.user_id)).await?))
}

/// `DELETE /posts/{id}`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let post = find_post(state.store.as_ref(), id).await?;
  viewer.require_author_or_admin(&post.author_id)?;

  let report = state
    .store
    .delete_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;

  tracing::info!(post_id = %id, by = %viewer.user_id, ?report, "post deleted");
  Ok(Json(report))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewCommentBody {
  pub content: String,
}

/// `POST /posts/{id}/comments`
pub async fn add_comment<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(post_id): Path<Uuid>,
  Json(body): Json<NewCommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let profile = viewer.require_profile()?;
  let post = find_post(state.store.as_ref(), post_id).await?;
  let community = find_by_id(state.store.as_ref(), post.community_id).await?;
  viewer.require_joined(&community.name)?;
  let content = require("content", &body.content)?.to_owned();

  let comment = state
    .store
    .add_comment(NewComment {
      post_id,
      community_id: post.community_id,
      author_id: viewer.user_id.clone(),
      author_name: profile.full_name(),
      content,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(comment_id = %comment.comment_id, %post_id, "comment added");
  let view = CommentView::load(state.store.as_ref(), comment, Some(&viewer.user_id)).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /comments/{id}`
pub async fn remove_comment<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(id): Path<Uuid>,
) -> Result<Json<CascadeReport>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let comment = find_comment(state.store.as_ref(), id).await?;
  viewer.require_author_or_admin(&comment.author_id)?;

  let report = state
    .store
    .delete_comment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("comment {id} not found")))?;

  tracing::info!(comment_id = %id, by = %viewer.user_id, "comment deleted");
  Ok(Json(report))
}
