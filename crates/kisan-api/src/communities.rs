//! Handlers for `/communities` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/communities` | All communities by name, with counts |
//! | `GET`  | `/communities/{name}` | 404 if not found |
//! | `POST` | `/communities/{name}/join` | Signed in and registered |
//! | `POST` | `/communities/{name}/leave` | Body: `{"confirm_name":"<name>"}` |
//! | `GET`  | `/communities/{name}/posts` | `?category=&order=newest\|oldest&mine=true` |
//! | `POST` | `/communities/{name}/posts` | Joined creators and admins |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kisan_core::{
  community::{Community, PostCategory, normalize_name},
  content::NewPost,
  feed::{FeedOptions, FeedOrder, arrange},
  markup::format_text,
  profile::Membership,
  role::Role,
  session::Session,
  store::{PortalStore, PostQuery},
  validate::{confirm, require},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Path, Query},
  session::CurrentSession,
  views::{CommunityView, ConfirmBody, PostView},
};

/// Look a community up by the name used in the URL.
pub(crate) async fn find_by_name<S>(store: &S, name: &str) -> Result<Community, ApiError>
where
  S: PortalStore,
{
  let name = normalize_name(name);
  store
    .find_community(&name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("community {name:?} not found")))
}

/// Look a community up by id, for posts and comments that reference one.
pub(crate) async fn find_by_id<S>(store: &S, id: uuid::Uuid) -> Result<Community, ApiError>
where
  S: PortalStore,
{
  store
    .get_community(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("community {id} not found")))
}

async fn community_view<S>(
  store: &S,
  session: &Session,
  community: Community,
) -> Result<CommunityView, ApiError>
where
  S: PortalStore,
{
  let member_count = store.member_count(&community.name).await.map_err(ApiError::store)?;
  let post_count = store
    .post_count(community.community_id)
    .await
    .map_err(ApiError::store)?;
  let joined = session.viewer().is_some_and(|v| v.is_joined(&community.name));

  Ok(CommunityView {
    info_html: community.info.as_deref().map(format_text),
    role: session.role(Some(&community.name)),
    member_count,
    post_count,
    joined,
    community,
  })
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /communities`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<CommunityView>>, ApiError>
where
  S: PortalStore + 'static,
{
  let communities = state.store.list_communities().await.map_err(ApiError::store)?;
  let mut views = Vec::with_capacity(communities.len());
  for community in communities {
    views.push(community_view(state.store.as_ref(), &session, community).await?);
  }
  Ok(Json(views))
}

/// `GET /communities/{name}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(name): Path<String>,
) -> Result<Json<CommunityView>, ApiError>
where
  S: PortalStore + 'static,
{
  let community = find_by_name(state.store.as_ref(), &name).await?;
  Ok(Json(community_view(state.store.as_ref(), &session, community).await?))
}

// ─── Membership ───────────────────────────────────────────────────────────────

/// `POST /communities/{name}/join`: joining twice is a no-op.
pub async fn join<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(name): Path<String>,
) -> Result<Json<Membership>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  viewer.require_profile()?;
  let community = find_by_name(state.store.as_ref(), &name).await?;

  let membership = state
    .store
    .join_community(&viewer.user_id, &community.name)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %viewer.user_id, community = %community.name, "joined community");
  Ok(Json(membership))
}

/// `POST /communities/{name}/leave`
pub async fn leave<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(name): Path<String>,
  Json(body): Json<ConfirmBody>,
) -> Result<Json<Membership>, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let community = find_by_name(state.store.as_ref(), &name).await?;
  confirm(&community.name, &body.confirm_name)?;

  let membership = state
    .store
    .leave_community(&viewer.user_id, &community.name)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %viewer.user_id, community = %community.name, "left community");
  Ok(Json(membership))
}

// ─── Posts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
  pub category: Option<String>,
  #[serde(default)]
  pub order:    FeedOrder,
  /// Only the caller's own posts. Honoured for creators only.
  #[serde(default)]
  pub mine:     bool,
}

/// `GET /communities/{name}/posts`
pub async fn list_posts<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(name): Path<String>,
  Query(params): Query<FeedParams>,
) -> Result<Json<Vec<PostView>>, ApiError>
where
  S: PortalStore + 'static,
{
  let community = find_by_name(state.store.as_ref(), &name).await?;
  let category = params.category.as_deref().map(PostCategory::parse).transpose()?;

  let viewer = session.viewer();
  let authored_by = match viewer {
    Some(v) if params.mine && session.role(Some(&community.name)) == Role::Creator => {
      Some(v.user_id.clone())
    }
    _ => None,
  };

  let query = PostQuery { category, ..PostQuery::community(community.community_id) };
  let posts = state.store.list_posts(&query).await.map_err(ApiError::store)?;
  let posts = arrange(posts, &FeedOptions { order: params.order, authored_by });

  let viewer_id = viewer.map(|v| &v.user_id);
  let mut views = Vec::with_capacity(posts.len());
  for post in posts {
    views.push(PostView::load(state.store.as_ref(), post, viewer_id).await?);
  }
  Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct NewPostBody {
  pub category: String,
  pub title:    String,
  pub content:  String,
}

/// `POST /communities/{name}/posts`
pub async fn create_post<S>(
  State(state): State<ApiState<S>>,
  CurrentSession(session): CurrentSession,
  Path(name): Path<String>,
  Json(body): Json<NewPostBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore + 'static,
{
  let viewer = session.require_viewer()?;
  let profile = viewer.require_profile()?;
  let community = find_by_name(state.store.as_ref(), &name).await?;
  viewer.require_poster(&community.name)?;

  let category = PostCategory::parse(body.category.trim())?;
  let title = require("title", &body.title)?.to_owned();
  let content = require("content", &body.content)?.to_owned();

  let post = state
    .store
    .create_post(NewPost {
      community_id: community.community_id,
      category,
      title,
      content,
      author_id: viewer.user_id.clone(),
      author_name: profile.full_name(),
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    post_id = %post.post_id,
    community = %community.name,
    author = %post.author_id,
    "post created"
  );
  let view = PostView::load(state.store.as_ref(), post, Some(&viewer.user_id)).await?;
  Ok((StatusCode::CREATED, Json(view)))
}
