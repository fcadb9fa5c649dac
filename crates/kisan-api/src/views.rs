//! Response shapes that decorate stored records with rendered markup,
//! reaction tallies and the caller's own state.

use kisan_core::{
  community::Community,
  content::{Comment, Post},
  markup::format_text,
  profile::UserId,
  reaction::{ReactionCounts, ReactionState, ReactionTarget},
  role::Role,
  store::PortalStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of every destructive request that asks the user to type a name back.
#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
  pub confirm_name: String,
}

#[derive(Debug, Serialize)]
pub struct ReactionSummary {
  pub likes:       u64,
  pub dislikes:    u64,
  /// The caller's own reaction; `none` for guests.
  pub my_reaction: ReactionState,
}

impl ReactionSummary {
  pub async fn load<S>(
    store: &S,
    target: ReactionTarget,
    viewer: Option<&UserId>,
  ) -> Result<Self, ApiError>
  where
    S: PortalStore,
  {
    let ReactionCounts { likes, dislikes } =
      store.reaction_counts(target).await.map_err(ApiError::store)?;
    let my_reaction = match viewer {
      Some(user_id) => store.reaction_of(target, user_id).await.map_err(ApiError::store)?,
      None => ReactionState::None,
    };
    Ok(Self { likes, dislikes, my_reaction })
  }
}

#[derive(Debug, Serialize)]
pub struct PostView {
  #[serde(flatten)]
  pub post:         Post,
  pub content_html: String,
  #[serde(flatten)]
  pub reactions:    ReactionSummary,
}

impl PostView {
  pub async fn load<S>(store: &S, post: Post, viewer: Option<&UserId>) -> Result<Self, ApiError>
  where
    S: PortalStore,
  {
    let reactions = ReactionSummary::load(store, ReactionTarget::post(post.post_id), viewer).await?;
    Ok(Self { content_html: format_text(&post.content), post, reactions })
  }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
  #[serde(flatten)]
  pub comment:      Comment,
  pub content_html: String,
  #[serde(flatten)]
  pub reactions:    ReactionSummary,
}

impl CommentView {
  pub async fn load<S>(
    store: &S,
    comment: Comment,
    viewer: Option<&UserId>,
  ) -> Result<Self, ApiError>
  where
    S: PortalStore,
  {
    let target = ReactionTarget::comment(comment.comment_id);
    let reactions = ReactionSummary::load(store, target, viewer).await?;
    Ok(Self { content_html: format_text(&comment.content), comment, reactions })
  }
}

/// A post together with its comments, oldest comment first.
#[derive(Debug, Serialize)]
pub struct PostDetail {
  #[serde(flatten)]
  pub post:     PostView,
  pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct CommunityView {
  #[serde(flatten)]
  pub community:    Community,
  pub info_html:    Option<String>,
  pub member_count: u64,
  pub post_count:   u64,
  pub joined:       bool,
  /// The caller's role in this community.
  pub role:         Role,
}
