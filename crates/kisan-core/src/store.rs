//! The `PortalStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `kisan-store-sqlite`).
//! The HTTP layer and the stats job depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  community::{Community, CommunityUpdate, NewCommunity, PostCategory},
  content::{Comment, NewComment, NewPost, Post, PostUpdate},
  profile::{Membership, NewProfile, Profile, ProfileUpdate, UserId},
  reaction::{ReactionCounts, ReactionKind, ReactionState, ReactionTarget},
  stats::PortalStats,
};

// ─── Query and report types ──────────────────────────────────────────────────

/// Parameters for [`PortalStore::list_posts`].
#[derive(Debug, Clone)]
pub struct PostQuery {
  pub community_id: Uuid,
  pub category:     Option<PostCategory>,
}

impl PostQuery {
  pub fn community(community_id: Uuid) -> Self {
    Self { community_id, category: None }
  }
}

/// What a cascading delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
  pub communities: u64,
  pub posts:       u64,
  pub comments:    u64,
  pub reactions:   u64,
  /// Membership entries removed (one per user per community).
  pub memberships: u64,
  pub profiles:    u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Kisan portal backend.
///
/// Multi-step writes (the reaction toggle, every cascading delete, community
/// renames) must be atomic: either all of their effects are visible or none
/// are.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a freshly registered profile with both role flags cleared.
  /// Returns `None` if the user already has a profile.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn get_profile<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Returns `None` if no profile exists for `user_id`.
  fn update_profile<'a>(
    &'a self,
    user_id: &'a UserId,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Set or clear the creator flag. Returns `None` if no profile exists.
  fn set_creator<'a>(
    &'a self,
    user_id: &'a UserId,
    is_creator: bool,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Set or clear the admin flag. Only reachable from the operator CLI;
  /// no API route grants admin. Returns `None` if no profile exists.
  fn set_admin<'a>(
    &'a self,
    user_id: &'a UserId,
    is_admin: bool,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Remove a user and everything they authored: their posts (with the
  /// posts' comments and reactions), their comments (with reactions), their
  /// own reactions, their membership and their profile. Atomic.
  ///
  /// Returns `None` if the user had no profile.
  fn delete_member<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + 'a;

  // ── Membership ────────────────────────────────────────────────────────

  /// The user's joined communities; empty if they never joined any.
  fn get_membership<'a>(
    &'a self,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<Membership, Self::Error>> + Send + 'a;

  /// Add `community` to the user's set. Joining twice is a no-op.
  fn join_community<'a>(
    &'a self,
    user_id: &'a UserId,
    community: &'a str,
  ) -> impl Future<Output = Result<Membership, Self::Error>> + Send + 'a;

  /// Remove `community` from the user's set. Leaving a community that was
  /// never joined is a no-op.
  fn leave_community<'a>(
    &'a self,
    user_id: &'a UserId,
    community: &'a str,
  ) -> impl Future<Output = Result<Membership, Self::Error>> + Send + 'a;

  /// Number of users whose membership contains `community`.
  fn member_count<'a>(
    &'a self,
    community: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Communities ───────────────────────────────────────────────────────

  /// The caller normalises the name and checks it is not taken.
  fn create_community(
    &self,
    input: NewCommunity,
  ) -> impl Future<Output = Result<Community, Self::Error>> + Send + '_;

  fn get_community(
    &self,
    community_id: Uuid,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + '_;

  fn find_community<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + 'a;

  /// All communities ordered by name.
  fn list_communities(
    &self,
  ) -> impl Future<Output = Result<Vec<Community>, Self::Error>> + Send + '_;

  /// Apply an admin edit. A rename is carried into every membership set in
  /// the same transaction. Returns `None` if the community does not exist.
  fn update_community(
    &self,
    community_id: Uuid,
    update: CommunityUpdate,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + '_;

  /// Remove a community, its posts, their comments, every reaction on those,
  /// and the community from every membership set. Atomic.
  fn delete_community(
    &self,
    community_id: Uuid,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// The `created_at` timestamp is set by the store.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Posts matching `query`, newest first.
  fn list_posts<'a>(
    &'a self,
    query: &'a PostQuery,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  fn update_post(
    &self,
    post_id: Uuid,
    update: PostUpdate,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Remove a post, its comments and every reaction on either. Atomic.
  fn delete_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + '_;

  fn post_count(
    &self,
    community_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// The caller checks the post exists.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments on a post, oldest first.
  fn list_comments(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  /// Remove a comment and its reactions. Atomic.
  fn delete_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<Option<CascadeReport>, Self::Error>> + Send + '_;

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Toggle `user_id`'s reaction on `target` towards `desired` (see
  /// [`crate::reaction::ReactionWrite::plan`]) and return the resulting
  /// state. Lookup and write happen atomically, so at most one row per
  /// (target, user) ever exists.
  ///
  /// Authorization (membership of the target's community) is the caller's
  /// job.
  fn apply_reaction<'a>(
    &'a self,
    target: ReactionTarget,
    user_id: &'a UserId,
    desired: ReactionKind,
  ) -> impl Future<Output = Result<ReactionState, Self::Error>> + Send + 'a;

  fn reaction_of<'a>(
    &'a self,
    target: ReactionTarget,
    user_id: &'a UserId,
  ) -> impl Future<Output = Result<ReactionState, Self::Error>> + Send + 'a;

  fn reaction_counts(
    &self,
    target: ReactionTarget,
  ) -> impl Future<Output = Result<ReactionCounts, Self::Error>> + Send + '_;

  // ── Stats ─────────────────────────────────────────────────────────────

  /// Replace the single public stats document.
  fn write_stats<'a>(
    &'a self,
    stats: &'a PortalStats,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn read_stats(
    &self,
  ) -> impl Future<Output = Result<Option<PortalStats>, Self::Error>> + Send + '_;
}
