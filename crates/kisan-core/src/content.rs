//! Posts and comments.
//!
//! Both carry raw markup in `content`; rendering happens on read through
//! [`crate::markup::format_text`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{community::PostCategory, profile::UserId};

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:      Uuid,
  pub community_id: Uuid,
  pub category:     PostCategory,
  pub title:        String,
  pub content:      String,
  pub author_id:    UserId,
  /// Display name captured when the post was written.
  pub author_name:  String,
  /// Server-assigned; never changes after creation.
  pub created_at:   DateTime<Utc>,
  pub updated_at:   Option<DateTime<Utc>>,
}

/// Input to [`crate::store::PortalStore::create_post`].
#[derive(Debug, Clone)]
pub struct NewPost {
  pub community_id: Uuid,
  pub category:     PostCategory,
  pub title:        String,
  pub content:      String,
  pub author_id:    UserId,
  pub author_name:  String,
}

/// Edit of an existing post by its author or an admin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
  pub title:    Option<String>,
  pub content:  Option<String>,
  pub category: Option<PostCategory>,
}

impl PostUpdate {
  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.content.is_none() && self.category.is_none()
  }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id:   Uuid,
  pub post_id:      Uuid,
  pub community_id: Uuid,
  pub author_id:    UserId,
  pub author_name:  String,
  pub content:      String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::PortalStore::add_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:      Uuid,
  pub community_id: Uuid,
  pub author_id:    UserId,
  pub author_name:  String,
  pub content:      String,
}
