//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microseconds, `Z`) so that
//! lexical order equals chronological order. UUIDs are hyphenated lowercase
//! strings. Enums are stored by their wire names.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use kisan_core::{
  community::{Community, PostCategory},
  content::{Comment, Post},
  profile::{Locality, Profile, UserId},
  reaction::ReactionKind,
  stats::PortalStats,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PROFILE_COLUMNS: &str = "user_id, first_name, last_name, email, \
  mobile, village, taluka, district, state, is_admin, is_creator, created_at";

pub const COMMUNITY_COLUMNS: &str =
  "community_id, name, description, info, category, created_at";

pub const POST_COLUMNS: &str = "post_id, community_id, category, title, \
  content, author_id, author_name, created_at, updated_at";

pub const COMMENT_COLUMNS: &str = "comment_id, post_id, community_id, \
  author_id, author_name, content, created_at";

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_user_id(s: String) -> Result<UserId> { Ok(UserId::new(s)?) }

pub fn decode_category(s: &str) -> Result<PostCategory> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "category",
    value:  s.to_owned(),
  })
}

pub fn decode_reaction_kind(s: &str) -> Result<ReactionKind> {
  s.parse().map_err(|_| Error::UnknownVariant {
    column: "kind",
    value:  s.to_owned(),
  })
}

/// Surface a decode failure from inside a `tokio_rusqlite` call closure.
pub fn in_call<T>(r: Result<T>) -> std::result::Result<T, tokio_rusqlite::Error> {
  r.map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:    String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub mobile:     Option<String>,
  pub village:    Option<String>,
  pub taluka:     Option<String>,
  pub district:   Option<String>,
  pub state:      Option<String>,
  pub is_admin:   bool,
  pub is_creator: bool,
  pub created_at: String,
}

impl RawProfile {
  /// Read a row selected with [`PROFILE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      first_name: row.get(1)?,
      last_name:  row.get(2)?,
      email:      row.get(3)?,
      mobile:     row.get(4)?,
      village:    row.get(5)?,
      taluka:     row.get(6)?,
      district:   row.get(7)?,
      state:      row.get(8)?,
      is_admin:   row.get(9)?,
      is_creator: row.get(10)?,
      created_at: row.get(11)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:    decode_user_id(self.user_id)?,
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      mobile:     self.mobile,
      locality:   Locality {
        village:  self.village,
        taluka:   self.taluka,
        district: self.district,
        state:    self.state,
      },
      is_admin:   self.is_admin,
      is_creator: self.is_creator,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `communities` row.
pub struct RawCommunity {
  pub community_id: String,
  pub name:         String,
  pub description:  String,
  pub info:         Option<String>,
  pub category:     String,
  pub created_at:   String,
}

impl RawCommunity {
  /// Read a row selected with [`COMMUNITY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      community_id: row.get(0)?,
      name:         row.get(1)?,
      description:  row.get(2)?,
      info:         row.get(3)?,
      category:     row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_community(self) -> Result<Community> {
    Ok(Community {
      community_id: decode_uuid(&self.community_id)?,
      name:         self.name,
      description:  self.description,
      info:         self.info,
      category:     self.category,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:      String,
  pub community_id: String,
  pub category:     String,
  pub title:        String,
  pub content:      String,
  pub author_id:    String,
  pub author_name:  String,
  pub created_at:   String,
  pub updated_at:   Option<String>,
}

impl RawPost {
  /// Read a row selected with [`POST_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:      row.get(0)?,
      community_id: row.get(1)?,
      category:     row.get(2)?,
      title:        row.get(3)?,
      content:      row.get(4)?,
      author_id:    row.get(5)?,
      author_name:  row.get(6)?,
      created_at:   row.get(7)?,
      updated_at:   row.get(8)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:      decode_uuid(&self.post_id)?,
      community_id: decode_uuid(&self.community_id)?,
      category:     decode_category(&self.category)?,
      title:        self.title,
      content:      self.content,
      author_id:    decode_user_id(self.author_id)?,
      author_name:  self.author_name,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id:   String,
  pub post_id:      String,
  pub community_id: String,
  pub author_id:    String,
  pub author_name:  String,
  pub content:      String,
  pub created_at:   String,
}

impl RawComment {
  /// Read a row selected with [`COMMENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id:   row.get(0)?,
      post_id:      row.get(1)?,
      community_id: row.get(2)?,
      author_id:    row.get(3)?,
      author_name:  row.get(4)?,
      content:      row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id:   decode_uuid(&self.comment_id)?,
      post_id:      decode_uuid(&self.post_id)?,
      community_id: decode_uuid(&self.community_id)?,
      author_id:    decode_user_id(self.author_id)?,
      author_name:  self.author_name,
      content:      self.content,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from the `stats` row.
pub struct RawStats {
  pub members:     i64,
  pub communities: i64,
  pub villages:    i64,
  pub updated_at:  String,
}

impl RawStats {
  pub fn into_stats(self) -> Result<PortalStats> {
    Ok(PortalStats {
      members:     self.members.max(0) as u64,
      communities: self.communities.max(0) as u64,
      villages:    self.villages.max(0) as u64,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
