//! [`SqliteStore`]: the SQLite implementation of [`PortalStore`].

use std::path::Path;

use kisan_core::{
  community::{Community, CommunityUpdate, NewCommunity},
  content::{Comment, NewComment, NewPost, Post, PostUpdate},
  profile::{Membership, NewProfile, Profile, ProfileUpdate, UserId, non_empty},
  reaction::{
    ReactionCounts, ReactionKind, ReactionState, ReactionTarget, ReactionWrite,
  },
  stats::PortalStats,
  store::{CascadeReport, PortalStore, PostQuery},
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use crate::{
  Result,
  cascade::{delete_comments_where, delete_posts_where, merge},
  encode::{
    COMMENT_COLUMNS, COMMUNITY_COLUMNS, POST_COLUMNS, PROFILE_COLUMNS,
    RawComment, RawCommunity, RawPost, RawProfile, RawStats, decode_reaction_kind,
    encode_dt, encode_uuid, in_call, now,
  },
  schema::SCHEMA,
};

const STATS_KEY: &str = "portal";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kisan portal store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn load_membership(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT community_name FROM memberships WHERE user_id = ?1 ORDER BY community_name",
  )?;
  stmt
    .query_map([user_id], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()
}

fn select_profile(conn: &Connection, user_id: &str) -> rusqlite::Result<Option<RawProfile>> {
  conn
    .query_row(
      &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?1"),
      [user_id],
      RawProfile::from_row,
    )
    .optional()
}

fn select_community(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawCommunity>> {
  conn
    .query_row(
      &format!("SELECT {COMMUNITY_COLUMNS} FROM communities WHERE community_id = ?1"),
      [id],
      RawCommunity::from_row,
    )
    .optional()
}

fn select_post(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawPost>> {
  conn
    .query_row(
      &format!("SELECT {POST_COLUMNS} FROM posts WHERE post_id = ?1"),
      [id],
      RawPost::from_row,
    )
    .optional()
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type Error = crate::Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<Option<Profile>> {
    let profile = Profile {
      user_id:    input.user_id,
      first_name: input.first_name,
      last_name:  input.last_name,
      email:      input.email,
      mobile:     input.mobile.and_then(non_empty),
      locality:   input.locality,
      is_admin:   false,
      is_creator: false,
      created_at: now(),
    };

    let p = profile.clone();
    let created_at = encode_dt(p.created_at);
    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT OR IGNORE INTO profiles (
             user_id, first_name, last_name, email, mobile,
             village, taluka, district, state, is_admin, is_creator, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, 0, ?10)",
          rusqlite::params![
            p.user_id.as_str(),
            p.first_name,
            p.last_name,
            p.email,
            p.mobile,
            p.locality.village,
            p.locality.taluka,
            p.locality.district,
            p.locality.state,
            created_at,
          ],
        )?;
        Ok(n == 1)
      })
      .await?;

    if !inserted {
      return Ok(None);
    }
    tracing::debug!(user_id = %profile.user_id, "profile created");
    Ok(Some(profile))
  }

  async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>> {
    let id = user_id.as_str().to_owned();
    let raw = self.conn.call(move |conn| Ok(select_profile(conn, &id)?)).await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY first_name, last_name, user_id"
        ))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn update_profile(
    &self,
    user_id: &UserId,
    update: ProfileUpdate,
  ) -> Result<Option<Profile>> {
    let id = user_id.as_str().to_owned();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(raw) = select_profile(&tx, &id)? else {
          return Ok(None);
        };
        let mut profile = in_call(raw.into_profile())?;
        update.apply(&mut profile);

        tx.execute(
          "UPDATE profiles SET
             first_name = ?2, last_name = ?3, mobile = ?4,
             village = ?5, taluka = ?6, district = ?7, state = ?8
           WHERE user_id = ?1",
          rusqlite::params![
            id,
            profile.first_name,
            profile.last_name,
            profile.mobile,
            profile.locality.village,
            profile.locality.taluka,
            profile.locality.district,
            profile.locality.state,
          ],
        )?;
        tx.commit()?;
        Ok(Some(profile))
      })
      .await?;

    Ok(updated)
  }

  async fn set_creator(&self, user_id: &UserId, is_creator: bool) -> Result<Option<Profile>> {
    let id = user_id.as_str().to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE profiles SET is_creator = ?2 WHERE user_id = ?1",
          rusqlite::params![id, is_creator],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_profile(conn, &id)?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn set_admin(&self, user_id: &UserId, is_admin: bool) -> Result<Option<Profile>> {
    let id = user_id.as_str().to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE profiles SET is_admin = ?2 WHERE user_id = ?1",
          rusqlite::params![id, is_admin],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_profile(conn, &id)?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn delete_member(&self, user_id: &UserId) -> Result<Option<CascadeReport>> {
    let id = user_id.as_str().to_owned();

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row("SELECT 1 FROM profiles WHERE user_id = ?1", [&id], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }

        let mut report = delete_posts_where(&tx, "author_id = ?1", &id)?;
        report = merge(report, delete_comments_where(&tx, "author_id = ?1", &id)?);
        report.reactions +=
          tx.execute("DELETE FROM reactions WHERE user_id = ?1", [&id])? as u64;
        report.memberships =
          tx.execute("DELETE FROM memberships WHERE user_id = ?1", [&id])? as u64;
        report.profiles =
          tx.execute("DELETE FROM profiles WHERE user_id = ?1", [&id])? as u64;

        tx.commit()?;
        Ok(Some(report))
      })
      .await?;

    Ok(report)
  }

  // ── Membership ────────────────────────────────────────────────────────────

  async fn get_membership(&self, user_id: &UserId) -> Result<Membership> {
    let id = user_id.as_str().to_owned();
    let names = self.conn.call(move |conn| Ok(load_membership(conn, &id)?)).await?;
    Ok(names.into_iter().collect())
  }

  async fn join_community(&self, user_id: &UserId, community: &str) -> Result<Membership> {
    let id = user_id.as_str().to_owned();
    let name = community.to_owned();
    let joined_at = encode_dt(now());

    let names = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO memberships (user_id, community_name, joined_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id, name, joined_at],
        )?;
        Ok(load_membership(conn, &id)?)
      })
      .await?;

    Ok(names.into_iter().collect())
  }

  async fn leave_community(&self, user_id: &UserId, community: &str) -> Result<Membership> {
    let id = user_id.as_str().to_owned();
    let name = community.to_owned();

    let names = self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM memberships WHERE user_id = ?1 AND community_name = ?2",
          rusqlite::params![id, name],
        )?;
        Ok(load_membership(conn, &id)?)
      })
      .await?;

    Ok(names.into_iter().collect())
  }

  async fn member_count(&self, community: &str) -> Result<u64> {
    let name = community.to_owned();
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM memberships WHERE community_name = ?1",
          [name],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── Communities ───────────────────────────────────────────────────────────

  async fn create_community(&self, input: NewCommunity) -> Result<Community> {
    let community = Community {
      community_id: Uuid::new_v4(),
      name:         input.name,
      description:  input.description,
      info:         input.info.and_then(non_empty),
      category:     input.category,
      created_at:   now(),
    };

    let id_str = encode_uuid(community.community_id);
    let at_str = encode_dt(community.created_at);
    let c = community.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO communities (community_id, name, description, info, category, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, c.name, c.description, c.info, c.category, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(name = %community.name, "community created");
    Ok(community)
  }

  async fn get_community(&self, community_id: Uuid) -> Result<Option<Community>> {
    let id = encode_uuid(community_id);
    let raw = self.conn.call(move |conn| Ok(select_community(conn, &id)?)).await?;
    raw.map(RawCommunity::into_community).transpose()
  }

  async fn find_community(&self, name: &str) -> Result<Option<Community>> {
    let name = name.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMMUNITY_COLUMNS} FROM communities WHERE name = ?1"),
            [name],
            RawCommunity::from_row,
          )
          .optional()?)
      })
      .await?;
    raw.map(RawCommunity::into_community).transpose()
  }

  async fn list_communities(&self) -> Result<Vec<Community>> {
    let raws: Vec<RawCommunity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {COMMUNITY_COLUMNS} FROM communities ORDER BY name"))?;
        let rows = stmt
          .query_map([], RawCommunity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommunity::into_community).collect()
  }

  async fn update_community(
    &self,
    community_id: Uuid,
    update: CommunityUpdate,
  ) -> Result<Option<Community>> {
    let id = encode_uuid(community_id);
    let update = update.normalized();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(old) = select_community(&tx, &id)? else {
          return Ok(None);
        };

        tx.execute(
          "UPDATE communities SET
             name        = COALESCE(?2, name),
             description = COALESCE(?3, description),
             info        = CASE WHEN ?4 IS NULL THEN info ELSE NULLIF(TRIM(?4), '') END,
             category    = COALESCE(?5, category)
           WHERE community_id = ?1",
          rusqlite::params![id, update.name, update.description, update.info, update.category],
        )?;

        if let Some(new_name) = update.name.as_deref().filter(|n| *n != old.name) {
          // Users already holding the new name keep a single entry.
          tx.execute(
            "UPDATE OR IGNORE memberships SET community_name = ?2 WHERE community_name = ?1",
            rusqlite::params![old.name, new_name],
          )?;
          tx.execute("DELETE FROM memberships WHERE community_name = ?1", [&old.name])?;
        }

        let raw = select_community(&tx, &id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawCommunity::into_community).transpose()
  }

  async fn delete_community(&self, community_id: Uuid) -> Result<Option<CascadeReport>> {
    let id = encode_uuid(community_id);

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(name) = tx
          .query_row(
            "SELECT name FROM communities WHERE community_id = ?1",
            [&id],
            |r| r.get::<_, String>(0),
          )
          .optional()?
        else {
          return Ok(None);
        };

        let mut report = delete_posts_where(&tx, "community_id = ?1", &id)?;
        report = merge(report, delete_comments_where(&tx, "community_id = ?1", &id)?);
        report.memberships =
          tx.execute("DELETE FROM memberships WHERE community_name = ?1", [&name])? as u64;
        report.communities =
          tx.execute("DELETE FROM communities WHERE community_id = ?1", [&id])? as u64;

        tx.commit()?;
        Ok(Some(report))
      })
      .await?;

    Ok(report)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:      Uuid::new_v4(),
      community_id: input.community_id,
      category:     input.category,
      title:        input.title,
      content:      input.content,
      author_id:    input.author_id,
      author_name:  input.author_name,
      created_at:   now(),
      updated_at:   None,
    };

    let id_str = encode_uuid(post.post_id);
    let community_str = encode_uuid(post.community_id);
    let at_str = encode_dt(post.created_at);
    let p = post.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (
             post_id, community_id, category, title, content,
             author_id, author_name, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            community_str,
            p.category.as_ref(),
            p.title,
            p.content,
            p.author_id.as_str(),
            p.author_name,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
    let id = encode_uuid(post_id);
    let raw = self.conn.call(move |conn| Ok(select_post(conn, &id)?)).await?;
    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
    let community = encode_uuid(query.community_id);
    let category = query.category.map(|c| c.as_ref().to_owned());

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts
           WHERE community_id = ?1
             AND (?2 IS NULL OR category = ?2)
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![community, category], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn update_post(&self, post_id: Uuid, update: PostUpdate) -> Result<Option<Post>> {
    let id = encode_uuid(post_id);
    let category = update.category.map(|c| c.as_ref().to_owned());
    let updated_at = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE posts SET
             title      = COALESCE(?2, title),
             content    = COALESCE(?3, content),
             category   = COALESCE(?4, category),
             updated_at = ?5
           WHERE post_id = ?1",
          rusqlite::params![id, update.title, update.content, category, updated_at],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_post(conn, &id)?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn delete_post(&self, post_id: Uuid) -> Result<Option<CascadeReport>> {
    let id = encode_uuid(post_id);

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let report = delete_posts_where(&tx, "post_id = ?1", &id)?;
        if report.posts == 0 {
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(report))
      })
      .await?;

    Ok(report)
  }

  async fn post_count(&self, community_id: Uuid) -> Result<u64> {
    let id = encode_uuid(community_id);
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM posts WHERE community_id = ?1",
          [id],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let comment = Comment {
      comment_id:   Uuid::new_v4(),
      post_id:      input.post_id,
      community_id: input.community_id,
      author_id:    input.author_id,
      author_name:  input.author_name,
      content:      input.content,
      created_at:   now(),
    };

    let id_str = encode_uuid(comment.comment_id);
    let post_str = encode_uuid(comment.post_id);
    let community_str = encode_uuid(comment.community_id);
    let at_str = encode_dt(comment.created_at);
    let c = comment.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (
             comment_id, post_id, community_id, author_id, author_name, content, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            post_str,
            community_str,
            c.author_id.as_str(),
            c.author_name,
            c.content,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
    let id = encode_uuid(comment_id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1"),
            [id],
            RawComment::from_row,
          )
          .optional()?)
      })
      .await?;
    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    let id = encode_uuid(post_id);
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map([id], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn delete_comment(&self, comment_id: Uuid) -> Result<Option<CascadeReport>> {
    let id = encode_uuid(comment_id);

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let report = delete_comments_where(&tx, "comment_id = ?1", &id)?;
        if report.comments == 0 {
          return Ok(None);
        }
        tx.commit()?;
        Ok(Some(report))
      })
      .await?;

    Ok(report)
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  async fn apply_reaction(
    &self,
    target: ReactionTarget,
    user_id: &UserId,
    desired: ReactionKind,
  ) -> Result<ReactionState> {
    let target_type = target.kind.as_ref().to_owned();
    let target_id = encode_uuid(target.id);
    let user = user_id.as_str().to_owned();
    let reacted_at = encode_dt(now());

    let state = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front, so no other toggle can
        // slip between the lookup and the write.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing: Option<String> = tx
          .query_row(
            "SELECT kind FROM reactions
             WHERE target_type = ?1 AND target_id = ?2 AND user_id = ?3",
            rusqlite::params![target_type, target_id, user],
            |r| r.get(0),
          )
          .optional()?;
        let existing = in_call(existing.as_deref().map(decode_reaction_kind).transpose())?;

        let write = ReactionWrite::plan(existing, desired);
        match write {
          ReactionWrite::Insert(kind) => tx.execute(
            "INSERT INTO reactions (reaction_id, target_type, target_id, user_id, kind, reacted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              encode_uuid(Uuid::new_v4()),
              target_type,
              target_id,
              user,
              kind.as_ref(),
              reacted_at,
            ],
          )?,
          ReactionWrite::Delete => tx.execute(
            "DELETE FROM reactions
             WHERE target_type = ?1 AND target_id = ?2 AND user_id = ?3",
            rusqlite::params![target_type, target_id, user],
          )?,
          ReactionWrite::Update(kind) => tx.execute(
            "UPDATE reactions SET kind = ?4, reacted_at = ?5
             WHERE target_type = ?1 AND target_id = ?2 AND user_id = ?3",
            rusqlite::params![target_type, target_id, user, kind.as_ref(), reacted_at],
          )?,
        };

        tx.commit()?;
        Ok(write.outcome())
      })
      .await?;

    tracing::debug!(
      kind = %target.kind,
      id = %target.id,
      user_id = %user_id,
      ?state,
      "reaction applied"
    );
    Ok(state)
  }

  async fn reaction_of(&self, target: ReactionTarget, user_id: &UserId) -> Result<ReactionState> {
    let target_type = target.kind.as_ref().to_owned();
    let target_id = encode_uuid(target.id);
    let user = user_id.as_str().to_owned();

    let kind: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT kind FROM reactions
             WHERE target_type = ?1 AND target_id = ?2 AND user_id = ?3",
            rusqlite::params![target_type, target_id, user],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(kind.as_deref().map(decode_reaction_kind).transpose()?.into())
  }

  async fn reaction_counts(&self, target: ReactionTarget) -> Result<ReactionCounts> {
    let target_type = target.kind.as_ref().to_owned();
    let target_id = encode_uuid(target.id);

    let kinds: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT kind FROM reactions WHERE target_type = ?1 AND target_id = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![target_type, target_id], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    let kinds = kinds
      .iter()
      .map(|k| decode_reaction_kind(k))
      .collect::<Result<Vec<_>>>()?;
    Ok(ReactionCounts::tally(kinds))
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  async fn write_stats(&self, stats: &PortalStats) -> Result<()> {
    let (members, communities, villages) =
      (stats.members as i64, stats.communities as i64, stats.villages as i64);
    let updated_at = encode_dt(stats.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO stats (key, members, communities, villages, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![STATS_KEY, members, communities, villages, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn read_stats(&self) -> Result<Option<PortalStats>> {
    let raw = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT members, communities, villages, updated_at FROM stats WHERE key = ?1",
            [STATS_KEY],
            |r| {
              Ok(RawStats {
                members:     r.get(0)?,
                communities: r.get(1)?,
                villages:    r.get(2)?,
                updated_at:  r.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawStats::into_stats).transpose()
  }
}
