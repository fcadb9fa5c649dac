//! Cascading deletes, run inside a caller-owned transaction.
//!
//! Each helper selects its victims with a fixed `WHERE` condition over one
//! bound parameter (`?1`). Children are removed before their parents so the
//! `posts` and `comments` foreign keys hold at every step.

use kisan_core::store::CascadeReport;
use rusqlite::Transaction;

/// Delete the posts matching `cond`, their comments, and every reaction on
/// either.
pub fn delete_posts_where(
  tx: &Transaction<'_>,
  cond: &'static str,
  param: &str,
) -> rusqlite::Result<CascadeReport> {
  let posts = format!("SELECT post_id FROM posts WHERE {cond}");
  let comments = format!("SELECT comment_id FROM comments WHERE post_id IN ({posts})");

  let mut reactions = tx.execute(
    &format!(
      "DELETE FROM reactions WHERE target_type = 'comment' AND target_id IN ({comments})"
    ),
    [param],
  )?;
  let comments = tx.execute(
    &format!("DELETE FROM comments WHERE post_id IN ({posts})"),
    [param],
  )?;
  reactions += tx.execute(
    &format!("DELETE FROM reactions WHERE target_type = 'post' AND target_id IN ({posts})"),
    [param],
  )?;
  let posts = tx.execute(&format!("DELETE FROM posts WHERE {cond}"), [param])?;

  Ok(CascadeReport {
    posts: posts as u64,
    comments: comments as u64,
    reactions: reactions as u64,
    ..Default::default()
  })
}

/// Delete the comments matching `cond` and the reactions on them.
pub fn delete_comments_where(
  tx: &Transaction<'_>,
  cond: &'static str,
  param: &str,
) -> rusqlite::Result<CascadeReport> {
  let reactions = tx.execute(
    &format!(
      "DELETE FROM reactions WHERE target_type = 'comment' AND target_id IN \
       (SELECT comment_id FROM comments WHERE {cond})"
    ),
    [param],
  )?;
  let comments = tx.execute(&format!("DELETE FROM comments WHERE {cond}"), [param])?;

  Ok(CascadeReport {
    comments: comments as u64,
    reactions: reactions as u64,
    ..Default::default()
  })
}

/// Field-wise sum, for folding the steps of one cascade together.
pub fn merge(a: CascadeReport, b: CascadeReport) -> CascadeReport {
  CascadeReport {
    communities: a.communities + b.communities,
    posts:       a.posts + b.posts,
    comments:    a.comments + b.comments,
    reactions:   a.reactions + b.reactions,
    memberships: a.memberships + b.memberships,
    profiles:    a.profiles + b.profiles,
  }
}
