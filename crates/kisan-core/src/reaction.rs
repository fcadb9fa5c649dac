//! Like/dislike reactions and the toggle protocol.
//!
//! A user holds at most one reaction per target. Applying a reaction is a
//! three-way decision over the existing row:
//!
//! | existing        | desired  | write              | result    |
//! |-----------------|----------|--------------------|-----------|
//! | none            | k        | insert `k`         | `k`       |
//! | `k`             | k        | delete             | none      |
//! | `j` (`j != k`)  | k        | update to `k`      | `k`       |
//!
//! [`ReactionWrite::plan`] makes that decision without touching storage so
//! that backends can run lookup and write inside one transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::profile::UserId;

// ─── Targets ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetKind {
  Post,
  Comment,
}

/// The thing being reacted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionTarget {
  pub kind: TargetKind,
  pub id:   Uuid,
}

impl ReactionTarget {
  pub fn post(id: Uuid) -> Self { Self { kind: TargetKind::Post, id } }

  pub fn comment(id: Uuid) -> Self { Self { kind: TargetKind::Comment, id } }
}

// ─── Kinds and state ─────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReactionKind {
  Like,
  Dislike,
}

/// A user's reaction to one target after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
  #[default]
  None,
  Like,
  Dislike,
}

impl From<Option<ReactionKind>> for ReactionState {
  fn from(kind: Option<ReactionKind>) -> Self {
    match kind {
      None => Self::None,
      Some(ReactionKind::Like) => Self::Like,
      Some(ReactionKind::Dislike) => Self::Dislike,
    }
  }
}

/// A stored reaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
  pub reaction_id: Uuid,
  pub target:      ReactionTarget,
  pub user_id:     UserId,
  pub kind:        ReactionKind,
  pub reacted_at:  DateTime<Utc>,
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

/// The single write a toggle needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionWrite {
  Insert(ReactionKind),
  Delete,
  Update(ReactionKind),
}

impl ReactionWrite {
  pub fn plan(existing: Option<ReactionKind>, desired: ReactionKind) -> Self {
    match existing {
      None => Self::Insert(desired),
      Some(current) if current == desired => Self::Delete,
      Some(_) => Self::Update(desired),
    }
  }

  /// The user's reaction once this write has been applied.
  pub fn outcome(self) -> ReactionState {
    match self {
      Self::Insert(kind) | Self::Update(kind) => Some(kind).into(),
      Self::Delete => ReactionState::None,
    }
  }
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Derived per-target totals; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
  pub likes:    u64,
  pub dislikes: u64,
}

impl ReactionCounts {
  pub fn tally<I>(kinds: I) -> Self
  where
    I: IntoIterator<Item = ReactionKind>,
  {
    kinds.into_iter().fold(Self::default(), |mut acc, kind| {
      match kind {
        ReactionKind::Like => acc.likes += 1,
        ReactionKind::Dislike => acc.dislikes += 1,
      }
      acc
    })
  }

  pub fn total(&self) -> u64 { self.likes + self.dislikes }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  use super::ReactionKind::{Dislike, Like};

  #[test]
  fn first_reaction_inserts() {
    let w = ReactionWrite::plan(None, Like);
    assert_eq!(w, ReactionWrite::Insert(Like));
    assert_eq!(w.outcome(), ReactionState::Like);
  }

  #[test]
  fn same_reaction_toggles_off() {
    let w = ReactionWrite::plan(Some(Dislike), Dislike);
    assert_eq!(w, ReactionWrite::Delete);
    assert_eq!(w.outcome(), ReactionState::None);
  }

  #[test]
  fn other_reaction_switches() {
    let w = ReactionWrite::plan(Some(Like), Dislike);
    assert_eq!(w, ReactionWrite::Update(Dislike));
    assert_eq!(w.outcome(), ReactionState::Dislike);
  }

  /// Replays toggles against a map keyed by user, the same shape as the
  /// unique (target, user) constraint.
  #[test]
  fn any_sequence_keeps_one_row_per_user() {
    let mut rows: HashMap<&str, ReactionKind> = HashMap::new();
    let clicks = [
      ("a", Like),
      ("b", Dislike),
      ("a", Like),
      ("a", Dislike),
      ("c", Like),
      ("b", Like),
      ("c", Like),
      ("a", Like),
    ];

    for (user, desired) in clicks {
      match ReactionWrite::plan(rows.get(user).copied(), desired) {
        ReactionWrite::Insert(k) | ReactionWrite::Update(k) => {
          rows.insert(user, k);
        }
        ReactionWrite::Delete => {
          rows.remove(user);
        }
      }
    }

    let counts = ReactionCounts::tally(rows.values().copied());
    assert_eq!(counts, ReactionCounts { likes: 2, dislikes: 0 });
    assert!(counts.total() <= 3);
  }

  #[test]
  fn kinds_use_lowercase_wire_names() {
    assert_eq!(Like.as_ref(), "like");
    assert_eq!("dislike".parse::<ReactionKind>().unwrap(), Dislike);
    assert_eq!(TargetKind::Comment.to_string(), "comment");
    assert_eq!(
      serde_json::to_string(&ReactionState::None).unwrap(),
      "\"none\""
    );
  }
}
