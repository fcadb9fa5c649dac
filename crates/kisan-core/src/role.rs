//! Effective role derivation.
//!
//! Roles are never stored. They are recomputed from the two profile flags
//! and the membership set every time a session is built.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::profile::Membership;

/// The persisted role flags on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
  pub is_admin:   bool,
  pub is_creator: bool,
}

/// Effective role, highest precedence first.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Admin,
  Creator,
  Member,
  /// Signed in, but not a member of the community in question (or of any
  /// community when no context is given).
  User,
  /// No signed-in account.
  Guest,
}

/// Derive the role of a signed-in user.
///
/// With a `community` context, `Member` requires membership of that exact
/// community; without one, any membership counts. Admin and creator flags
/// win regardless of membership, so a creator viewing a community they have
/// not joined is still a `Creator`. Community-scoped actions must check
/// membership separately.
pub fn resolve_role(
  flags: RoleFlags,
  membership: &Membership,
  community: Option<&str>,
) -> Role {
  if flags.is_admin {
    return Role::Admin;
  }
  if flags.is_creator {
    return Role::Creator;
  }
  let is_member = match community {
    Some(name) => membership.contains(name),
    None => !membership.is_empty(),
  };
  if is_member { Role::Member } else { Role::User }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn flags(is_admin: bool, is_creator: bool) -> RoleFlags {
    RoleFlags { is_admin, is_creator }
  }

  fn joined(names: &[&str]) -> Membership {
    names.iter().copied().collect()
  }

  #[test]
  fn admin_wins_over_everything() {
    for creator in [false, true] {
      for m in [joined(&[]), joined(&["goat"])] {
        for ctx in [None, Some("goat"), Some("dairy")] {
          assert_eq!(resolve_role(flags(true, creator), &m, ctx), Role::Admin);
        }
      }
    }
  }

  #[test]
  fn creator_without_admin() {
    let m = joined(&[]);
    assert_eq!(resolve_role(flags(false, true), &m, None), Role::Creator);
    // Not a member of the viewed community, still a creator.
    assert_eq!(
      resolve_role(flags(false, true), &m, Some("goat")),
      Role::Creator
    );
  }

  #[test]
  fn member_of_viewed_community() {
    let m = joined(&["goat"]);
    assert_eq!(resolve_role(flags(false, false), &m, Some("goat")), Role::Member);
  }

  #[test]
  fn member_of_another_community_is_user_in_context() {
    let m = joined(&["dairy"]);
    assert_eq!(resolve_role(flags(false, false), &m, Some("goat")), Role::User);
  }

  #[test]
  fn any_membership_counts_without_context() {
    let m = joined(&["dairy"]);
    assert_eq!(resolve_role(flags(false, false), &m, None), Role::Member);
  }

  #[test]
  fn no_flags_no_membership_is_user() {
    let m = joined(&[]);
    assert_eq!(resolve_role(flags(false, false), &m, None), Role::User);
    assert_eq!(resolve_role(flags(false, false), &m, Some("goat")), Role::User);
  }
}
