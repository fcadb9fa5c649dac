//! The per-request session context.
//!
//! A [`Session`] is built fresh for every request from the identity asserted
//! by the identity service plus the current profile and membership. Handlers
//! receive it explicitly; nothing about the signed-in user is held globally.

use crate::{
  Error, Result,
  profile::{Membership, Profile, UserId},
  role::{Role, RoleFlags, resolve_role},
};

#[derive(Debug, Clone)]
pub enum Session {
  Anonymous,
  Authenticated(Viewer),
}

/// A signed-in user. `profile` is `None` between sign-up and registration.
#[derive(Debug, Clone)]
pub struct Viewer {
  pub user_id:    UserId,
  pub profile:    Option<Profile>,
  pub membership: Membership,
}

impl Session {
  pub fn role(&self, community: Option<&str>) -> Role {
    match self {
      Self::Anonymous => Role::Guest,
      Self::Authenticated(v) => v.role(community),
    }
  }

  pub fn viewer(&self) -> Option<&Viewer> {
    match self {
      Self::Anonymous => None,
      Self::Authenticated(v) => Some(v),
    }
  }

  pub fn require_viewer(&self) -> Result<&Viewer> {
    self.viewer().ok_or(Error::NotSignedIn)
  }
}

impl Viewer {
  pub fn flags(&self) -> RoleFlags {
    self.profile.as_ref().map(Profile::flags).unwrap_or_default()
  }

  pub fn role(&self, community: Option<&str>) -> Role {
    resolve_role(self.flags(), &self.membership, community)
  }

  pub fn is_admin(&self) -> bool { self.flags().is_admin }

  pub fn is_joined(&self, community: &str) -> bool {
    self.membership.contains(community)
  }

  /// The registered profile, needed for anything that records an author.
  pub fn require_profile(&self) -> Result<&Profile> {
    self.profile.as_ref().ok_or(Error::NotRegistered)
  }

  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::Forbidden("admin only"))
    }
  }

  /// Community-scoped actions (posting, commenting, reacting) need an actual
  /// membership; the role alone is not enough.
  pub fn require_joined(&self, community: &str) -> Result<()> {
    if self.is_joined(community) {
      Ok(())
    } else {
      Err(Error::NotAMember(community.to_owned()))
    }
  }

  /// Creating a post takes both a membership and the creator or admin role.
  pub fn require_poster(&self, community: &str) -> Result<()> {
    self.require_joined(community)?;
    match self.role(Some(community)) {
      Role::Admin | Role::Creator => Ok(()),
      _ => Err(Error::Forbidden("only creators and admins may create posts")),
    }
  }

  pub fn require_author_or_admin(&self, author: &UserId) -> Result<()> {
    if &self.user_id == author || self.is_admin() {
      Ok(())
    } else {
      Err(Error::Forbidden("only the author or an admin may do that"))
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::profile::Locality;

  fn viewer(is_admin: bool, is_creator: bool, joined: &[&str]) -> Viewer {
    let user_id = UserId::new("u1").unwrap();
    Viewer {
      profile: Some(Profile {
        user_id: user_id.clone(),
        first_name: "Ravi".into(),
        last_name: "Kumar".into(),
        email: "ravi@example.com".into(),
        mobile: None,
        locality: Locality::default(),
        is_admin,
        is_creator,
        created_at: Utc::now(),
      }),
      user_id,
      membership: joined.iter().copied().collect(),
    }
  }

  #[test]
  fn anonymous_is_guest() {
    assert_eq!(Session::Anonymous.role(None), Role::Guest);
    assert_eq!(Session::Anonymous.role(Some("goat")), Role::Guest);
    assert!(matches!(
      Session::Anonymous.require_viewer(),
      Err(Error::NotSignedIn)
    ));
  }

  #[test]
  fn unregistered_viewer_is_plain_user() {
    let v = Viewer {
      user_id:    UserId::new("new").unwrap(),
      profile:    None,
      membership: Membership::default(),
    };
    assert_eq!(v.role(None), Role::User);
    assert!(matches!(v.require_profile(), Err(Error::NotRegistered)));
  }

  #[test]
  fn creator_still_needs_membership_to_post() {
    let v = viewer(false, true, &[]);
    assert_eq!(v.role(Some("goat")), Role::Creator);
    assert!(matches!(v.require_joined("goat"), Err(Error::NotAMember(_))));
  }

  #[test]
  fn posting_needs_creator_or_admin_and_membership() {
    assert!(matches!(
      viewer(false, false, &["goat"]).require_poster("goat"),
      Err(Error::Forbidden(_))
    ));
    assert!(matches!(
      viewer(false, true, &["dairy"]).require_poster("goat"),
      Err(Error::NotAMember(_))
    ));
    assert!(viewer(false, true, &["goat"]).require_poster("goat").is_ok());
    assert!(viewer(true, false, &["goat"]).require_poster("goat").is_ok());
    assert!(matches!(
      viewer(true, false, &[]).require_poster("goat"),
      Err(Error::NotAMember(_))
    ));
  }

  #[test]
  fn author_or_admin_gate() {
    let other = UserId::new("someone-else").unwrap();

    let author = viewer(false, false, &["goat"]);
    assert!(author.require_author_or_admin(&author.user_id).is_ok());
    assert!(author.require_author_or_admin(&other).is_err());

    let admin = viewer(true, false, &[]);
    assert!(admin.require_author_or_admin(&other).is_ok());
    assert!(admin.require_admin().is_ok());
    assert!(author.require_admin().is_err());
  }
}
