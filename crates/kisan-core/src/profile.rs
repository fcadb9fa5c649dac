//! Profiles and community memberships.
//!
//! A profile is created when a member registers and carries the only two
//! persisted role flags. Membership is a plain set of community names; the
//! "member" role is derived from it, never stored.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, role::RoleFlags};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque account reference issued by the identity service.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn new(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(Error::InvalidUserId);
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// Where a member farms. Every field is optional at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
  pub village:  Option<String>,
  pub taluka:   Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:    UserId,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub mobile:     Option<String>,
  pub locality:   Locality,
  pub is_admin:   bool,
  pub is_creator: bool,
  pub created_at: DateTime<Utc>,
}

impl Profile {
  /// `"first last"`, trimmed; used for display and deletion confirmation.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
      .trim()
      .to_owned()
  }

  pub fn flags(&self) -> RoleFlags {
    RoleFlags { is_admin: self.is_admin, is_creator: self.is_creator }
  }
}

/// Input to [`crate::store::PortalStore::create_profile`].
///
/// Role flags are not accepted here: a fresh profile is never an admin or a
/// creator.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub user_id:    UserId,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub mobile:     Option<String>,
  pub locality:   Locality,
}

/// Partial update of the member-editable profile fields. `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub mobile:     Option<String>,
  pub village:    Option<String>,
  pub taluka:     Option<String>,
  pub district:   Option<String>,
  pub state:      Option<String>,
}

impl ProfileUpdate {
  /// Apply this update to `profile` in place.
  pub fn apply(self, profile: &mut Profile) {
    if let Some(v) = self.first_name {
      profile.first_name = v;
    }
    if let Some(v) = self.last_name {
      profile.last_name = v;
    }
    if let Some(v) = self.mobile {
      profile.mobile = non_empty(v);
    }
    if let Some(v) = self.village {
      profile.locality.village = non_empty(v);
    }
    if let Some(v) = self.taluka {
      profile.locality.taluka = non_empty(v);
    }
    if let Some(v) = self.district {
      profile.locality.district = non_empty(v);
    }
    if let Some(v) = self.state {
      profile.locality.state = non_empty(v);
    }
  }
}

/// Blank optional fields are stored as absent.
pub fn non_empty(value: String) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ─── Membership ──────────────────────────────────────────────────────────────

/// The set of communities a user has joined, keyed by community name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
  pub communities: BTreeSet<String>,
}

impl Membership {
  pub fn contains(&self, community: &str) -> bool {
    self.communities.contains(community)
  }

  pub fn is_empty(&self) -> bool { self.communities.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.communities.iter().map(String::as_str)
  }
}

impl<S: Into<String>> FromIterator<S> for Membership {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self { communities: iter.into_iter().map(Into::into).collect() }
  }
}
