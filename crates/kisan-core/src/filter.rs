//! Admin-panel member listing and filtering.

use serde::{Deserialize, Serialize};

use crate::{
  profile::{Membership, Profile},
  role::{Role, resolve_role},
};

/// One row of the admin member table.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRecord {
  pub profile:     Profile,
  pub memberships: Vec<String>,
  /// Role without community context.
  pub role:        Role,
}

impl MemberRecord {
  pub fn new(profile: Profile, membership: Membership) -> Self {
    let role = resolve_role(profile.flags(), &membership, None);
    Self {
      profile,
      memberships: membership.communities.into_iter().collect(),
      role,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberField {
  Name,
  Village,
  Taluka,
  District,
  State,
  Community,
}

/// Case-insensitive substring filter over one member field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
  pub field: Option<MemberField>,
  #[serde(default)]
  pub value: String,
}

impl MemberFilter {
  pub fn matches(&self, member: &MemberRecord) -> bool {
    let needle = self.value.trim().to_lowercase();
    let Some(field) = self.field else { return true };
    if needle.is_empty() {
      return true;
    }

    let contains = |hay: Option<&str>| {
      hay.is_some_and(|h| h.to_lowercase().contains(&needle))
    };
    let locality = &member.profile.locality;

    match field {
      MemberField::Name => contains(Some(member.profile.full_name().as_str())),
      MemberField::Village => contains(locality.village.as_deref()),
      MemberField::Taluka => contains(locality.taluka.as_deref()),
      MemberField::District => contains(locality.district.as_deref()),
      MemberField::State => contains(locality.state.as_deref()),
      MemberField::Community => {
        member.memberships.iter().any(|c| contains(Some(c.as_str())))
      }
    }
  }

  pub fn apply(&self, members: Vec<MemberRecord>) -> Vec<MemberRecord> {
    members.into_iter().filter(|m| self.matches(m)).collect()
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::profile::{Locality, UserId};

  fn record(first: &str, last: &str, village: Option<&str>, joined: &[&str]) -> MemberRecord {
    let profile = Profile {
      user_id:    UserId::new(first).unwrap(),
      first_name: first.into(),
      last_name:  last.into(),
      email:      format!("{first}@example.com"),
      mobile:     None,
      locality:   Locality {
        village: village.map(str::to_owned),
        state: Some("Maharashtra".into()),
        ..Default::default()
      },
      is_admin:   false,
      is_creator: false,
      created_at: Utc::now(),
    };
    MemberRecord::new(profile, joined.iter().copied().collect())
  }

  fn filter(field: MemberField, value: &str) -> MemberFilter {
    MemberFilter { field: Some(field), value: value.into() }
  }

  #[test]
  fn role_is_derived_without_context() {
    assert_eq!(record("a", "b", None, &["goat"]).role, Role::Member);
    assert_eq!(record("a", "b", None, &[]).role, Role::User);
  }

  #[test]
  fn name_matches_full_name_case_insensitively() {
    let m = record("Sunita", "Jadhav", None, &[]);
    assert!(filter(MemberField::Name, "ta jad").matches(&m));
    assert!(!filter(MemberField::Name, "pawar").matches(&m));
  }

  #[test]
  fn missing_locality_never_matches() {
    let m = record("a", "b", None, &[]);
    assert!(!filter(MemberField::Village, "wai").matches(&m));
    assert!(filter(MemberField::State, "maha").matches(&m));
  }

  #[test]
  fn community_matches_any_membership() {
    let m = record("a", "b", None, &["dairy", "goat"]);
    assert!(filter(MemberField::Community, "GOA").matches(&m));
    assert!(!filter(MemberField::Community, "poultry").matches(&m));
  }

  #[test]
  fn empty_filter_keeps_everyone() {
    let members = vec![record("a", "b", None, &[]), record("c", "d", Some("Wai"), &[])];
    assert_eq!(MemberFilter::default().apply(members.clone()).len(), 2);
    assert_eq!(filter(MemberField::Village, "  ").apply(members.clone()).len(), 2);
    assert_eq!(filter(MemberField::Village, "wai").apply(members).len(), 1);
  }
}
