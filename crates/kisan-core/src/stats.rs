//! Public portal statistics.
//!
//! Computed out-of-band by the stats batch job and stored as a single
//! document; the live API only ever reads the stored copy.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{community::Community, profile::Profile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalStats {
  pub members:     u64,
  pub communities: u64,
  /// Distinct non-empty village names across all profiles.
  pub villages:    u64,
  pub updated_at:  DateTime<Utc>,
}

impl PortalStats {
  pub fn tally(
    profiles: &[Profile],
    communities: &[Community],
    now: DateTime<Utc>,
  ) -> Self {
    let villages: HashSet<&str> = profiles
      .iter()
      .filter_map(|p| p.locality.village.as_deref())
      .filter(|v| !v.is_empty())
      .collect();

    Self {
      members:     profiles.len() as u64,
      communities: communities.len() as u64,
      villages:    villages.len() as u64,
      updated_at:  now,
    }
  }
}
