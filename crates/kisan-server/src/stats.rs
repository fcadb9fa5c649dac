//! The stats batch job.
//!
//! Counts members, communities and distinct villages, and replaces the
//! public stats document. The API only ever serves the stored copy.

use chrono::{DateTime, Utc};
use kisan_core::{stats::PortalStats, store::PortalStore};

/// Recompute [`PortalStats`] from the store and write them back.
pub async fn refresh_stats<S>(store: &S, now: DateTime<Utc>) -> Result<PortalStats, S::Error>
where
  S: PortalStore,
{
  let profiles = store.list_profiles().await?;
  let communities = store.list_communities().await?;
  let stats = PortalStats::tally(&profiles, &communities, now);
  store.write_stats(&stats).await?;

  tracing::info!(
    members = stats.members,
    communities = stats.communities,
    villages = stats.villages,
    "stats updated"
  );
  Ok(stats)
}

#[cfg(test)]
mod tests {
  use kisan_core::{
    community::NewCommunity,
    profile::{Locality, NewProfile, UserId},
  };
  use kisan_store_sqlite::SqliteStore;

  use super::*;

  async fn farmer(store: &SqliteStore, id: &str, village: &str) {
    store
      .create_profile(NewProfile {
        user_id:    UserId::new(id).unwrap(),
        first_name: id.into(),
        last_name:  "Patil".into(),
        email:      format!("{id}@example.com"),
        mobile:     None,
        locality:   Locality { village: Some(village.into()), ..Default::default() },
      })
      .await
      .unwrap()
      .unwrap();
  }

  #[tokio::test]
  async fn refresh_writes_the_public_document() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    farmer(&store, "a", "Wai").await;
    farmer(&store, "b", "Wai").await;
    farmer(&store, "c", "Karad").await;
    store
      .create_community(NewCommunity {
        name:        "goat".into(),
        description: "herding".into(),
        info:        None,
        category:    "livestock".into(),
      })
      .await
      .unwrap();

    let stats = refresh_stats(&store, Utc::now()).await.unwrap();
    assert_eq!((stats.members, stats.communities, stats.villages), (3, 1, 2));

    let stored = store.read_stats().await.unwrap().unwrap();
    assert_eq!(stored.members, 3);
    assert_eq!(stored.villages, 2);
  }
}
