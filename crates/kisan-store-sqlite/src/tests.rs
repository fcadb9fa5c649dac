//! Integration tests for `SqliteStore` against an in-memory database.

use kisan_core::{
  community::{CommunityUpdate, NewCommunity, PostCategory},
  content::{NewComment, NewPost, PostUpdate},
  profile::{Locality, NewProfile, ProfileUpdate, UserId},
  reaction::{ReactionCounts, ReactionKind, ReactionState, ReactionTarget},
  stats::PortalStats,
  store::{CascadeReport, PortalStore, PostQuery},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn uid(s: &str) -> UserId { UserId::new(s).unwrap() }

async fn register(s: &SqliteStore, id: &str, village: Option<&str>) -> UserId {
  let user_id = uid(id);
  s.create_profile(NewProfile {
    user_id:    user_id.clone(),
    first_name: id.to_uppercase(),
    last_name:  "Patil".into(),
    email:      format!("{id}@example.com"),
    mobile:     None,
    locality:   Locality {
      village: village.map(str::to_owned),
      ..Default::default()
    },
  })
  .await
  .unwrap()
  .unwrap();
  user_id
}

async fn community(s: &SqliteStore, name: &str) -> Uuid {
  s.create_community(
    NewCommunity {
      name:        name.into(),
      description: format!("all about {name}"),
      info:        None,
      category:    "livestock".into(),
    }
    .normalized(),
  )
  .await
  .unwrap()
  .community_id
}

async fn post(s: &SqliteStore, community_id: Uuid, author: &UserId, title: &str) -> Uuid {
  s.create_post(NewPost {
    community_id,
    category: PostCategory::Expert,
    title: title.into(),
    content: "*body*".into(),
    author_id: author.clone(),
    author_name: author.to_string(),
  })
  .await
  .unwrap()
  .post_id
}

async fn comment(s: &SqliteStore, post_id: Uuid, community_id: Uuid, author: &UserId) -> Uuid {
  s.add_comment(NewComment {
    post_id,
    community_id,
    author_id: author.clone(),
    author_name: author.to_string(),
    content: "nice".into(),
  })
  .await
  .unwrap()
  .comment_id
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_profile() {
  let s = store().await;
  let id = register(&s, "asha", Some("Wai")).await;

  let p = s.get_profile(&id).await.unwrap().unwrap();
  assert_eq!(p.first_name, "ASHA");
  assert_eq!(p.locality.village.as_deref(), Some("Wai"));
  assert!(!p.is_admin);
  assert!(!p.is_creator);

  assert!(s.get_profile(&uid("nobody")).await.unwrap().is_none());
}

#[tokio::test]
async fn second_profile_for_same_user_is_refused() {
  let s = store().await;
  let id = register(&s, "asha", Some("Wai")).await;

  let again = s
    .create_profile(NewProfile {
      user_id:    id.clone(),
      first_name: "Other".into(),
      last_name:  "Name".into(),
      email:      "other@example.com".into(),
      mobile:     None,
      locality:   Locality::default(),
    })
    .await
    .unwrap();
  assert!(again.is_none());
  assert_eq!(s.get_profile(&id).await.unwrap().unwrap().first_name, "ASHA");
}

#[tokio::test]
async fn update_profile_blanks_clear_optional_fields() {
  let s = store().await;
  let id = register(&s, "asha", Some("Wai")).await;

  let p = s
    .update_profile(&id, ProfileUpdate {
      last_name: Some("Jadhav".into()),
      village: Some("  ".into()),
      district: Some("Satara".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(p.last_name, "Jadhav");
  assert_eq!(p.locality.village, None);
  assert_eq!(p.locality.district.as_deref(), Some("Satara"));

  let stored = s.get_profile(&id).await.unwrap().unwrap();
  assert_eq!(stored, p);

  let missing = s.update_profile(&uid("ghost"), ProfileUpdate::default()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn set_creator_flag() {
  let s = store().await;
  let id = register(&s, "asha", None).await;

  assert!(s.set_creator(&id, true).await.unwrap().unwrap().is_creator);
  assert!(!s.set_creator(&id, false).await.unwrap().unwrap().is_creator);
  assert!(s.set_creator(&uid("ghost"), true).await.unwrap().is_none());
}

#[tokio::test]
async fn set_admin_flag() {
  let s = store().await;
  let id = register(&s, "asha", None).await;

  let p = s.set_admin(&id, true).await.unwrap().unwrap();
  assert!(p.is_admin);
  assert!(!p.is_creator);
  assert!(s.get_profile(&id).await.unwrap().unwrap().is_admin);
}

// ─── Membership ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn join_is_idempotent_and_leave_removes() {
  let s = store().await;
  let id = register(&s, "asha", None).await;
  community(&s, "goat").await;
  community(&s, "dairy").await;

  s.join_community(&id, "goat").await.unwrap();
  let m = s.join_community(&id, "goat").await.unwrap();
  assert_eq!(m.iter().collect::<Vec<_>>(), ["goat"]);

  let m = s.join_community(&id, "dairy").await.unwrap();
  assert_eq!(m.iter().collect::<Vec<_>>(), ["dairy", "goat"]);
  assert_eq!(s.member_count("goat").await.unwrap(), 1);

  let m = s.leave_community(&id, "goat").await.unwrap();
  assert!(!m.contains("goat"));
  assert_eq!(s.member_count("goat").await.unwrap(), 0);

  // Leaving twice is fine.
  s.leave_community(&id, "goat").await.unwrap();
  assert_eq!(s.get_membership(&id).await.unwrap().iter().count(), 1);
}

// ─── Communities ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn communities_are_found_by_lowercase_name() {
  let s = store().await;
  let id = community(&s, "Goat Farming").await;

  let c = s.find_community("goat farming").await.unwrap().unwrap();
  assert_eq!(c.community_id, id);
  assert!(s.find_community("Goat Farming").await.unwrap().is_none());

  community(&s, "apiary").await;
  let names: Vec<_> =
    s.list_communities().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, ["apiary", "goat farming"]);
}

#[tokio::test]
async fn rename_carries_memberships() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let id = community(&s, "goat").await;
  s.join_community(&a, "goat").await.unwrap();
  s.join_community(&b, "goat").await.unwrap();

  let c = s
    .update_community(id, CommunityUpdate {
      name: Some(" Goats ".into()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(c.name, "goats");
  assert_eq!(c.description, "all about goat");

  assert!(s.get_membership(&a).await.unwrap().contains("goats"));
  assert!(!s.get_membership(&b).await.unwrap().contains("goat"));
  assert_eq!(s.member_count("goats").await.unwrap(), 2);

  assert!(
    s.update_community(Uuid::new_v4(), CommunityUpdate::default())
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Posts and comments ──────────────────────────────────────────────────────

#[tokio::test]
async fn posts_list_newest_first_by_category() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let goat = community(&s, "goat").await;
  let dairy = community(&s, "dairy").await;

  post(&s, goat, &a, "first").await;
  post(&s, goat, &b, "second").await;
  post(&s, goat, &a, "third").await;
  post(&s, dairy, &a, "elsewhere").await;

  let titles = |posts: Vec<kisan_core::content::Post>| {
    posts.into_iter().map(|p| p.title).collect::<Vec<_>>()
  };

  let all = s.list_posts(&PostQuery::community(goat)).await.unwrap();
  assert_eq!(titles(all), ["third", "second", "first"]);

  let schemes = s
    .list_posts(&PostQuery {
      category: Some(PostCategory::Scheme),
      ..PostQuery::community(goat)
    })
    .await
    .unwrap();
  assert!(schemes.is_empty());

  assert_eq!(s.post_count(goat).await.unwrap(), 3);
}

#[tokio::test]
async fn update_post_sets_updated_at() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let goat = community(&s, "goat").await;
  let id = post(&s, goat, &a, "draft").await;

  let p = s
    .update_post(id, PostUpdate {
      title: Some("final".into()),
      category: Some(PostCategory::Success),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(p.title, "final");
  assert_eq!(p.content, "*body*");
  assert_eq!(p.category, PostCategory::Success);
  assert!(p.updated_at.is_some());

  assert!(s.update_post(Uuid::new_v4(), PostUpdate::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn comments_list_oldest_first() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let goat = community(&s, "goat").await;
  let p = post(&s, goat, &a, "q").await;

  let c1 = comment(&s, p, goat, &a).await;
  let c2 = comment(&s, p, goat, &a).await;

  let ids: Vec<_> =
    s.list_comments(p).await.unwrap().into_iter().map(|c| c.comment_id).collect();
  assert_eq!(ids, [c1, c2]);
}

// ─── Reactions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn reaction_toggle_cycle() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let goat = community(&s, "goat").await;
  let target = ReactionTarget::post(post(&s, goat, &a, "q").await);

  let like = s.apply_reaction(target, &a, ReactionKind::Like).await.unwrap();
  assert_eq!(like, ReactionState::Like);

  let dislike = s.apply_reaction(target, &a, ReactionKind::Dislike).await.unwrap();
  assert_eq!(dislike, ReactionState::Dislike);
  assert_eq!(
    s.reaction_counts(target).await.unwrap(),
    ReactionCounts { likes: 0, dislikes: 1 }
  );

  let none = s.apply_reaction(target, &a, ReactionKind::Dislike).await.unwrap();
  assert_eq!(none, ReactionState::None);
  assert_eq!(s.reaction_of(target, &a).await.unwrap(), ReactionState::None);
  assert_eq!(s.reaction_counts(target).await.unwrap().total(), 0);
}

#[tokio::test]
async fn concurrent_toggles_keep_one_row_per_user() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let goat = community(&s, "goat").await;
  let target = ReactionTarget::post(post(&s, goat, &a, "q").await);

  let mut handles = Vec::new();
  for _ in 0..9 {
    let s = s.clone();
    let a = a.clone();
    handles.push(tokio::spawn(async move {
      s.apply_reaction(target, &a, ReactionKind::Like).await.unwrap()
    }));
  }
  for h in handles {
    h.await.unwrap();
  }

  // Nine toggles serialize to like, none, like, ... and end on like.
  assert_eq!(s.reaction_of(target, &a).await.unwrap(), ReactionState::Like);
  assert_eq!(s.reaction_counts(target).await.unwrap().likes, 1);
}

#[tokio::test]
async fn reactions_are_per_user_and_per_target() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let goat = community(&s, "goat").await;
  let p = post(&s, goat, &a, "q").await;
  let c = comment(&s, p, goat, &b).await;

  s.apply_reaction(ReactionTarget::post(p), &a, ReactionKind::Like).await.unwrap();
  s.apply_reaction(ReactionTarget::post(p), &b, ReactionKind::Like).await.unwrap();
  s.apply_reaction(ReactionTarget::comment(c), &a, ReactionKind::Dislike).await.unwrap();

  assert_eq!(s.reaction_counts(ReactionTarget::post(p)).await.unwrap().likes, 2);
  assert_eq!(
    s.reaction_counts(ReactionTarget::comment(c)).await.unwrap(),
    ReactionCounts { likes: 0, dislikes: 1 }
  );
  assert_eq!(
    s.reaction_of(ReactionTarget::comment(c), &b).await.unwrap(),
    ReactionState::None
  );
}

// ─── Cascades ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_post_removes_comments_and_reactions() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let goat = community(&s, "goat").await;
  let p = post(&s, goat, &a, "q").await;
  let c = comment(&s, p, goat, &b).await;
  s.apply_reaction(ReactionTarget::post(p), &b, ReactionKind::Like).await.unwrap();
  s.apply_reaction(ReactionTarget::comment(c), &a, ReactionKind::Like).await.unwrap();

  let report = s.delete_post(p).await.unwrap().unwrap();
  assert_eq!(report, CascadeReport { posts: 1, comments: 1, reactions: 2, ..Default::default() });

  assert!(s.get_post(p).await.unwrap().is_none());
  assert!(s.get_comment(c).await.unwrap().is_none());
  assert_eq!(s.reaction_counts(ReactionTarget::comment(c)).await.unwrap().total(), 0);
  assert!(s.delete_post(p).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_comment_removes_its_reactions() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let goat = community(&s, "goat").await;
  let p = post(&s, goat, &a, "q").await;
  let c = comment(&s, p, goat, &a).await;
  s.apply_reaction(ReactionTarget::comment(c), &a, ReactionKind::Dislike).await.unwrap();

  let report = s.delete_comment(c).await.unwrap().unwrap();
  assert_eq!(report.comments, 1);
  assert_eq!(report.reactions, 1);
  assert!(s.get_post(p).await.unwrap().is_some());
  assert!(s.delete_comment(c).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_community_cascades() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let goat = community(&s, "goat").await;
  let dairy = community(&s, "dairy").await;
  s.join_community(&a, "goat").await.unwrap();
  s.join_community(&a, "dairy").await.unwrap();
  s.join_community(&b, "goat").await.unwrap();

  let p = post(&s, goat, &a, "q").await;
  comment(&s, p, goat, &b).await;
  s.apply_reaction(ReactionTarget::post(p), &b, ReactionKind::Like).await.unwrap();
  let kept = post(&s, dairy, &a, "stays").await;

  let report = s.delete_community(goat).await.unwrap().unwrap();
  assert_eq!(report, CascadeReport {
    communities: 1,
    posts:       1,
    comments:    1,
    reactions:   1,
    memberships: 2,
    profiles:    0,
  });

  assert!(s.get_community(goat).await.unwrap().is_none());
  assert!(s.get_post(kept).await.unwrap().is_some());
  let m = s.get_membership(&a).await.unwrap();
  assert!(!m.contains("goat"));
  assert!(m.contains("dairy"));
  assert!(s.delete_community(goat).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_member_removes_everything_they_authored() {
  let s = store().await;
  let a = register(&s, "a", None).await;
  let b = register(&s, "b", None).await;
  let goat = community(&s, "goat").await;
  s.join_community(&a, "goat").await.unwrap();

  // a's post with b's comment; b's post with a's comment and a's reaction.
  let pa = post(&s, goat, &a, "by a").await;
  let cb = comment(&s, pa, goat, &b).await;
  let pb = post(&s, goat, &b, "by b").await;
  let ca = comment(&s, pb, goat, &a).await;
  s.apply_reaction(ReactionTarget::post(pb), &a, ReactionKind::Like).await.unwrap();
  s.apply_reaction(ReactionTarget::comment(cb), &b, ReactionKind::Like).await.unwrap();

  let report = s.delete_member(&a).await.unwrap().unwrap();
  assert_eq!(report.profiles, 1);
  assert_eq!(report.posts, 1);
  assert_eq!(report.comments, 2);
  assert_eq!(report.reactions, 2);
  assert_eq!(report.memberships, 1);

  assert!(s.get_profile(&a).await.unwrap().is_none());
  assert!(s.get_post(pa).await.unwrap().is_none());
  assert!(s.get_comment(cb).await.unwrap().is_none());
  assert!(s.get_comment(ca).await.unwrap().is_none());
  assert!(s.get_post(pb).await.unwrap().is_some());
  assert_eq!(s.reaction_counts(ReactionTarget::post(pb)).await.unwrap().total(), 0);
  assert!(s.get_profile(&b).await.unwrap().is_some());

  assert!(s.delete_member(&a).await.unwrap().is_none());
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_document_is_replaced() {
  let s = store().await;
  assert!(s.read_stats().await.unwrap().is_none());

  register(&s, "a", Some("Wai")).await;
  register(&s, "b", Some("Wai")).await;
  community(&s, "goat").await;

  let profiles = s.list_profiles().await.unwrap();
  let communities = s.list_communities().await.unwrap();
  let stats = PortalStats::tally(&profiles, &communities, crate::encode::now());
  s.write_stats(&stats).await.unwrap();
  s.write_stats(&stats).await.unwrap();

  let stored = s.read_stats().await.unwrap().unwrap();
  assert_eq!(stored, stats);
  assert_eq!((stored.members, stored.communities, stored.villages), (2, 1, 1));
}
