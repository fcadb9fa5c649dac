//! Ordering and narrowing of a community's post list.

use serde::Deserialize;

use crate::{content::Post, profile::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrder {
  #[default]
  Newest,
  Oldest,
}

#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
  pub order:       FeedOrder,
  /// Keep only posts by this author ("my posts").
  pub authored_by: Option<UserId>,
}

/// Apply `options` to `posts`. Ties on `created_at` keep their input order.
pub fn arrange(mut posts: Vec<Post>, options: &FeedOptions) -> Vec<Post> {
  if let Some(author) = &options.authored_by {
    posts.retain(|p| &p.author_id == author);
  }
  match options.order {
    FeedOrder::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    FeedOrder::Oldest => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
  }
  posts
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::community::PostCategory;

  fn post(author: &str, secs: i64) -> Post {
    Post {
      post_id:      Uuid::new_v4(),
      community_id: Uuid::nil(),
      category:     PostCategory::Expert,
      title:        format!("{author}-{secs}"),
      content:      String::new(),
      author_id:    UserId::new(author).unwrap(),
      author_name:  author.into(),
      created_at:   Utc.timestamp_opt(secs, 0).unwrap(),
      updated_at:   None,
    }
  }

  fn titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
  }

  #[test]
  fn newest_first_by_default() {
    let posts = vec![post("a", 10), post("b", 30), post("a", 20)];
    let out = arrange(posts, &FeedOptions::default());
    assert_eq!(titles(&out), ["b-30", "a-20", "a-10"]);
  }

  #[test]
  fn oldest_first() {
    let posts = vec![post("a", 10), post("b", 30), post("a", 20)];
    let out = arrange(posts, &FeedOptions { order: FeedOrder::Oldest, authored_by: None });
    assert_eq!(titles(&out), ["a-10", "a-20", "b-30"]);
  }

  #[test]
  fn only_my_posts() {
    let posts = vec![post("a", 10), post("b", 30), post("a", 20)];
    let out = arrange(
      posts,
      &FeedOptions {
        order:       FeedOrder::Newest,
        authored_by: Some(UserId::new("a").unwrap()),
      },
    );
    assert_eq!(titles(&out), ["a-20", "a-10"]);
  }
}
