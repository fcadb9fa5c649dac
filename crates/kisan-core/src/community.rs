//! Communities and the shared post-category table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Community ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
  pub community_id: Uuid,
  /// Unique and always lowercase; see [`normalize_name`].
  pub name:         String,
  pub description:  String,
  /// Optional long-form information shown on the community page.
  pub info:         Option<String>,
  pub category:     String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::PortalStore::create_community`].
#[derive(Debug, Clone)]
pub struct NewCommunity {
  pub name:        String,
  pub description: String,
  pub info:        Option<String>,
  pub category:    String,
}

impl NewCommunity {
  /// Normalise the name so it can be used as a unique key.
  pub fn normalized(mut self) -> Self {
    self.name = normalize_name(&self.name);
    self
  }
}

/// Partial admin edit of a community. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityUpdate {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub info:        Option<String>,
  pub category:    Option<String>,
}

impl CommunityUpdate {
  pub fn normalized(mut self) -> Self {
    self.name = self.name.as_deref().map(normalize_name);
    self
  }
}

/// Community names are compared and stored lowercase, without surrounding
/// whitespace.
pub fn normalize_name(name: &str) -> String { name.trim().to_lowercase() }

// ─── Post categories ─────────────────────────────────────────────────────────

/// Every post belongs to exactly one of these. This is the single definition
/// of the table; labels are looked up through [`PostCategory::label`].
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
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostCategory {
  Expert,
  Scheme,
  Success,
  Product,
  Tourism,
}

impl PostCategory {
  pub fn label(self) -> &'static str {
    match self {
      Self::Expert => "Experts' Corner",
      Self::Scheme => "Schemes and Subsidies",
      Self::Success => "Success Stories",
      Self::Product => "Products and Services",
      Self::Tourism => "Tourism Venues",
    }
  }

  /// Parse a category id as it appears in URLs and request bodies.
  pub fn parse(id: &str) -> Result<Self> {
    id.parse()
      .map_err(|_| Error::UnknownCategory(id.to_owned()))
  }

  /// `(id, label)` for every category, in display order.
  pub fn table() -> Vec<CategoryEntry> {
    Self::iter()
      .map(|c| CategoryEntry { id: c, label: c.label() })
      .collect()
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
  pub id:    PostCategory,
  pub label: &'static str,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_lowercased_and_trimmed() {
    assert_eq!(normalize_name("  Goat Farming "), "goat farming");

    let c = NewCommunity {
      name:        "Dairy".into(),
      description: "milk".into(),
      info:        None,
      category:    "livestock".into(),
    }
    .normalized();
    assert_eq!(c.name, "dairy");
  }

  #[test]
  fn category_table_is_complete() {
    let table = PostCategory::table();
    assert_eq!(table.len(), 5);
    assert_eq!(table[0].id, PostCategory::Expert);
    assert_eq!(table[1].label, "Schemes and Subsidies");
  }

  #[test]
  fn category_ids_round_trip_through_strings() {
    for entry in PostCategory::table() {
      assert_eq!(PostCategory::parse(entry.id.as_ref()).unwrap(), entry.id);
    }
    assert!(matches!(
      PostCategory::parse("weather"),
      Err(Error::UnknownCategory(s)) if s == "weather"
    ));
  }

  #[test]
  fn category_serializes_as_id() {
    let json = serde_json::to_string(&PostCategory::Tourism).unwrap();
    assert_eq!(json, "\"tourism\"");
  }
}
