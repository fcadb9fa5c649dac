//! Lightweight markup for post and comment bodies.
//!
//! | Markup          | Output                                  |
//! |-----------------|-----------------------------------------|
//! | `[label](url)`  | anchor opening in a new tab             |
//! | `*text*`        | `<strong>`                              |
//! | `_text_`        | `<em>`                                  |
//! | `` `text` ``    | highlighted `<span>`                    |
//! | `~text~`        | underlined `<span>`                     |
//! | `- ` line start | `• ` prefix (not a list element)        |
//! | newline         | `<br>`                                  |
//!
//! The substitutions run in that order. Links are cut out first and their
//! URLs are never fed to the inline passes, so `*`, `_` and `~` inside a URL
//! survive. Existing HTML in the input is NOT escaped.

use std::sync::LazyLock;

use regex::Regex;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("invalid link pattern")
});

/// Inline passes in application order: `(pattern, replacement)`.
static INLINE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
  [
    (r"\*([^*]+)\*", "<strong>${1}</strong>"),
    (r"_([^_]+)_", "<em>${1}</em>"),
    (
      r"`([^`]+)`",
      "<span style=\"background-color: #ffeb3b; padding: 2px 4px; \
       border-radius: 3px;\">${1}</span>",
    ),
    (
      r"~([^~]+)~",
      "<span style=\"text-decoration: underline;\">${1}</span>",
    ),
  ]
  .into_iter()
  .map(|(p, r)| (Regex::new(p).expect("invalid inline pattern"), r))
  .collect()
});

static BULLET: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^- (.+)$").expect("invalid bullet pattern"));

/// Render raw markup to inline HTML.
pub fn format_text(raw: &str) -> String {
  if raw.is_empty() {
    return String::new();
  }

  let mut html = String::with_capacity(raw.len() * 2);
  let mut rest = 0;
  for caps in LINK.captures_iter(raw) {
    let Some(whole) = caps.get(0) else { continue };
    html.push_str(&format_inline(&raw[rest..whole.start()]));
    html.push_str(&anchor(&caps[2], &format_inline(&caps[1])));
    rest = whole.end();
  }
  html.push_str(&format_inline(&raw[rest..]));

  BULLET.replace_all(&html, "• ${1}").replace('\n', "<br>")
}

fn anchor(href: &str, label: &str) -> String {
  format!(
    "<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\" \
     style=\"color: #1976d2; text-decoration: underline;\">{label}</a>"
  )
}

fn format_inline(text: &str) -> String {
  INLINE.iter().fold(text.to_owned(), |acc, (re, rep)| {
    re.replace_all(&acc, *rep).into_owned()
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input() {
    assert_eq!(format_text(""), "");
  }

  #[test]
  fn bold() {
    assert_eq!(format_text("*bold*"), "<strong>bold</strong>");
  }

  #[test]
  fn italic_highlight_underline() {
    assert_eq!(format_text("_it_"), "<em>it</em>");
    assert_eq!(
      format_text("`hi`"),
      "<span style=\"background-color: #ffeb3b; padding: 2px 4px; \
       border-radius: 3px;\">hi</span>"
    );
    assert_eq!(
      format_text("~under~"),
      "<span style=\"text-decoration: underline;\">under</span>"
    );
  }

  #[test]
  fn link() {
    let html = format_text("[go](http://x.com)");
    assert!(html.starts_with("<a href=\"http://x.com\""), "{html}");
    assert!(html.contains("target=\"_blank\""), "{html}");
    assert!(html.ends_with(">go</a>"), "{html}");
  }

  #[test]
  fn link_url_is_not_reformatted() {
    let html = format_text("see [docs](http://x.com/a_b_c~d*e) and [more](http://y.com/_z_)");
    assert!(html.contains("href=\"http://x.com/a_b_c~d*e\""), "{html}");
    assert!(html.contains("href=\"http://y.com/_z_\""), "{html}");
    assert!(!html.contains("<em>"), "{html}");
  }

  #[test]
  fn link_label_is_formatted() {
    let html = format_text("[*big*](http://x.com)");
    assert!(html.ends_with("><strong>big</strong></a>"), "{html}");
  }

  #[test]
  fn bullets_and_line_breaks() {
    assert_eq!(format_text("- item"), "• item");
    assert_eq!(
      format_text("Seeds:\n- wheat\n- jowar\nnot-a-bullet"),
      "Seeds:<br>• wheat<br>• jowar<br>not-a-bullet"
    );
  }

  #[test]
  fn unmatched_markers_are_left_alone() {
    assert_eq!(format_text("2 * 3 = 6"), "2 * 3 = 6");
  }

  /// Current behaviour, not an aspiration: HTML in user content is not
  /// escaped.
  #[test]
  fn html_passes_through_unescaped() {
    let raw = "<script>alert(1)</script>";
    assert_eq!(format_text(raw), raw);
  }
}
