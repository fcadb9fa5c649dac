//! Client-input checks that run before any store call.

use crate::{Error, Result};

/// A required text field must contain something other than whitespace.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(trimmed)
  }
}

/// Like [`require`], for fields that may be absent from a partial update.
pub fn require_if_present(
  field: &'static str,
  value: Option<&str>,
) -> Result<()> {
  match value {
    Some(v) => require(field, v).map(|_| ()),
    None => Ok(()),
  }
}

/// Destructive actions ask the user to type a name back. Surrounding
/// whitespace is ignored; case is not.
pub fn confirm(expected: &str, typed: &str) -> Result<()> {
  if expected.trim() == typed.trim() {
    Ok(())
  } else {
    Err(Error::ConfirmationMismatch)
  }
}
