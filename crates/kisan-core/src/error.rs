//! Error types for `kisan-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("sign in required")]
  NotSignedIn,

  #[error("no profile registered for this account")]
  NotRegistered,

  #[error("join community {0:?} to do that")]
  NotAMember(String),

  #[error("forbidden: {0}")]
  Forbidden(&'static str),

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("confirmation text does not match")]
  ConfirmationMismatch,

  #[error("user id must not be empty")]
  InvalidUserId,

  #[error("unknown post category: {0:?}")]
  UnknownCategory(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
