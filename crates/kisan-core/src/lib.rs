//! Core types and rules for the Kisan community portal.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the domain records, the role and reaction rules, the markup formatter and
//! the [`store::PortalStore`] abstraction every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod community;
pub mod content;
pub mod error;
pub mod feed;
pub mod filter;
pub mod markup;
pub mod profile;
pub mod reaction;
pub mod role;
pub mod session;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
