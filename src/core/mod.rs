//! Core components of the `ticker-search` crate.
//!
//! This module contains the foundational building blocks:
//! - The [`QuoteClient`] and its builder, including the rate-limit retry loop.
//! - The primary [`QuoteError`] type.
//! - The [`Quote`] model handed back to callers.
//! - The [`QuoteService`] seam used by the HTTP layer.

/// The provider client (`QuoteClient`), builder, and retry configuration.
pub mod client;
/// The primary error type (`QuoteError`) for the crate.
pub mod error;
/// The `Quote` model.
pub mod models;
/// Service trait abstracting quote lookups.
pub mod services;

/// Fixture recording used by the live tests (`test-mode` only).
#[cfg(feature = "test-mode")]
pub mod fixtures;

pub(crate) mod net;

pub use client::{QuoteClient, QuoteClientBuilder};
pub use error::QuoteError;
pub use models::Quote;
pub use services::QuoteService;
