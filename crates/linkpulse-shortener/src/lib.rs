//! URL shortener service implementation.
//!
//! This crate provides the shortener service and the allocator that turns
//! generator candidates into persisted, unique short ids. Core types are
//! re-exported from `linkpulse_core`.

pub mod allocator;
pub mod service;

pub use allocator::Allocator;
pub use linkpulse_core::{ShortenParams, Shortener, ShortenerError};
pub use service::ShortenerService;
