//! Core types and traits for the linkpulse URL shortener.
//!
//! This crate provides the record schema shared by the shortener and the
//! redirector, the repository contracts both of them talk to, and the
//! error taxonomy surfaced to callers.

pub mod client;
pub mod error;
pub mod link;
pub mod owner;
pub mod repository;
pub mod short_id;
pub mod shortener;

pub use client::{Browser, ClientInfo, Device, Os};
pub use error::{CoreError, ShortenerError, StorageError};
pub use link::{NewShortLink, ShortLink, VisitRecord, DIRECT_REFERRER};
pub use owner::Owner;
pub use repository::{ReadRepository, Repository};
pub use short_id::ShortId;
pub use shortener::{ShortenParams, Shortener};
