//! Upstream API client for cratedigger.
//!
//! This crate provides the authenticated Discogs transport, typed endpoint
//! URL builders, and the cache-composed fetch operation route handlers call
//! into.

pub mod cached;
pub mod discogs;

pub use cached::CachedClient;
pub use discogs::{ApiTransport, DiscogsClient, DiscogsConfig, DiscogsError};
