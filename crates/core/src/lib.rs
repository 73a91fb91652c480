//! Core types and shared functionality for cratedigger.
//!
//! This crate provides:
//! - The process-local upstream response cache
//! - Application configuration with layered loading

pub mod cache;
pub mod config;

pub use cache::ResponseCache;
pub use config::AppConfig;
