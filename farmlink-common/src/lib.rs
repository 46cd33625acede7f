//! # farmlink common library
//!
//! Shared code for the farmlink service:
//! - Error taxonomy
//! - Configuration resolution
//! - Credential hashing and session-cookie signing
//! - Database pool initialization, schema, and models

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
