//! Common types for CBI (Cabin Bottle Inspector)
//!
//! Provides the pieces shared by CBI modules: the error taxonomy,
//! configuration loading, inspection event definitions with the EventBus,
//! and the wire vocabulary used by the operator-facing API.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use error::{Error, Result};
