//! Shared types for the storefront order core
//!
//! Boundary types consumed by both the order engine and the UI layer:
//! order records, the status state machine, timeline events, and command
//! payloads.

pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};
