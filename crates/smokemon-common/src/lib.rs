//! Shared value types for the smokemon workspace.

pub mod time;
pub mod types;
