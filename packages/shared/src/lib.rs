//! Utilities shared across the Chatter packages.

pub mod logger;
pub mod time;
