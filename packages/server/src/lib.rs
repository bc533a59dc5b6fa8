//! Real-time chat relay server library.
//!
//! Clients join with a display name, exchange short text messages and see a
//! synchronized roster of connected participants. The server keeps no history:
//! every accepted event is fanned out once to the connections open at that time.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
