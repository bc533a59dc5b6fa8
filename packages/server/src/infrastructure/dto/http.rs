//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

impl HealthDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Diagnostics view of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterDto {
    pub users: Vec<String>,
    pub connections: usize,
}
