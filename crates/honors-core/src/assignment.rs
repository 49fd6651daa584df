//! Assignment and member types shared by the store, server and clients.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::HonorsError;

/// A member (or nobody) assigned to one honor on a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Honor key (e.g., "1", "M").
    pub honor: String,
    /// Assigned member, `None` when the honor is open.
    pub member_id: Option<i64>,
}

impl Assignment {
    pub fn new(honor: impl Into<String>, member_id: Option<i64>) -> Self {
        Self {
            honor: honor.into(),
            member_id,
        }
    }

    /// Reject a set that names the same honor twice.
    pub fn ensure_unique(assignments: &[Assignment]) -> Result<(), HonorsError> {
        let mut seen = HashSet::new();
        for assignment in assignments {
            if !seen.insert(assignment.honor.as_str()) {
                return Err(HonorsError::DuplicateHonor(assignment.honor.clone()));
            }
        }
        Ok(())
    }
}

/// Body of a save: the complete assignment set for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub date: NaiveDate,
    pub assignments: Vec<Assignment>,
}

/// Server reply to a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Member search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MemberSummary {
    /// "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
