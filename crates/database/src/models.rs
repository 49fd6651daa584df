//! Database models.

use chrono::NaiveDate;
use honors_core::{Anniversary, AnniversaryKind, Assignment, MemberSummary};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DatabaseError;

/// A member of the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Auto-incrementing ID.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Contact email, if known.
    pub email: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Member> for MemberSummary {
    fn from(member: Member) -> Self {
        MemberSummary {
            id: member.id,
            first_name: member.first_name,
            last_name: member.last_name,
            email: member.email,
        }
    }
}

/// A stored honor assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AssignmentRow {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    /// Honor key.
    pub honor: String,
    /// Order the honor had in the saved set.
    pub position: i64,
    /// Assigned member, NULL when open.
    pub member_id: Option<i64>,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Assignment {
            honor: row.honor,
            member_id: row.member_id,
        }
    }
}

/// A stored organization setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A stored anniversary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AnniversaryRow {
    pub id: i64,
    pub name: String,
    /// ISO date (YYYY-MM-DD) of the original event.
    pub date: String,
    /// "wedding" or "bnai".
    pub kind: String,
}

impl TryFrom<AnniversaryRow> for Anniversary {
    type Error = DatabaseError;

    fn try_from(row: AnniversaryRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| DatabaseError::Corrupt {
            entity: "Anniversary",
            id: row.id.to_string(),
            reason,
        };
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| corrupt(format!("date '{}': {}", row.date, e)))?;
        let kind = AnniversaryKind::parse(&row.kind)
            .ok_or_else(|| corrupt(format!("unknown kind '{}'", row.kind)))?;
        Ok(Anniversary {
            id: row.id,
            name: row.name,
            date,
            kind,
        })
    }
}
