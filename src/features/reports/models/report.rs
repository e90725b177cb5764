use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reports::models::Category;

/// Report status enum matching database enum
///
/// `Pending` is the initial state; `Resolved` is terminal. Admins move
/// reports freely among the non-terminal states; the engine only forbids
/// writes to a resolved report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Assigned,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Assigned => write!(f, "assigned"),
            ReportStatus::InProgress => write!(f, "in_progress"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Database model for a citizen report
///
/// The effective assignee is not stored: it is "the worker whose assigned
/// category equals this report's category", recomputed on every read.
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub longitude: f64,
    pub latitude: f64,
    pub photo_url: Option<String>,
    pub status: ReportStatus,
    /// Immutable after creation
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new report
#[derive(Debug)]
pub struct CreateReport {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub longitude: f64,
    pub latitude: f64,
    pub photo_url: Option<String>,
    pub submitted_by: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_resolved_is_terminal() {
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Assigned.is_terminal());
        assert!(!ReportStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let status: ReportStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(status, ReportStatus::Resolved);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        assert!(serde_json::from_str::<ReportStatus>("\"archived\"").is_err());
    }
}
