use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{CreateReport, Report, ReportStatus};
use crate::features::reports::services::access::VisibleScope;
use crate::shared::constants::MAX_WRITE_RETRIES;

const REPORT_COLUMNS: &str = "id, title, description, category, longitude, latitude, \
     photo_url, status, submitted_by, created_at, updated_at";

/// Service for report persistence and the status state machine
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new report in `pending` status
    pub async fn create(&self, data: &CreateReport) -> Result<Report> {
        let query = format!(
            "INSERT INTO reports \
                 (title, description, category, longitude, latitude, photo_url, submitted_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REPORT_COLUMNS}"
        );

        let report = sqlx::query_as::<_, Report>(&query)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category)
            .bind(data.longitude)
            .bind(data.latitude)
            .bind(&data.photo_url)
            .bind(data.submitted_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            report_id = %report.id,
            category = %report.category,
            submitted_by = %report.submitted_by,
            "Created report"
        );

        Ok(report)
    }

    /// Fetch a report by id, regardless of scope. Callers apply visibility.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", id)))
    }

    /// List the reports visible under a scope, newest first.
    ///
    /// The scope becomes a WHERE clause, so a worker's list reflects their
    /// current assignment at read time.
    pub async fn list_in_scope(&self, scope: VisibleScope) -> Result<Vec<Report>> {
        let reports = match scope {
            VisibleScope::All => {
                let query = format!(
                    "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Report>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibleScope::SubmittedBy(user_id) => {
                let query = format!(
                    "SELECT {REPORT_COLUMNS} FROM reports \
                     WHERE submitted_by = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Report>(&query)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibleScope::Category(category) => {
                let query = format!(
                    "SELECT {REPORT_COLUMNS} FROM reports \
                     WHERE category = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Report>(&query)
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibleScope::Nothing => Vec::new(),
        };

        Ok(reports)
    }

    /// Set a report's status, refusing writes to resolved reports.
    ///
    /// The terminal check and the write are a single statement, so two
    /// concurrent updates cannot both slip past a `resolved` row. Retries a
    /// bounded number of times when the database reports a serialization
    /// failure, then surfaces `StoreConflict`.
    pub async fn update_status(&self, id: Uuid, status: ReportStatus) -> Result<Report> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_update_status(id, status).await {
                Err(AppError::Database(e))
                    if is_serialization_failure(&e) && attempts < MAX_WRITE_RETRIES =>
                {
                    tracing::warn!(
                        report_id = %id,
                        attempt = attempts,
                        "Status write hit a serialization conflict, retrying"
                    );
                }
                Err(AppError::Database(e)) if is_serialization_failure(&e) => {
                    return Err(AppError::StoreConflict(
                        "Report is being modified concurrently, try again".to_string(),
                    ));
                }
                other => return other,
            }
        }
    }

    async fn try_update_status(&self, id: Uuid, status: ReportStatus) -> Result<Report> {
        let query = format!(
            "UPDATE reports SET status = $2, updated_at = now() \
             WHERE id = $1 AND status <> 'resolved' \
             RETURNING {REPORT_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(report) => {
                tracing::info!(
                    report_id = %report.id,
                    status = %report.status,
                    "Updated report status"
                );
                Ok(report)
            }
            // No row matched: either the report is missing or the guard refused it.
            None => {
                let existing = self.get_by_id(id).await?;
                Err(blocked_status_write(&existing))
            }
        }
    }
}

/// Explain a status write that the guarded UPDATE refused.
///
/// The common case is a resolved report, which is permanently closed to
/// further writes. A non-terminal status means another writer moved the row
/// between our UPDATE and the follow-up read, so the caller should retry.
fn blocked_status_write(report: &Report) -> AppError {
    if report.status.is_terminal() {
        AppError::InvalidTransition(format!(
            "Report {} is resolved and can no longer change status",
            report.id
        ))
    } else {
        AppError::StoreConflict(
            "Report is being modified concurrently, try again".to_string(),
        )
    }
}

fn is_serialization_failure(error: &sqlx::Error) -> bool {
    // 40001 serialization_failure, 40P01 deadlock_detected
    matches!(
        error.as_database_error().and_then(|db| db.code()),
        Some(code) if code == "40001" || code == "40P01"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::Category;
    use chrono::Utc;

    fn report_with_status(status: ReportStatus) -> Report {
        Report {
            id: Uuid::new_v4(),
            title: "Broken streetlight on 5th".to_string(),
            description: "Dark corner at night".to_string(),
            category: Category::Streetlight,
            longitude: 106.8,
            latitude: -6.2,
            photo_url: None,
            status,
            submitted_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_blocked_write_on_resolved_report_is_invalid_transition() {
        let report = report_with_status(ReportStatus::Resolved);
        match blocked_status_write(&report) {
            AppError::InvalidTransition(msg) => {
                assert!(msg.contains(&report.id.to_string()));
            }
            other => panic!("expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_blocked_write_on_live_report_is_store_conflict() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Assigned,
            ReportStatus::InProgress,
        ] {
            let report = report_with_status(status);
            assert!(matches!(
                blocked_status_write(&report),
                AppError::StoreConflict(_)
            ));
        }
    }
}
