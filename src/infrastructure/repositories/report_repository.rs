//! Report Repository Implementation
//!
//! PostgreSQL implementation of the ReportRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Report, ReportRepository, ReportStatus, ReportTargetType};
use crate::shared::error::AppError;

/// Database row representation matching the reports table schema.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: i64,
    reporter_id: i64,
    target_type: String,
    target_id: i64,
    reason: String,
    status: String,
    resolved_by: Option<i64>,
    resolution_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReportRow {
    /// Rows with unknown target types are skipped rather than surfaced as
    /// errors; the CHECK constraint makes this unreachable in practice.
    fn into_report(self) -> Option<Report> {
        Some(Report {
            id: self.id,
            reporter_id: self.reporter_id,
            target_type: ReportTargetType::from_str(&self.target_type)?,
            target_id: self.target_id,
            reason: self.reason,
            status: ReportStatus::from_str(&self.status),
            resolved_by: self.resolved_by,
            resolution_note: self.resolution_note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL report repository implementation.
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new PgReportRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    /// Find a report by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, reporter_id, target_type, target_id, reason, status,
                   resolved_by, resolution_note, created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(|r| r.into_report()))
    }

    /// List reports, optionally filtered by status, newest first.
    async fn list(
        &self,
        status: Option<ReportStatus>,
        after: Option<i64>,
        limit: i32,
    ) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, reporter_id, target_type, target_id, reason, status,
                   resolved_by, resolution_note, created_at, updated_at
            FROM reports
            WHERE ($1::VARCHAR IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(|r| r.into_report()).collect())
    }

    /// Create a new report.
    async fn create(&self, report: &Report) -> Result<Report, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO reports (id, reporter_id, target_type, target_id, reason, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, reporter_id, target_type, target_id, reason, status,
                      resolved_by, resolution_note, created_at, updated_at
            "#,
        )
        .bind(report.id)
        .bind(report.reporter_id)
        .bind(report.target_type.as_str())
        .bind(report.target_id)
        .bind(&report.reason)
        .bind(report.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_report()
            .ok_or_else(|| AppError::Internal("Report row has invalid target type".to_string()))
    }

    /// Close a report as resolved or dismissed. Only open reports move.
    async fn resolve(
        &self,
        id: i64,
        status: ReportStatus,
        resolved_by: i64,
        note: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = $2, resolved_by = $3, resolution_note = $4, updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(resolved_by)
        .bind(note)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Report is not open".to_string(),
            ));
        }

        Ok(())
    }
}

