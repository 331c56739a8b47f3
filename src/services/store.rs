use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ContactRecord, NewContact, NewReport, NotificationEvent, ReportRecord, ReportStatus,
    UserRecord,
};

/// Errors from the persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Read access to the user population. The engine consumes this to seed
/// user locations and resolve display fields; account management lives
/// elsewhere.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;
    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// CRUD over missing/found pet reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, report: NewReport) -> Result<ReportRecord, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<ReportRecord>, StoreError>;
    async fn find_by_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, StoreError>;
    async fn find_by_reporter(&self, reporter_id: i64)
        -> Result<Vec<ReportRecord>, StoreError>;
    /// All non-terminal (MISSING or FOUND) reports, for index seeding.
    async fn list_active(&self) -> Result<Vec<ReportRecord>, StoreError>;
    async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
    ) -> Result<ReportRecord, StoreError>;
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// Fire-and-forget notification delivery. Persistence, delivery and
/// read-state are entirely the sink's concern; the engine only emits.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, event: NotificationEvent) -> Result<(), StoreError>;
}

/// Contact messages recorded against a report.
#[async_trait]
pub trait ContactLog: Send + Sync {
    async fn record(&self, contact: NewContact) -> Result<ContactRecord, StoreError>;
    async fn list_for_report(&self, report_id: i64) -> Result<Vec<ContactRecord>, StoreError>;
    async fn delete_for_report(&self, report_id: i64) -> Result<u64, StoreError>;
}
