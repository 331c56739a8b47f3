//! In-memory collaborator implementations, used by the integration
//! tests and for running the engine without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{
    ContactRecord, NewContact, NewReport, NotificationEvent, ReportRecord, ReportStatus,
    UserRecord,
};
use crate::services::store::{
    ContactLog, NotificationSink, ReportStore, StoreError, UserDirectory,
};

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<i64, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove(&self, id: i64) {
        self.users.write().await.remove(&id);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

pub struct InMemoryReportStore {
    reports: RwLock<HashMap<i64, ReportRecord>>,
    next_id: AtomicI64,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn save(&self, report: NewReport) -> Result<ReportRecord, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = ReportRecord {
            id,
            reporter_id: report.reporter_id,
            pet_name: report.pet_name,
            species: report.species,
            breed: report.breed,
            description: report.description,
            last_seen_location: report.last_seen_location,
            point: report.point,
            image_url: report.image_url,
            status: report.status,
            created_at: chrono::Utc::now(),
        };
        self.reports.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ReportRecord>, StoreError> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn find_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        let mut reports: Vec<ReportRecord> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        reports.sort_by_key(|r| r.id);
        Ok(reports)
    }

    async fn find_by_reporter(
        &self,
        reporter_id: i64,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        let mut reports: Vec<ReportRecord> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| r.reporter_id == reporter_id)
            .cloned()
            .collect();
        reports.sort_by_key(|r| r.id);
        Ok(reports)
    }

    async fn list_active(&self) -> Result<Vec<ReportRecord>, StoreError> {
        let mut reports: Vec<ReportRecord> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| r.status != ReportStatus::Reunited)
            .cloned()
            .collect();
        reports.sort_by_key(|r| r.id);
        Ok(reports)
    }

    async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
    ) -> Result<ReportRecord, StoreError> {
        let mut reports = self.reports.write().await;
        let report = reports.get_mut(&id).ok_or(StoreError::Sqlx(
            sqlx::Error::RowNotFound,
        ))?;
        report.status = status;
        Ok(report.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.reports.write().await.remove(&id).is_some())
    }
}

/// Records emitted events for inspection; the engine treats it as a
/// fire-and-forget sink like any other.
#[derive(Default)]
pub struct RecordingNotificationSink {
    events: RwLock<Vec<NotificationEvent>>,
}

impl RecordingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<NotificationEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotificationSink {
    async fn emit(&self, event: NotificationEvent) -> Result<(), StoreError> {
        self.events.write().await.push(event);
        Ok(())
    }
}

/// Sink that refuses every delivery, for exercising the engine's
/// failure path: creation and contact flows must survive it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingNotificationSink;

#[async_trait]
impl NotificationSink for FailingNotificationSink {
    async fn emit(&self, event: NotificationEvent) -> Result<(), StoreError> {
        Err(StoreError::SinkUnavailable(format!(
            "delivery refused for recipient {}",
            event.recipient_id
        )))
    }
}

pub struct InMemoryContactLog {
    contacts: RwLock<Vec<ContactRecord>>,
    next_id: AtomicI64,
}

impl InMemoryContactLog {
    pub fn new() -> Self {
        Self {
            contacts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryContactLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactLog for InMemoryContactLog {
    async fn record(&self, contact: NewContact) -> Result<ContactRecord, StoreError> {
        let record = ContactRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            report_id: contact.report_id,
            contact_user_id: contact.contact_user_id,
            message: contact.message,
            contact_phone: contact.contact_phone,
            contact_email: contact.contact_email,
            created_at: chrono::Utc::now(),
        };
        self.contacts.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_for_report(&self, report_id: i64) -> Result<Vec<ContactRecord>, StoreError> {
        Ok(self
            .contacts
            .read()
            .await
            .iter()
            .filter(|c| c.report_id == report_id)
            .cloned()
            .collect())
    }

    async fn delete_for_report(&self, report_id: i64) -> Result<u64, StoreError> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| c.report_id != report_id);
        Ok((before - contacts.len()) as u64)
    }
}
