use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    ContactRecord, GeoPoint, NewContact, NewReport, NotificationEvent, ReportRecord,
    ReportStatus, UserRecord,
};
use crate::services::store::{
    ContactLog, NotificationSink, ReportStore, StoreError, UserDirectory,
};

/// PostgreSQL-backed implementation of every collaborator interface:
/// user directory, report store, contact log and notification sink.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect and run migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn user_from_row(row: &PgRow) -> UserRecord {
    let point = match (
        row.get::<Option<f64>, _>("latitude"),
        row.get::<Option<f64>, _>("longitude"),
    ) {
        (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
        _ => None,
    };

    UserRecord {
        id: row.get("id"),
        full_name: row.get("full_name"),
        image_url: row.get("image_url"),
        role: row.get("role"),
        point,
        phone: row.get("phone"),
        email: row.get("email"),
    }
}

fn report_from_row(row: &PgRow) -> ReportRecord {
    ReportRecord {
        id: row.get("id"),
        reporter_id: row.get("reporter_id"),
        pet_name: row.get("pet_name"),
        species: row.get("species"),
        breed: row.get("breed"),
        description: row.get("description"),
        last_seen_location: row.get("last_seen_location"),
        point: GeoPoint {
            lat: row.get("latitude"),
            lon: row.get("longitude"),
        },
        image_url: row.get("image_url"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

fn contact_from_row(row: &PgRow) -> ContactRecord {
    ContactRecord {
        id: row.get("id"),
        report_id: row.get("report_id"),
        contact_user_id: row.get("contact_user_id"),
        message: row.get("message"),
        contact_phone: row.get("contact_phone"),
        contact_email: row.get("contact_email"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserDirectory for PostgresClient {
    async fn get_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let query = r#"
            SELECT id, full_name, image_url, role, latitude, longitude, phone, email
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let query = r#"
            SELECT id, full_name, image_url, role, latitude, longitude, phone, email
            FROM users
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(user_from_row).collect())
    }
}

#[async_trait]
impl ReportStore for PostgresClient {
    async fn save(&self, report: NewReport) -> Result<ReportRecord, StoreError> {
        let query = r#"
            INSERT INTO missing_pet_reports
                (reporter_id, pet_name, species, breed, description,
                 last_seen_location, latitude, longitude, image_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, reporter_id, pet_name, species, breed, description,
                      last_seen_location, latitude, longitude, image_url, status, created_at
        "#;

        let row = sqlx::query(query)
            .bind(report.reporter_id)
            .bind(&report.pet_name)
            .bind(&report.species)
            .bind(&report.breed)
            .bind(&report.description)
            .bind(&report.last_seen_location)
            .bind(report.point.lat)
            .bind(report.point.lon)
            .bind(&report.image_url)
            .bind(report.status)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Saved report for reporter {}", report.reporter_id);
        Ok(report_from_row(&row))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ReportRecord>, StoreError> {
        let query = r#"
            SELECT id, reporter_id, pet_name, species, breed, description,
                   last_seen_location, latitude, longitude, image_url, status, created_at
            FROM missing_pet_reports
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(report_from_row))
    }

    async fn find_by_status(
        &self,
        status: ReportStatus,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        let query = r#"
            SELECT id, reporter_id, pet_name, species, breed, description,
                   last_seen_location, latitude, longitude, image_url, status, created_at
            FROM missing_pet_reports
            WHERE status = $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(report_from_row).collect())
    }

    async fn find_by_reporter(
        &self,
        reporter_id: i64,
    ) -> Result<Vec<ReportRecord>, StoreError> {
        let query = r#"
            SELECT id, reporter_id, pet_name, species, breed, description,
                   last_seen_location, latitude, longitude, image_url, status, created_at
            FROM missing_pet_reports
            WHERE reporter_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(reporter_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(report_from_row).collect())
    }

    async fn list_active(&self) -> Result<Vec<ReportRecord>, StoreError> {
        let query = r#"
            SELECT id, reporter_id, pet_name, species, breed, description,
                   last_seen_location, latitude, longitude, image_url, status, created_at
            FROM missing_pet_reports
            WHERE status <> 'REUNITED'
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(report_from_row).collect())
    }

    async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
    ) -> Result<ReportRecord, StoreError> {
        let query = r#"
            UPDATE missing_pet_reports
            SET status = $2
            WHERE id = $1
            RETURNING id, reporter_id, pet_name, species, breed, description,
                      last_seen_location, latitude, longitude, image_url, status, created_at
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(report_from_row(&row))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM missing_pet_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NotificationSink for PostgresClient {
    async fn emit(&self, event: NotificationEvent) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO notifications (user_id, type, message, related_entity_id, sender_id)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(event.recipient_id)
            .bind(event.kind.as_str())
            .bind(&event.message)
            .bind(event.related_entity_id)
            .bind(event.actor_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Emitted {} notification to user {}",
            event.kind.as_str(),
            event.recipient_id
        );
        Ok(())
    }
}

#[async_trait]
impl ContactLog for PostgresClient {
    async fn record(&self, contact: NewContact) -> Result<ContactRecord, StoreError> {
        let query = r#"
            INSERT INTO missing_pet_contacts
                (report_id, contact_user_id, message, contact_phone, contact_email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, report_id, contact_user_id, message,
                      contact_phone, contact_email, created_at
        "#;

        let row = sqlx::query(query)
            .bind(contact.report_id)
            .bind(contact.contact_user_id)
            .bind(&contact.message)
            .bind(&contact.contact_phone)
            .bind(&contact.contact_email)
            .fetch_one(&self.pool)
            .await?;

        Ok(contact_from_row(&row))
    }

    async fn list_for_report(&self, report_id: i64) -> Result<Vec<ContactRecord>, StoreError> {
        let query = r#"
            SELECT id, report_id, contact_user_id, message,
                   contact_phone, contact_email, created_at
            FROM missing_pet_contacts
            WHERE report_id = $1
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(report_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    async fn delete_for_report(&self, report_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM missing_pet_contacts WHERE report_id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
