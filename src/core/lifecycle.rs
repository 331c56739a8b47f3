use std::sync::Arc;

use crate::core::correlator::MatchCorrelator;
use crate::core::index::ProximityIndex;
use crate::error::EngineError;
use crate::models::{
    ContactResponse, CreateReportRequest, GeoPoint, NewContact, NewReport, NotificationEvent,
    NotificationKind, ReportRecord, ReportStatus, ReportSummary, UserSummary,
};
use crate::services::{ContactLog, NotificationSink, ReportStore, UserDirectory};

/// Domain event dispatched after a report is durably persisted and
/// indexed. The handler runs against the committed snapshot, so
/// fan-out and correlation never observe an uncommitted report.
#[derive(Debug, Clone)]
pub struct ReportCreated {
    pub report: ReportRecord,
}

/// Consumes [`ReportCreated`] events: nearby-user fan-out for MISSING
/// reports, then correlation against the opposing report population.
/// The two steps read disjoint populations; their order is irrelevant.
pub struct CreationHandler {
    users: Arc<dyn ProximityIndex<UserSummary>>,
    reports: Arc<dyn ReportStore>,
    sink: Arc<dyn NotificationSink>,
    correlator: MatchCorrelator,
    fanout_radius_km: f64,
}

impl CreationHandler {
    pub fn new(
        users: Arc<dyn ProximityIndex<UserSummary>>,
        reports: Arc<dyn ReportStore>,
        sink: Arc<dyn NotificationSink>,
        correlator: MatchCorrelator,
        fanout_radius_km: f64,
    ) -> Self {
        Self {
            users,
            reports,
            sink,
            correlator,
            fanout_radius_km,
        }
    }

    pub async fn handle(&self, event: ReportCreated) {
        let report = &event.report;
        if report.status == ReportStatus::Missing {
            self.fan_out(report).await;
        }
        self.correlate(report).await;
    }

    /// Alert every located user within the fan-out radius of a new
    /// MISSING report, excluding the reporter. Found-pet reports skip
    /// this: they only correlate against existing MISSING reports.
    async fn fan_out(&self, report: &ReportRecord) {
        let hits = self
            .users
            .query(report.point, self.fanout_radius_km, Some(report.reporter_id));

        tracing::debug!(
            "Fanning out report {} to {} nearby users",
            report.id,
            hits.len()
        );

        for hit in hits {
            let message = format!(
                "MISSING PET NEARBY: {} ({}) was last seen near {}",
                report.pet_name, report.species, report.last_seen_location
            );
            self.emit(NotificationEvent {
                recipient_id: hit.entity.id,
                kind: NotificationKind::Urgent,
                message,
                related_entity_id: report.id,
                actor_id: report.reporter_id,
            })
            .await;
        }
    }

    /// Correlate against the opposite-status population and notify both
    /// owners of every matched pair, each event carrying the opposite
    /// report's id and the other party as actor.
    async fn correlate(&self, report: &ReportRecord) {
        let Some(opposite) = report.status.opposite() else {
            return;
        };

        let candidates = match self.reports.find_by_status(opposite).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    "Skipping correlation for report {}: candidate fetch failed: {}",
                    report.id,
                    e
                );
                return;
            }
        };

        let pairs = self.correlator.correlate(report, &candidates);
        tracing::info!(
            "Report {} correlated against {} candidates: {} match(es)",
            report.id,
            candidates.len(),
            pairs.len()
        );

        let phrasing = if report.status == ReportStatus::Missing {
            "lost"
        } else {
            "found"
        };

        for pair in &pairs {
            let Some(candidate) = candidates.iter().find(|c| c.id == pair.candidate_report_id)
            else {
                continue;
            };

            self.emit(NotificationEvent {
                recipient_id: report.reporter_id,
                kind: NotificationKind::MatchFound,
                message: format!(
                    "A potential match for your {} pet was reported nearby!",
                    phrasing
                ),
                related_entity_id: candidate.id,
                actor_id: candidate.reporter_id,
            })
            .await;

            self.emit(NotificationEvent {
                recipient_id: candidate.reporter_id,
                kind: NotificationKind::MatchFound,
                message: "A potential match for the pet you reported was just posted!".to_string(),
                related_entity_id: report.id,
                actor_id: report.reporter_id,
            })
            .await;
        }
    }

    /// Notification delivery is best-effort: failures are logged and
    /// swallowed, never rolling back the triggering creation.
    async fn emit(&self, event: NotificationEvent) {
        if let Err(e) = self.sink.emit(event).await {
            tracing::warn!("Notification emission failed: {}", e);
        }
    }
}

/// Orchestrates report creation, deletion, status transitions and the
/// contact log, keeping the report index in step with the store.
pub struct ReportLifecycle {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn ReportStore>,
    contacts: Arc<dyn ContactLog>,
    sink: Arc<dyn NotificationSink>,
    report_index: Arc<dyn ProximityIndex<ReportSummary>>,
    handler: CreationHandler,
}

impl ReportLifecycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn ReportStore>,
        contacts: Arc<dyn ContactLog>,
        sink: Arc<dyn NotificationSink>,
        user_index: Arc<dyn ProximityIndex<UserSummary>>,
        report_index: Arc<dyn ProximityIndex<ReportSummary>>,
        correlation_radius_km: f64,
        fanout_radius_km: f64,
    ) -> Self {
        let handler = CreationHandler::new(
            user_index,
            store.clone(),
            sink.clone(),
            MatchCorrelator::new(correlation_radius_km),
            fanout_radius_km,
        );

        Self {
            directory,
            store,
            contacts,
            sink,
            report_index,
            handler,
        }
    }

    /// Persist a new report, index it, then dispatch the creation event
    /// for fan-out and correlation.
    pub async fn create_report(
        &self,
        reporter_id: i64,
        request: CreateReportRequest,
    ) -> Result<ReportRecord, EngineError> {
        let reporter = self
            .directory
            .get_by_id(reporter_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {} not found", reporter_id)))?;

        let point = GeoPoint::new(request.latitude, request.longitude)?;

        let report = self
            .store
            .save(NewReport {
                reporter_id: reporter.id,
                pet_name: request.pet_name,
                species: request.species,
                breed: request.breed,
                description: request.description,
                last_seen_location: request.last_seen_location,
                point,
                image_url: request.image_url,
                status: request.status,
            })
            .await?;

        if report.status != ReportStatus::Reunited {
            self.report_index.upsert(report.summary());
        }

        tracing::info!(
            "Created report {} ({:?}) by user {}",
            report.id,
            report.status,
            report.reporter_id
        );

        self.handler
            .handle(ReportCreated {
                report: report.clone(),
            })
            .await;

        Ok(report)
    }

    pub async fn reports_by_user(&self, user_id: i64) -> Result<Vec<ReportRecord>, EngineError> {
        Ok(self.store.find_by_reporter(user_id).await?)
    }

    /// Delete a report and its contact log. Owner only.
    pub async fn delete_report(&self, report_id: i64, user_id: i64) -> Result<(), EngineError> {
        let report = self.get(report_id).await?;
        if report.reporter_id != user_id {
            return Err(EngineError::Unauthorized(
                "only the reporter can delete this report".to_string(),
            ));
        }

        self.contacts.delete_for_report(report_id).await?;
        self.store.delete(report_id).await?;
        self.report_index.remove(report_id);

        tracing::info!("Deleted report {} by user {}", report_id, user_id);
        Ok(())
    }

    /// Transition a report to its terminal REUNITED state, removing it
    /// from all subsequent nearby and correlation queries. Owner only.
    pub async fn mark_reunited(
        &self,
        report_id: i64,
        user_id: i64,
    ) -> Result<ReportRecord, EngineError> {
        let report = self.get(report_id).await?;
        if report.reporter_id != user_id {
            return Err(EngineError::Unauthorized(
                "only the reporter can update this report".to_string(),
            ));
        }

        let updated = self
            .store
            .update_status(report_id, ReportStatus::Reunited)
            .await?;
        self.report_index.remove(report_id);

        tracing::info!("Report {} marked reunited", report_id);
        Ok(updated)
    }

    /// Record a contact message for a report's owner and alert them.
    pub async fn contact_reporter(
        &self,
        report_id: i64,
        user_id: i64,
        message: String,
    ) -> Result<(), EngineError> {
        let contact_user = self
            .directory
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {} not found", user_id)))?;
        let report = self.get(report_id).await?;

        if report.reporter_id == user_id {
            return Err(EngineError::Unauthorized(
                "you cannot contact yourself".to_string(),
            ));
        }

        self.contacts
            .record(NewContact {
                report_id,
                contact_user_id: contact_user.id,
                message,
                contact_phone: contact_user.phone.clone(),
                contact_email: contact_user.email.clone(),
            })
            .await?;

        let event = NotificationEvent {
            recipient_id: report.reporter_id,
            kind: NotificationKind::Urgent,
            message: format!(
                "{} contacted you about your missing pet report!",
                contact_user.full_name
            ),
            related_entity_id: report.id,
            actor_id: contact_user.id,
        };
        if let Err(e) = self.sink.emit(event).await {
            tracing::warn!("Notification emission failed: {}", e);
        }

        Ok(())
    }

    /// List contacts for a report. Only the owning reporter may read
    /// them; any other caller is rejected.
    pub async fn contacts_for_report(
        &self,
        report_id: i64,
        user_id: i64,
    ) -> Result<Vec<ContactResponse>, EngineError> {
        let report = self.get(report_id).await?;
        if report.reporter_id != user_id {
            return Err(EngineError::Unauthorized(
                "only the reporter can view contacts".to_string(),
            ));
        }

        let records = self.contacts.list_for_report(report_id).await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let user = self.directory.get_by_id(record.contact_user_id).await?;
            let (name, image) = match user {
                Some(u) => (Some(u.full_name), u.image_url),
                None => (None, None),
            };
            out.push(ContactResponse::from_record(&record, name, image));
        }
        Ok(out)
    }

    async fn get(&self, report_id: i64) -> Result<ReportRecord, EngineError> {
        self.store
            .get_by_id(report_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("report {} not found", report_id)))
    }
}
