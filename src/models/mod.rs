// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ContactRecord, GeoPoint, Located, MatchCandidatePair, NewContact, NewReport,
    NotificationEvent, NotificationKind, ReportRecord, ReportStatus, ReportSummary, UserRecord,
    UserSummary,
};
pub use requests::{
    CallerQuery, ContactReporterRequest, CreateReportRequest, NearbyReportsQuery,
    NearbyUsersQuery,
};
pub use responses::{
    ContactResponse, ErrorResponse, HealthResponse, MessageResponse, NearbyUserResponse,
    ReportResponse,
};
