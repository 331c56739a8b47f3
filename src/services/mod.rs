// Service exports
pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::{
    FailingNotificationSink, InMemoryContactLog, InMemoryReportStore, InMemoryUserDirectory,
    RecordingNotificationSink,
};
pub use postgres::PostgresClient;
pub use store::{ContactLog, NotificationSink, ReportStore, StoreError, UserDirectory};
