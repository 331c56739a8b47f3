use std::sync::Arc;
use std::time::Duration;

use crate::core::index::ScanIndex;
use crate::models::UserSummary;
use crate::services::{StoreError, UserDirectory};

/// Keeps the user index in step with the user directory.
///
/// Account management lives outside this engine, so location changes
/// and deletions arrive only through the directory. The refresher
/// re-reads the full population and swaps it into the index in one
/// write, so a moved user stops matching at their old coordinates and
/// a deleted user drops out entirely.
pub struct UserIndexRefresher {
    directory: Arc<dyn UserDirectory>,
    index: Arc<ScanIndex<UserSummary>>,
    period: Duration,
}

impl UserIndexRefresher {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        index: Arc<ScanIndex<UserSummary>>,
        period: Duration,
    ) -> Self {
        Self {
            directory,
            index,
            period,
        }
    }

    /// One full reseed from the directory. Returns the population size.
    pub async fn refresh_once(&self) -> Result<usize, StoreError> {
        let users = self.directory.list_all().await?;
        self.index
            .replace_all(users.iter().map(|u| u.summary()).collect());
        Ok(users.len())
    }

    /// Reseed on a fixed period until the task is dropped. A failed
    /// refresh keeps the previous population and retries next tick.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.tick().await; // first tick completes immediately
        loop {
            ticker.tick().await;
            match self.refresh_once().await {
                Ok(count) => tracing::debug!("User index refreshed ({} users)", count),
                Err(e) => tracing::warn!("User index refresh failed: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, UserRecord};
    use crate::services::InMemoryUserDirectory;

    fn user(id: i64, lat: f64) -> UserRecord {
        UserRecord {
            id,
            full_name: format!("User {}", id),
            image_url: None,
            role: "USER".to_string(),
            point: Some(GeoPoint { lat, lon: -74.0 }),
            phone: None,
            email: format!("user{}@example.com", id),
        }
    }

    #[tokio::test]
    async fn test_refresh_picks_up_moves_and_deletions() {
        let directory = Arc::new(InMemoryUserDirectory::new());
        directory.insert(user(1, 40.01)).await;
        directory.insert(user(2, 40.02)).await;

        let index = Arc::new(ScanIndex::new());
        let refresher = UserIndexRefresher::new(
            directory.clone(),
            index.clone(),
            Duration::from_secs(30),
        );

        assert_eq!(refresher.refresh_once().await.unwrap(), 2);
        assert_eq!(index.len(), 2);

        // 1 moves out of range, 2 is deleted
        directory.insert(user(1, 45.0)).await;
        directory.remove(2).await;
        assert_eq!(refresher.refresh_once().await.unwrap(), 1);

        use crate::core::index::ProximityIndex;
        let hits = index.query(GeoPoint { lat: 40.0, lon: -74.0 }, 10.0, None);
        assert!(hits.is_empty());
        assert_eq!(index.len(), 1);
    }
}
