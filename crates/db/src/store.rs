use std::collections::{HashMap, VecDeque};

use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use crate::catalog::Catalog;
use crate::error::{Result, StoreError};
use crate::models::VisitedBook;

/// How much visit history the store keeps.
#[derive(Debug, Clone, Copy)]
pub struct Retention {
    /// Newest visits kept per requester.
    pub per_requester: usize,
    /// Visits older than this are dropped from the shared log.
    pub window: Duration,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            per_requester: 20,
            window: Duration::hours(24 * 7),
        }
    }
}

#[derive(Default)]
struct VisitLog {
    by_requester: HashMap<String, VecDeque<VisitedBook>>,
    // Ordered by `visited_at`; timestamps never go backwards.
    recent: VecDeque<VisitedBook>,
}

/// In-memory store: a fixed catalog plus a bounded visit history.
pub struct MemoryStore {
    catalog: Catalog,
    retention: Retention,
    visits: RwLock<VisitLog>,
}

impl MemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_retention(catalog, Retention::default())
    }

    pub fn with_retention(catalog: Catalog, retention: Retention) -> Self {
        Self {
            catalog,
            retention,
            visits: RwLock::new(VisitLog::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Append a visit. The book must exist in the catalog.
    pub async fn record_visit(&self, requester_id: &str, book_id: &str) -> Result<VisitedBook> {
        self.record_visit_at(requester_id, book_id, OffsetDateTime::now_utc())
            .await
    }

    async fn record_visit_at(
        &self,
        requester_id: &str,
        book_id: &str,
        now: OffsetDateTime,
    ) -> Result<VisitedBook> {
        if self.catalog.book(book_id).is_err() {
            return Err(StoreError::InvalidReference {
                entity: "visited book",
                target: "book",
                id: book_id.to_string(),
            });
        }

        let mut log = self.visits.write().await;
        // A wall clock stepping backwards must not reorder the log.
        let visited_at = match log.recent.back() {
            Some(last) if last.visited_at > now => last.visited_at,
            _ => now,
        };
        let visit = VisitedBook {
            id: Uuid::new_v7(Timestamp::now(uuid::NoContext)),
            requester_id: requester_id.to_string(),
            book_id: book_id.to_string(),
            visited_at,
        };

        let history = log.by_requester.entry(visit.requester_id.clone()).or_default();
        history.push_back(visit.clone());
        while history.len() > self.retention.per_requester {
            history.pop_front();
        }

        log.recent.push_back(visit.clone());
        if let Some(cutoff) = visited_at.checked_sub(self.retention.window) {
            while log.recent.front().is_some_and(|v| v.visited_at < cutoff) {
                log.recent.pop_front();
            }
        }

        Ok(visit)
    }

    /// Visits of one requester, newest first.
    pub async fn visits_by_requester(&self, requester_id: &str, limit: usize) -> Vec<VisitedBook> {
        let log = self.visits.read().await;
        log.by_requester
            .get(requester_id)
            .map(|history| history.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Retained visits at or after `cutoff`, oldest first.
    pub async fn visits_since(&self, cutoff: OffsetDateTime) -> Vec<VisitedBook> {
        let log = self.visits.read().await;
        log.recent
            .iter()
            .filter(|visit| visit.visited_at >= cutoff)
            .cloned()
            .collect()
    }

    /// Visits still inside the retention window.
    pub async fn visit_count(&self) -> usize {
        self.visits.read().await.recent.len()
    }
}
