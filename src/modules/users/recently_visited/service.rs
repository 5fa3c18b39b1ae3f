use std::sync::Arc;

use async_trait::async_trait;

use shelfwise_authz::RequesterId;
use shelfwise_db::{models::VisitedBook, MemoryStore, StoreError};
use shelfwise_http::Envelope;

/// Persistence-facing half of the recently-visited slice.
///
/// Each `add` records a new visit; repeated visits of the same book are kept
/// as separate records.
#[async_trait]
pub trait RecentlyVisitedService: Send + Sync {
    async fn add(
        &self,
        requester: &RequesterId,
        book_id: &str,
    ) -> Result<Envelope<VisitedBook>, StoreError>;

    /// Newest first. An empty history is an empty list.
    async fn get_by_requester(
        &self,
        requester: &RequesterId,
    ) -> Result<Envelope<Vec<VisitedBook>>, StoreError>;
}

pub type SharedRecentlyVisitedService = Arc<dyn RecentlyVisitedService>;

pub struct StoreRecentlyVisited {
    store: Arc<MemoryStore>,
    list_limit: usize,
}

impl StoreRecentlyVisited {
    pub fn new(store: Arc<MemoryStore>, list_limit: usize) -> Self {
        Self { store, list_limit }
    }
}

#[async_trait]
impl RecentlyVisitedService for StoreRecentlyVisited {
    async fn add(
        &self,
        requester: &RequesterId,
        book_id: &str,
    ) -> Result<Envelope<VisitedBook>, StoreError> {
        let visit = self.store.record_visit(requester.as_str(), book_id).await?;
        Ok(Envelope::created("Book added to recently visited", visit))
    }

    async fn get_by_requester(
        &self,
        requester: &RequesterId,
    ) -> Result<Envelope<Vec<VisitedBook>>, StoreError> {
        let visits = self
            .store
            .visits_by_requester(requester.as_str(), self.list_limit)
            .await;
        Ok(Envelope::ok("Recently visited books", visits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shelfwise_db::Catalog;

    fn service(list_limit: usize) -> StoreRecentlyVisited {
        let catalog = Catalog::from_json(
            r#"{
                "writers": [{ "id": "W1", "name": "Writer" }],
                "publications": [{ "id": "P1", "name": "Press" }],
                "books": [
                    { "id": "B1", "title": "One", "writerId": "W1", "publicationId": "P1" },
                    { "id": "B2", "title": "Two", "writerId": "W1", "publicationId": "P1" }
                ]
            }"#,
        )
        .unwrap();
        StoreRecentlyVisited::new(Arc::new(MemoryStore::new(catalog)), list_limit)
    }

    fn requester(id: &str) -> RequesterId {
        RequesterId::parse(id).unwrap()
    }

    #[tokio::test]
    async fn add_returns_created_record() {
        let service = service(10);
        let result = service.add(&requester("U1"), "B1").await.unwrap();

        assert_eq!(result.status, StatusCode::CREATED);
        assert_eq!(result.data.book_id, "B1");
        assert_eq!(result.data.requester_id, "U1");
    }

    #[tokio::test]
    async fn empty_history_is_empty_list() {
        let service = service(10);
        let result = service.get_by_requester(&requester("U1")).await.unwrap();

        assert_eq!(result.status, StatusCode::OK);
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn history_is_capped_and_newest_first() {
        let service = service(2);
        service.add(&requester("U1"), "B1").await.unwrap();
        service.add(&requester("U1"), "B2").await.unwrap();
        service.add(&requester("U1"), "B1").await.unwrap();

        let result = service.get_by_requester(&requester("U1")).await.unwrap();
        let books: Vec<_> = result.data.iter().map(|v| v.book_id.as_str()).collect();
        assert_eq!(books, vec!["B1", "B2"]);
    }

    #[tokio::test]
    async fn unknown_book_is_rejected() {
        let service = service(10);
        let err = service.add(&requester("U1"), "B404").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference { .. }));
    }
}
