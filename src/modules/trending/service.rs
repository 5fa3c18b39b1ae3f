use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use shelfwise_db::{models::Book, Catalog, MemoryStore, StoreError};
use shelfwise_http::Envelope;

use super::category::TrendingCategory;
use super::models::TrendingEntry;

#[async_trait]
pub trait TrendingService: Send + Sync {
    /// At most `limit` entries, most visited first.
    async fn trending(
        &self,
        category: TrendingCategory,
        limit: usize,
    ) -> Result<Envelope<Vec<TrendingEntry>>, StoreError>;
}

pub type SharedTrendingService = Arc<dyn TrendingService>;

/// Ranks catalog entities by recent visits of their books.
pub struct VisitTrending {
    store: Arc<MemoryStore>,
    window: Duration,
}

impl VisitTrending {
    pub fn new(store: Arc<MemoryStore>, window: Duration) -> Self {
        Self { store, window }
    }
}

#[async_trait]
impl TrendingService for VisitTrending {
    async fn trending(
        &self,
        category: TrendingCategory,
        limit: usize,
    ) -> Result<Envelope<Vec<TrendingEntry>>, StoreError> {
        let now = OffsetDateTime::now_utc();
        let cutoff = now.checked_sub(self.window).unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let visits = self.store.visits_since(cutoff).await;
        let catalog = self.store.catalog();

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for visit in &visits {
            // Records only ever reference catalog books.
            let Ok(book) = catalog.book(&visit.book_id) else {
                continue;
            };
            for key in keys(category, book) {
                *counts.entry(key).or_default() += 1;
            }
        }

        let entries = rank(catalog, category, counts, limit);
        Ok(Envelope::ok(
            format!("Trending {}", category.segment()),
            entries,
        ))
    }
}

fn keys(category: TrendingCategory, book: &Book) -> Vec<&str> {
    match category {
        TrendingCategory::Books => vec![book.id.as_str()],
        TrendingCategory::Writers => vec![book.writer_id.as_str()],
        TrendingCategory::Publications => vec![book.publication_id.as_str()],
        TrendingCategory::Subjects => book.subject_ids.iter().map(String::as_str).collect(),
    }
}

fn display_name(catalog: &Catalog, category: TrendingCategory, id: &str) -> Option<String> {
    match category {
        TrendingCategory::Books => catalog.book(id).ok().map(|b| b.title.clone()),
        TrendingCategory::Writers => catalog.writer(id).map(|w| w.name.clone()),
        TrendingCategory::Publications => catalog.publication(id).map(|p| p.name.clone()),
        TrendingCategory::Subjects => catalog.subject(id).map(|s| s.name.clone()),
    }
}

/// Sort by visits descending, then id ascending, and number from 1.
fn rank(
    catalog: &Catalog,
    category: TrendingCategory,
    counts: HashMap<&str, u64>,
    limit: usize,
) -> Vec<TrendingEntry> {
    let mut counted: Vec<(&str, u64)> = counts.into_iter().collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    counted
        .into_iter()
        .filter_map(|(id, visits)| {
            display_name(catalog, category, id).map(|name| (id.to_string(), name, visits))
        })
        .take(limit)
        .enumerate()
        .map(|(index, (id, name, visits))| TrendingEntry {
            rank: index + 1,
            id,
            name,
            visits,
        })
        .collect()
}
