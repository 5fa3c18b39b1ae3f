//! Read-only book catalog, seeded once at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, StoreError};
use crate::models::{Book, Publication, Subject, Writer};

/// On-disk shape of the catalog seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub books: Vec<Book>,
    pub writers: Vec<Writer>,
    pub publications: Vec<Publication>,
    pub subjects: Vec<Subject>,
}

/// Catalog indexed by id. Every book reference is guaranteed to resolve.
#[derive(Debug, Default)]
pub struct Catalog {
    books: BTreeMap<String, Book>,
    writers: BTreeMap<String, Writer>,
    publications: BTreeMap<String, Publication>,
    subjects: BTreeMap<String, Subject>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SeedIo {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;

        tracing::info!(
            target: "shelfwise-db",
            path = %path.display(),
            books = catalog.books.len(),
            writers = catalog.writers.len(),
            publications = catalog.publications.len(),
            subjects = catalog.subjects.len(),
            "catalog seeded"
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let seed: CatalogSeed = serde_json::from_str(raw)?;
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self> {
        let catalog = Self {
            writers: index("writer", seed.writers, |w| &w.id)?,
            publications: index("publication", seed.publications, |p| &p.id)?,
            subjects: index("subject", seed.subjects, |s| &s.id)?,
            books: index("book", seed.books, |b| &b.id)?,
        };

        for book in catalog.books.values() {
            if !catalog.writers.contains_key(&book.writer_id) {
                return Err(invalid_reference("writer", &book.writer_id));
            }
            if !catalog.publications.contains_key(&book.publication_id) {
                return Err(invalid_reference("publication", &book.publication_id));
            }
            if let Some(missing) = book
                .subject_ids
                .iter()
                .find(|id| !catalog.subjects.contains_key(*id))
            {
                return Err(invalid_reference("subject", missing));
            }
        }

        Ok(catalog)
    }

    pub fn book(&self, id: &str) -> Result<&Book> {
        self.books.get(id).ok_or_else(|| StoreError::NotFound {
            entity: "book",
            id: id.to_string(),
        })
    }

    pub fn writer(&self, id: &str) -> Option<&Writer> {
        self.writers.get(id)
    }

    pub fn publication(&self, id: &str) -> Option<&Publication> {
        self.publications.get(id)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.get(id)
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }
}

fn index<T>(
    entity: &'static str,
    items: Vec<T>,
    key: impl Fn(&T) -> &String,
) -> Result<BTreeMap<String, T>> {
    let mut map = BTreeMap::new();
    for item in items {
        let id = key(&item).clone();
        if map.contains_key(&id) {
            return Err(StoreError::Duplicate { entity, id });
        }
        map.insert(id, item);
    }
    Ok(map)
}

fn invalid_reference(target: &'static str, id: &str) -> StoreError {
    StoreError::InvalidReference {
        entity: "book",
        target,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seed() -> serde_json::Value {
        json!({
            "writers": [{ "id": "W1", "name": "Ursula K. Le Guin" }],
            "publications": [{ "id": "P1", "name": "Ace Books" }],
            "subjects": [{ "id": "S1", "name": "Science Fiction" }],
            "books": [{
                "id": "B1",
                "title": "The Left Hand of Darkness",
                "writerId": "W1",
                "publicationId": "P1",
                "subjectIds": ["S1"]
            }]
        })
    }

    #[test]
    fn loads_valid_seed() {
        let catalog = Catalog::from_json(&seed().to_string()).unwrap();
        assert_eq!(catalog.book_count(), 1);
        assert_eq!(catalog.book("B1").unwrap().writer_id, "W1");
        assert_eq!(catalog.subject("S1").unwrap().name, "Science Fiction");
    }

    #[test]
    fn unknown_book_is_not_found() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.book("B404"),
            Err(StoreError::NotFound { entity: "book", .. })
        ));
    }

    #[test]
    fn dangling_writer_is_rejected() {
        let mut seed = seed();
        seed["books"][0]["writerId"] = json!("W9");
        let err = Catalog::from_json(&seed.to_string()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidReference { target: "writer", .. }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut seed = seed();
        seed["subjects"] = json!([
            { "id": "S1", "name": "Science Fiction" },
            { "id": "S1", "name": "Sci-Fi" }
        ]);
        let err = Catalog::from_json(&seed.to_string()).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { entity: "subject", .. }));
    }

    #[test]
    fn missing_seed_file_reports_path() {
        let err = Catalog::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
