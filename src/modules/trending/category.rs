use serde::Serialize;

/// The trending feeds, one router each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingCategory {
    Books,
    Writers,
    Publications,
    Subjects,
}

impl TrendingCategory {
    /// Mount table; segments are disjoint.
    pub const ALL: [TrendingCategory; 4] = [
        TrendingCategory::Books,
        TrendingCategory::Writers,
        TrendingCategory::Publications,
        TrendingCategory::Subjects,
    ];

    pub const fn segment(self) -> &'static str {
        match self {
            TrendingCategory::Books => "books",
            TrendingCategory::Writers => "writers",
            TrendingCategory::Publications => "publications",
            TrendingCategory::Subjects => "subjects",
        }
    }
}
