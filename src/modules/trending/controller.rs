use axum::extract::{rejection::QueryRejection, OriginalUri, Query, State};

use shelfwise_http::{AppError, Envelope};
use shelfwise_kernel::settings::TrendingSettings;

use super::models::{TrendingEntry, TrendingQuery};
use super::CategoryState;

/// `GET /trending/{category}?limit=N`
pub async fn list(
    State(state): State<CategoryState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<TrendingQuery>, QueryRejection>,
) -> Result<Envelope<Vec<TrendingEntry>>, AppError> {
    let Query(query) =
        query.map_err(|rejection| AppError::invalid_field("limit", rejection.body_text()))?;
    let limit = resolve_limit(query.limit, state.default_limit)?;

    let feed = state.service.trending(state.category, limit).await?;

    tracing::debug!(
        category = ?state.category,
        limit,
        entries = feed.data.len(),
        "trending feed served"
    );

    Ok(feed.with_route(&uri))
}

fn resolve_limit(requested: Option<usize>, default_limit: usize) -> Result<usize, AppError> {
    match requested {
        None => Ok(default_limit),
        Some(limit) if (1..=TrendingSettings::MAX_LIMIT).contains(&limit) => Ok(limit),
        Some(_) => Err(AppError::invalid_field(
            "limit",
            format!("must be between 1 and {}", TrendingSettings::MAX_LIMIT),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(resolve_limit(None, 10).unwrap(), 10);
        assert_eq!(resolve_limit(Some(1), 10).unwrap(), 1);
        assert_eq!(resolve_limit(Some(100), 10).unwrap(), 100);
        assert!(resolve_limit(Some(0), 10).is_err());
        assert!(resolve_limit(Some(101), 10).is_err());
    }
}
