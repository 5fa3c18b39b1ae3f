use axum::extract::{rejection::PathRejection, OriginalUri, Path, State};

use shelfwise_db::models::VisitedBook;
use shelfwise_http::{AppError, Envelope, Requester};

use super::RecentlyVisitedState;

const MAX_BOOK_ID_LEN: usize = 64;

/// `POST /users/books/recently-visited/{bookId}`
pub async fn add(
    State(state): State<RecentlyVisitedState>,
    Requester(requester): Requester,
    OriginalUri(uri): OriginalUri,
    book_id: Result<Path<String>, PathRejection>,
) -> Result<Envelope<VisitedBook>, AppError> {
    let Path(book_id) =
        book_id.map_err(|rejection| AppError::invalid_field("bookId", rejection.body_text()))?;
    validate_book_id(&book_id)?;

    let created = state.service.add(&requester, &book_id).await?;

    tracing::info!(
        requester = %requester,
        route = %uri,
        visit_id = %created.data.id,
        "Entity created by {} at {}",
        requester,
        uri
    );

    Ok(created.with_route(&uri))
}

/// `GET /users/books/recently-visited`
pub async fn get(
    State(state): State<RecentlyVisitedState>,
    Requester(requester): Requester,
    OriginalUri(uri): OriginalUri,
) -> Result<Envelope<Vec<VisitedBook>>, AppError> {
    let visits = state.service.get_by_requester(&requester).await?;
    Ok(visits.with_route(&uri))
}

fn validate_book_id(book_id: &str) -> Result<(), AppError> {
    if book_id.is_empty() {
        return Err(AppError::invalid_field("bookId", "must not be empty"));
    }
    if book_id.len() > MAX_BOOK_ID_LEN {
        return Err(AppError::invalid_field(
            "bookId",
            format!("must be at most {MAX_BOOK_ID_LEN} characters"),
        ));
    }
    if !book_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::invalid_field(
            "bookId",
            "may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}
