use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use shelfwise_authz::{RequesterId, SharedResolver};

use crate::error::AppError;

/// The authenticated caller, resolved once per request.
///
/// Rejects with `401` before the handler body runs, so services are never
/// reached by unauthenticated requests.
#[derive(Debug, Clone)]
pub struct Requester(pub RequesterId);

impl<S> FromRequestParts<S> for Requester
where
    SharedResolver: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let resolver = SharedResolver::from_ref(state);
        let requester = resolver.resolve(parts)?;
        Ok(Self(requester))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, Request};
    use shelfwise_authz::HeaderResolver;
    use std::sync::Arc;

    fn resolver() -> SharedResolver {
        Arc::new(HeaderResolver::new(HeaderName::from_static("x-requester-id")))
    }

    #[tokio::test]
    async fn resolves_from_state() {
        let (mut parts, _) = Request::builder()
            .header("x-requester-id", "U1")
            .body(())
            .unwrap()
            .into_parts();

        let Requester(requester) = Requester::from_request_parts(&mut parts, &resolver())
            .await
            .unwrap();
        assert_eq!(requester.as_str(), "U1");
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let err = Requester::from_request_parts(&mut parts, &resolver())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
