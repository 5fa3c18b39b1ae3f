#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderName, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use shelfwise_app::AppContext;
use shelfwise_authz::{HeaderResolver, SharedResolver};
use shelfwise_db::{Catalog, MemoryStore};
use shelfwise_kernel::{settings::Settings, ModuleRegistry};

pub const REQUESTER_HEADER: &str = "x-requester-id";

pub const CATALOG: &str = r#"{
    "writers": [
        { "id": "W1", "name": "Ursula K. Le Guin" },
        { "id": "W2", "name": "Italo Calvino" }
    ],
    "publications": [
        { "id": "P1", "name": "Ace Books" },
        { "id": "P2", "name": "Einaudi" }
    ],
    "subjects": [
        { "id": "S1", "name": "Science Fiction" },
        { "id": "S2", "name": "Fantasy" }
    ],
    "books": [
        { "id": "B42", "title": "The Dispossessed", "writerId": "W1", "publicationId": "P1", "subjectIds": ["S1"] },
        { "id": "B7", "title": "A Wizard of Earthsea", "writerId": "W1", "publicationId": "P1", "subjectIds": ["S2"] },
        { "id": "B9", "title": "Invisible Cities", "writerId": "W2", "publicationId": "P2", "subjectIds": ["S2"] }
    ]
}"#;

pub fn resolver() -> SharedResolver {
    Arc::new(HeaderResolver::new(HeaderName::from_static(REQUESTER_HEADER)))
}

pub fn context() -> AppContext {
    let catalog = Catalog::from_json(CATALOG).expect("test catalog is valid");
    AppContext::new(Settings::default(), MemoryStore::new(catalog), resolver())
}

/// Full application router, as served in production.
pub fn app(ctx: &AppContext) -> Router {
    let registry = shelfwise_app::build_registry(ctx).expect("modules register");
    shelfwise_http::build_router(&registry, &ctx.settings)
}

pub fn router_for(registry: &ModuleRegistry) -> Router {
    shelfwise_http::build_router(registry, &Settings::default())
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    requester: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(requester) = requester {
        request = request.header(REQUESTER_HEADER, requester);
    }

    let response = router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
