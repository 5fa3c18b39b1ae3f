//! Recently visited books of the requester.

pub mod controller;
pub mod service;

pub use service::{RecentlyVisitedService, SharedRecentlyVisitedService, StoreRecentlyVisited};

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};

use shelfwise_authz::SharedResolver;

#[derive(Clone)]
pub struct RecentlyVisitedState {
    pub service: SharedRecentlyVisitedService,
    pub resolver: SharedResolver,
}

impl FromRef<RecentlyVisitedState> for SharedResolver {
    fn from_ref(state: &RecentlyVisitedState) -> Self {
        state.resolver.clone()
    }
}

pub fn routes(state: RecentlyVisitedState) -> Router {
    Router::new()
        .route("/", get(controller::get))
        .route("/{book_id}", post(controller::add))
        .with_state(state)
}
