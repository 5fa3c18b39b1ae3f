pub mod recently_visited;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use shelfwise_authz::SharedResolver;
use shelfwise_kernel::{InitCtx, Module};

use crate::AppContext;
use recently_visited::{RecentlyVisitedState, SharedRecentlyVisitedService, StoreRecentlyVisited};

/// Per-user features, all scoped to the authenticated requester
pub struct UsersModule {
    recently_visited: RecentlyVisitedState,
}

impl UsersModule {
    pub fn new(service: SharedRecentlyVisitedService, resolver: SharedResolver) -> Self {
        Self {
            recently_visited: RecentlyVisitedState { service, resolver },
        }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            auth_mode = ?ctx.settings.auth.mode,
            list_limit = ctx.settings.recently_visited.list_limit,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new().nest(
            "/books/recently-visited",
            recently_visited::routes(self.recently_visited.clone()),
        )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/books/recently-visited": {
                    "get": {
                        "summary": "List recently visited books of the requester",
                        "tags": ["Users"],
                        "responses": {
                            "200": {
                                "description": "Visits, newest first",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/VisitedBookList" }
                                    }
                                }
                            },
                            "401": error("Requester could not be resolved")
                        }
                    }
                },
                "/books/recently-visited/{bookId}": {
                    "post": {
                        "summary": "Record a visit of a book",
                        "tags": ["Users"],
                        "parameters": [{
                            "name": "bookId",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string", "pattern": "^[A-Za-z0-9_-]{1,64}$" }
                        }],
                        "responses": {
                            "201": {
                                "description": "Visit recorded",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/VisitedBookCreated" }
                                    }
                                }
                            },
                            "401": error("Requester could not be resolved"),
                            "404": error("Book not found"),
                            "422": error("Malformed book id")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "VisitedBook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "requesterId": { "type": "string" },
                            "bookId": { "type": "string" },
                            "visitedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "requesterId", "bookId", "visitedAt"]
                    },
                    "VisitedBookCreated": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "integer" },
                            "message": { "type": "string" },
                            "data": { "$ref": "#/components/schemas/VisitedBook" },
                            "route": { "type": "string" }
                        },
                        "required": ["status", "message", "data", "route"]
                    },
                    "VisitedBookList": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "integer" },
                            "message": { "type": "string" },
                            "data": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/VisitedBook" }
                            },
                            "route": { "type": "string" }
                        },
                        "required": ["status", "message", "data", "route"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

/// Create the users module backed by the shared store
pub fn create_module(ctx: &AppContext) -> Arc<dyn Module> {
    let service = Arc::new(StoreRecentlyVisited::new(
        ctx.store.clone(),
        ctx.settings.recently_visited.list_limit,
    ));
    Arc::new(UsersModule::new(service, ctx.resolver.clone()))
}
