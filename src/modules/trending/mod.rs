//! Trending books, writers, publications and subjects.

pub mod category;
pub mod controller;
pub mod models;
pub mod service;

pub use category::TrendingCategory;
pub use service::{SharedTrendingService, TrendingService, VisitTrending};

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;

use shelfwise_kernel::{InitCtx, Module};

use crate::AppContext;

/// State of one category router.
#[derive(Clone)]
pub struct CategoryState {
    pub category: TrendingCategory,
    pub service: SharedTrendingService,
    pub default_limit: usize,
}

/// Public trending feeds; no requester required
pub struct TrendingModule {
    service: SharedTrendingService,
    default_limit: usize,
}

impl TrendingModule {
    pub fn new(service: SharedTrendingService, default_limit: usize) -> Self {
        Self {
            service,
            default_limit,
        }
    }

    fn category_routes(&self, category: TrendingCategory) -> Router {
        Router::new()
            .route("/", get(controller::list))
            .with_state(CategoryState {
                category,
                service: self.service.clone(),
                default_limit: self.default_limit,
            })
    }
}

#[async_trait]
impl Module for TrendingModule {
    fn name(&self) -> &'static str {
        "trending"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            window_hours = ctx.settings.trending.window_hours,
            "trending module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        TrendingCategory::ALL
            .into_iter()
            .fold(Router::new(), |router, category| {
                router.nest(
                    &format!("/{}", category.segment()),
                    self.category_routes(category),
                )
            })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let mut paths = serde_json::Map::new();
        for category in TrendingCategory::ALL {
            let segment = category.segment();
            paths.insert(
                format!("/{}", segment),
                json!({
                    "get": {
                        "summary": format!("Trending {}", segment),
                        "tags": ["Trending"],
                        "parameters": [{
                            "name": "limit",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer", "minimum": 1, "maximum": 100 }
                        }],
                        "responses": {
                            "200": {
                                "description": format!("Most visited {}", segment),
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/TrendingFeed" }
                                    }
                                }
                            },
                            "422": {
                                "description": "Invalid limit",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }),
            );
        }

        Some(json!({
            "paths": paths,
            "components": {
                "schemas": {
                    "TrendingEntry": {
                        "type": "object",
                        "properties": {
                            "rank": { "type": "integer" },
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "visits": { "type": "integer" }
                        },
                        "required": ["rank", "id", "name", "visits"]
                    },
                    "TrendingFeed": {
                        "type": "object",
                        "properties": {
                            "status": { "type": "integer" },
                            "message": { "type": "string" },
                            "data": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/TrendingEntry" }
                            },
                            "route": { "type": "string" }
                        },
                        "required": ["status", "message", "data", "route"]
                    }
                }
            }
        }))
    }
}

/// Create the trending module backed by the shared store
pub fn create_module(ctx: &AppContext) -> Arc<dyn Module> {
    let service = Arc::new(VisitTrending::new(ctx.store.clone(), ctx.trending_window()));
    Arc::new(TrendingModule::new(
        service,
        ctx.settings.trending.default_limit,
    ))
}
