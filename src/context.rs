use std::sync::Arc;

use anyhow::Context;

use shelfwise_authz::SharedResolver;
use shelfwise_db::{Catalog, MemoryStore, Retention};
use shelfwise_kernel::settings::{Settings, TrendingSettings};

/// Process-wide dependencies, built once at startup and handed to modules.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub store: Arc<MemoryStore>,
    pub resolver: SharedResolver,
}

impl AppContext {
    pub fn new(settings: Settings, store: MemoryStore, resolver: SharedResolver) -> Self {
        Self {
            settings: Arc::new(settings),
            store: Arc::new(store),
            resolver,
        }
    }

    /// Seed the catalog and pick the requester resolver from `settings`.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let catalog = match &settings.database.seed_path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("failed to seed catalog from '{}'", path))?,
            None => {
                tracing::warn!("no database.seed_path configured; starting with an empty catalog");
                Catalog::default()
            }
        };

        let resolver = shelfwise_authz::from_settings(&settings.auth)
            .context("failed to configure requester resolver")?;

        let retention = Retention {
            per_requester: settings.recently_visited.list_limit,
            window: trending_window(&settings.trending),
        };
        let store = MemoryStore::with_retention(catalog, retention);
        Ok(Self::new(settings, store, resolver))
    }

    pub fn trending_window(&self) -> time::Duration {
        trending_window(&self.settings.trending)
    }
}

fn trending_window(settings: &TrendingSettings) -> time::Duration {
    let hours = settings.window_hours.min(TrendingSettings::MAX_WINDOW_HOURS);
    time::Duration::hours(hours as i64)
}
