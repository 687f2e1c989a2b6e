use std::sync::Arc;

use brand_cms_core::events::EventBus;
use brand_cms_core::media::{BaseUrlMediaResolver, MediaResolver};
use brand_cms_core::mutation::MutationExecutor;
use brand_cms_core::store::ContentStore;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: Arc<dyn ContentStore>,
    config: AppConfig,
    event_bus: EventBus,
    media: Arc<dyn MediaResolver>,
    mutations: MutationExecutor,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, config: AppConfig, event_bus: EventBus) -> Self {
        let media = Arc::new(BaseUrlMediaResolver::new(config.media_base_url.clone()));
        let mutations = MutationExecutor::new(store.clone(), event_bus.clone());
        Self {
            inner: Arc::new(InnerState {
                store,
                config,
                event_bus,
                media,
                mutations,
            }),
        }
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.inner.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    pub fn media(&self) -> &dyn MediaResolver {
        self.inner.media.as_ref()
    }

    pub fn mutations(&self) -> &MutationExecutor {
        &self.inner.mutations
    }
}
