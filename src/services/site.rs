// src/services/site.rs

//! Per-instance application context.
//!
//! `Site` holds the configuration and the content source, and hands out a
//! fresh `SectionStore` for every page it mounts. Nothing is cached between
//! mounts: a page's data lives exactly as long as its `MountedPage`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::{Config, Page, RouteMatch, Section, route};
use crate::services::store::{FetchOutcome, PageView, SectionStore, ViewScope};
use crate::utils::http::{ApiClient, ContentSource};

/// Application context shared by all pages.
pub struct Site {
    config: Arc<Config>,
    source: Arc<dyn ContentSource>,
}

impl Site {
    /// Create a site backed by the HTTP content client.
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create a site backed by any content source.
    pub fn with_source(config: Config, source: Arc<dyn ContentSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a new store for `section`.
    pub fn create_store(&self, section: Section) -> Arc<SectionStore> {
        Arc::new(SectionStore::new(
            self.config.api.endpoint(section.slug()),
            section.schema(),
            Arc::clone(&self.source),
        ))
    }

    /// Resolve `path` and mount its page. The page is not loaded yet.
    pub fn mount(&self, path: &str) -> Result<MountedPage> {
        let route = route::resolve(path).ok_or_else(|| AppError::UnknownRoute(path.to_string()))?;
        let store = self.create_store(route.page.section());
        log::debug!("Mounted {} -> {}", path, store.endpoint());
        Ok(MountedPage {
            route,
            store,
            scope: ViewScope::new(),
        })
    }

    /// Fetch every section once, at most `api.max_concurrent` at a time.
    ///
    /// Results come back in completion order.
    pub async fn fetch_all(&self) -> Vec<(Section, Arc<SectionStore>, FetchOutcome)> {
        let concurrency = self.config.api.max_concurrent.max(1);
        let scope = ViewScope::new();

        stream::iter(Section::ALL)
            .map(|section| {
                let store = self.create_store(section);
                let scope = scope.clone();
                async move {
                    let outcome = store.fetch_all_data(&scope).await;
                    (section, store, outcome)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await
    }
}

/// A page bound to its route, store and view scope.
///
/// Dropping the page cancels its scope, so a fetch still in flight is
/// abandoned instead of updating a store nobody renders.
pub struct MountedPage {
    route: RouteMatch,
    store: Arc<SectionStore>,
    scope: ViewScope,
}

impl MountedPage {
    pub fn page(&self) -> Page {
        self.route.page
    }

    pub fn route(&self) -> &RouteMatch {
        &self.route
    }

    pub fn store(&self) -> &Arc<SectionStore> {
        &self.store
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch-on-mount.
    pub async fn load(&self) -> FetchOutcome {
        self.store.fetch_all_data(&self.scope).await
    }

    /// Manual retry from the error view; same request as `load`.
    pub async fn retry(&self) -> FetchOutcome {
        log::info!("Retrying {}", self.store.endpoint());
        self.load().await
    }

    /// Start loading in the background.
    pub fn spawn_load(&self) -> JoinHandle<FetchOutcome> {
        let store = Arc::clone(&self.store);
        let scope = self.scope.clone();
        tokio::spawn(async move { store.fetch_all_data(&scope).await })
    }

    pub fn view(&self) -> PageView {
        self.store.view()
    }
}

impl Drop for MountedPage {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
