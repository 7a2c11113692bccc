// src/services/page_store.rs
use crate::errors::BreedSenseError;
use crate::workflow::WorkflowController;
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

struct PageEntry {
    controller: Arc<WorkflowController>,
    last_touched: Instant,
}

/// In-memory registry of mounted pages. Nothing outlives the process.
pub struct PageStore {
    pages: DashMap<Uuid, PageEntry>,
}

impl PageStore {
    pub fn new() -> Self {
        Self {
            pages: DashMap::new(),
        }
    }

    pub fn insert(&self, controller: WorkflowController) -> Arc<WorkflowController> {
        let controller = Arc::new(controller);
        self.pages.insert(
            controller.id(),
            PageEntry {
                controller: controller.clone(),
                last_touched: Instant::now(),
            },
        );
        controller
    }

    /// Look a page up and mark it as recently used.
    pub fn get(&self, id: &Uuid) -> Result<Arc<WorkflowController>, BreedSenseError> {
        let mut entry = self
            .pages
            .get_mut(id)
            .ok_or(BreedSenseError::PageNotFound(*id))?;
        entry.last_touched = Instant::now();
        Ok(entry.controller.clone())
    }

    /// Remove and unmount a page; its pending work is discarded.
    pub async fn remove(&self, id: &Uuid) -> Result<(), BreedSenseError> {
        let (_, entry) = self
            .pages
            .remove(id)
            .ok_or(BreedSenseError::PageNotFound(*id))?;
        entry.controller.unmount().await;
        Ok(())
    }

    /// Unmount every page nobody has touched for `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let idle: Vec<Uuid> = self
            .pages
            .iter()
            .filter(|entry| entry.last_touched.elapsed() >= ttl)
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for id in idle {
            // A page touched since the scan stays.
            let removed = self
                .pages
                .remove_if(&id, |_, entry| entry.last_touched.elapsed() >= ttl);
            if let Some((_, entry)) = removed {
                entry.controller.unmount().await;
                evicted += 1;
            }
        }
        evicted
    }

    /// Run [`PageStore::evict_idle`] every `every` until the runtime stops.
    pub fn spawn_eviction(self: Arc<Self>, ttl: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(ttl).await;
                if evicted > 0 {
                    info!("Evicted {} idle page(s), {} still mounted", evicted, self.len());
                } else {
                    debug!("No idle pages to evict");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::models::AnalysisKind;
    use crate::services::{MockGenerator, MockGeolocator};

    fn mount(kind: AnalysisKind) -> WorkflowController {
        WorkflowController::mount(
            kind,
            Arc::new(MockGenerator::seeded(0)),
            Arc::new(MockGeolocator),
            Timings::default(),
        )
    }

    #[tokio::test]
    async fn insert_get_remove() {
        let store = PageStore::new();
        let controller = store.insert(mount(AnalysisKind::Chat));
        let id = controller.id();

        assert_eq!(store.get(&id).unwrap().id(), id);
        assert_eq!(store.len(), 1);

        store.remove(&id).await.unwrap();
        assert!(!controller.is_mounted());
        assert!(matches!(
            store.get(&id),
            Err(BreedSenseError::PageNotFound(_))
        ));
        assert!(store.remove(&id).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_pages_are_evicted_and_active_ones_kept() {
        let store = Arc::new(PageStore::new());
        let abandoned = store.insert(mount(AnalysisKind::Breed));
        let active = store.insert(mount(AnalysisKind::Chat));

        let sweeper = store
            .clone()
            .spawn_eviction(Duration::from_secs(50), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(40)).await;
        store.get(&active.id()).unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(store.len(), 1);
        assert!(!abandoned.is_mounted());
        assert!(matches!(
            store.get(&abandoned.id()),
            Err(BreedSenseError::PageNotFound(_))
        ));
        assert!(active.is_mounted());
        assert!(store.get(&active.id()).is_ok());

        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn evict_idle_counts_what_it_removed() {
        let store = PageStore::new();
        for _ in 0..3 {
            store.insert(mount(AnalysisKind::Hospitals));
        }
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 3);
        assert_eq!(store.len(), 0);
    }
}
