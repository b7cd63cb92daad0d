//! In-process overlay store.
//!
//! Mirrors the API server's behavior: UUID v4 identifiers, a `created_at`
//! timestamp on create, unknown ids reported as not found. Records live in
//! insertion order.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::OverlayStore;
use crate::error::{OverlayError, Result};
use crate::model::{Overlay, OverlayDraft, OverlayPatch};

/// Overlay store held in memory.
#[derive(Default)]
pub struct MemoryStore {
    overlays: RwLock<Vec<Overlay>>,
    update_calls: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `overlays`.
    #[must_use]
    pub fn with_overlays(overlays: Vec<Overlay>) -> Self {
        Self {
            overlays: RwLock::new(overlays),
            update_calls: AtomicUsize::new(0),
        }
    }

    /// Look up a stored record.
    pub async fn get(&self, id: &str) -> Option<Overlay> {
        self.overlays.read().await.iter().find(|o| o.id == id).cloned()
    }

    /// Number of `update` calls received, successful or not.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OverlayStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Overlay>> {
        Ok(self.overlays.read().await.clone())
    }

    async fn create(&self, draft: &OverlayDraft) -> Result<Overlay> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now()
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        let overlay = draft.clone().into_overlay(id, Some(created_at));
        debug!(id = %overlay.id, "Created overlay in memory");
        self.overlays.write().await.push(overlay.clone());
        Ok(overlay)
    }

    async fn update(&self, id: &str, patch: &OverlayPatch) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut overlays = self.overlays.write().await;
        let overlay = overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| OverlayError::NotFound(id.to_string()))?;
        patch.apply_to(overlay);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut overlays = self.overlays.write().await;
        let before = overlays.len();
        overlays.retain(|o| o.id != id);
        if overlays.len() == before {
            return Err(OverlayError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
