//! Remote overlay storage.
//!
//! # Architecture
//!
//! - [`OverlayStore`]: async CRUD trait the controller talks to
//! - [`HttpOverlayStore`]: JSON-over-HTTP client for the overlay API
//! - [`MemoryStore`]: in-process store with the same semantics as the API
//!
//! # Example
//!
//! ```rust,no_run
//! use overlaykit::store::{HttpOverlayStore, OverlayStore};
//!
//! # async fn example() -> overlaykit::Result<()> {
//! let store = HttpOverlayStore::new("http://localhost:5000/api")?;
//! for overlay in store.list().await? {
//!     println!("{} at ({}, {})", overlay.id, overlay.position.x, overlay.position.y);
//! }
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Overlay, OverlayDraft, OverlayPatch};

pub use http::{HttpOverlayStore, StoreConfig};
pub use memory::MemoryStore;

/// CRUD access to persisted overlays, keyed by store-assigned identifier.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Short lowercase store name for logs (e.g., `"http"`, `"memory"`).
    fn name(&self) -> &'static str;

    /// Every stored overlay.
    async fn list(&self) -> Result<Vec<Overlay>>;

    /// Store a draft; returns the authoritative record with its identifier.
    async fn create(&self, draft: &OverlayDraft) -> Result<Overlay>;

    /// Apply a partial update. Success carries no body.
    async fn update(&self, id: &str, patch: &OverlayPatch) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
