//! `overlaykit` - Headless video overlay editor
//!
//! # Features
//!
//! - **Drag positioning**: pointer events → clamped, container-relative overlay positions
//! - **Optimistic persistence**: local moves are instant, one confirmed write per drag
//! - **Sync tracking**: per-overlay synced / pending / failed state with versioned writes
//! - **REST store**: JSON-over-HTTP client for the overlay API, plus an in-memory store
//! - **Video sources**: YouTube id parsing and embed URLs, local files via object URLs
//! - **RTSP → HLS**: ffmpeg-backed stream conversion for camera feeds
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use overlaykit::{OverlayController, OverlayDraft, Point};
//! use overlaykit::store::HttpOverlayStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(HttpOverlayStore::new("http://localhost:5000/api")?);
//!     let mut controller = OverlayController::new(store);
//!     controller.refresh().await;
//!
//!     if let Some(overlay) = controller.create_overlay(&OverlayDraft::text("LIVE")).await {
//!         controller.persist_position(&overlay.id, Point::new(40.0, 40.0)).await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod hls;
pub mod model;
pub mod store;
pub mod video;

pub use controller::{Notice, NoticeLevel, OverlayController, SyncState, TrackedOverlay, WriteOutcome, WriteTicket};
pub use drag::{DragSession, DragSlot, PointerButton, PointerDown};
pub use error::{OverlayError, Result};
pub use geometry::{Point, Rect, Size};
pub use hls::{HlsConfig, HlsConverter};
pub use model::{Overlay, OverlayDraft, OverlayKind, OverlayPatch, OverlayStyle};
pub use store::{HttpOverlayStore, MemoryStore, OverlayStore};
pub use video::{VideoPlayer, VideoSource};

/// Version of overlaykit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
