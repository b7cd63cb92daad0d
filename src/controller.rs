//! Overlay positioning controller.
//!
//! Owns the local view of every overlay and the single drag slot. Pointer
//! moves only touch local state; the only remote write a drag produces is
//! issued on release, carrying the last position the drag computed.
//!
//! # Sync state
//!
//! Each overlay tracks whether its local position is confirmed by the store:
//!
//! ```text
//!            issue write             outcome ok (current version)
//!   Synced ─────────────▶ Pending ──────────────────────────────▶ Synced
//!     ▲                      │ outcome err (current version)
//!     │ revert / refresh     ▼
//!     └──────────────────  Failed ──── retry ───▶ Pending
//! ```
//!
//! Every write carries a per-overlay version. Outcomes of older versions are
//! stale and never move the state machine.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use overlaykit::{OverlayController, Point, PointerDown, Rect};
//! use overlaykit::store::HttpOverlayStore;
//!
//! # async fn example() -> overlaykit::Result<()> {
//! let store = Arc::new(HttpOverlayStore::new("http://localhost:5000/api")?);
//! let mut controller = OverlayController::new(store);
//! controller.refresh().await;
//!
//! let container = Rect::new(0.0, 0.0, 1280.0, 500.0);
//! let first_id = controller.overlays().next().map(|o| o.id.clone());
//! if let Some(id) = first_id {
//!     controller.start_drag(&id, PointerDown::primary(60.0, 60.0), Point::new(50.0, 50.0));
//!     controller.update_drag(Point::new(400.0, 300.0), &container);
//!     controller.finish_drag().await;
//! }
//! for notice in controller.take_notices() {
//!     eprintln!("{notice}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, error, info, warn};

use crate::drag::{DragSession, DragSlot, PointerButton, PointerDown};
use crate::error::{OverlayError, Result};
use crate::geometry::{Point, Rect, Size};
use crate::model::{Overlay, OverlayDraft, OverlayPatch};
use crate::store::OverlayStore;

/// Whether an overlay's local position matches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Local position is the last one the store confirmed
    Synced,
    /// A write with this version is in flight
    Pending { version: u64 },
    /// The write with this version failed; the local value was kept
    Failed { version: u64, reason: String },
}

/// An overlay plus its sync bookkeeping.
#[derive(Debug, Clone)]
pub struct TrackedOverlay {
    overlay: Overlay,
    sync: SyncState,
    confirmed_position: Point,
    version: u64,
}

impl TrackedOverlay {
    fn synced(overlay: Overlay) -> Self {
        Self {
            confirmed_position: overlay.position,
            overlay,
            sync: SyncState::Synced,
            version: 0,
        }
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn sync(&self) -> &SyncState {
        &self.sync
    }

    /// Last position the store acknowledged.
    #[must_use]
    pub fn confirmed_position(&self) -> Point {
        self.confirmed_position
    }

    /// Version of the most recently issued write (0 = none yet).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing message produced by a controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Error => write!(f, "❌ {}", self.message),
        }
    }
}

/// One issued position write, not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteTicket {
    pub id: String,
    pub version: u64,
    pub position: Point,
}

impl WriteTicket {
    /// Send the write. The returned future owns everything it needs, so it
    /// can be spawned or polled while the controller handles other events.
    pub fn dispatch(self, store: Arc<dyn OverlayStore>) -> BoxFuture<'static, WriteOutcome> {
        async move {
            let result = store
                .update(&self.id, &OverlayPatch::position(self.position))
                .await;
            WriteOutcome {
                ticket: self,
                result,
            }
        }
        .boxed()
    }
}

/// Result of a dispatched [`WriteTicket`].
#[derive(Debug)]
pub struct WriteOutcome {
    pub ticket: WriteTicket,
    pub result: Result<()>,
}

/// Overlay positioning controller.
pub struct OverlayController {
    store: Arc<dyn OverlayStore>,
    overlays: Vec<TrackedOverlay>,
    drag: DragSlot,
    notices: Vec<Notice>,
}

impl OverlayController {
    /// Controller with an empty view over `store`. Call [`refresh`](Self::refresh)
    /// to load existing overlays.
    pub fn new(store: Arc<dyn OverlayStore>) -> Self {
        Self {
            store,
            overlays: Vec::new(),
            drag: DragSlot::new(),
            notices: Vec::new(),
        }
    }

    /// Handle to the backing store, e.g. for dispatching tickets.
    #[must_use]
    pub fn store(&self) -> Arc<dyn OverlayStore> {
        Arc::clone(&self.store)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter().map(|t| &t.overlay)
    }

    #[must_use]
    pub fn tracked(&self) -> &[TrackedOverlay] {
        &self.overlays
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TrackedOverlay> {
        self.overlays.iter().find(|t| t.overlay.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut TrackedOverlay> {
        self.overlays.iter_mut().find(|t| t.overlay.id == id)
    }

    #[must_use]
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.current()
    }

    /// Drain pending user notifications.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn report(&mut self, action: &str, err: &OverlayError) {
        error!(kind = err.kind(), error = %err, "{action}");
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: format!("{action}: {err}"),
        });
    }

    fn inform(&mut self, message: String) {
        info!("{message}");
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            message,
        });
    }

    // ─── Loading ────────────────────────────────────────────────────────────

    /// Replace the local view with the store's list. Every overlay becomes
    /// `Synced`. On failure the local view is kept.
    pub async fn refresh(&mut self) -> bool {
        match self.store.list().await {
            Ok(overlays) => {
                debug!(count = overlays.len(), store = self.store.name(), "Loaded overlays");
                let mut fresh: Vec<TrackedOverlay> =
                    overlays.into_iter().map(TrackedOverlay::synced).collect();
                // Versions survive a reload so writes issued before it stay stale.
                for tracked in &mut fresh {
                    if let Some(previous) = self.get(&tracked.overlay.id) {
                        tracked.version = previous.version;
                    }
                }
                self.overlays = fresh;
                true
            }
            Err(err) => {
                self.report("Failed to fetch overlays", &err);
                false
            }
        }
    }

    // ─── Dragging ───────────────────────────────────────────────────────────

    /// Pointer-down on overlay `id`, whose element's top-left is at
    /// `element_origin` in client space.
    ///
    /// Returns `false` (and changes nothing) for non-primary buttons, unknown
    /// overlays, or while another drag is live.
    pub fn start_drag(&mut self, id: &str, event: PointerDown, element_origin: Point) -> bool {
        if event.button != PointerButton::Primary {
            return false;
        }
        let Some(size) = self.get(id).map(|t| t.overlay.size) else {
            debug!(id, "Drag start on unknown overlay ignored");
            return false;
        };

        let session = DragSession::grab(id, event.position, element_origin, size);
        match self.drag.acquire(session) {
            Ok(session) => {
                debug!(id, offset = ?session.grab_offset(), "Drag started");
                true
            }
            Err(_) => {
                warn!(id, "Drag already in progress, ignoring new drag");
                false
            }
        }
    }

    /// Pointer-move. Moves the dragged overlay locally, clamped inside
    /// `container` (the container's current client-space rect). No remote
    /// call. Returns the applied position, or `None` without a live drag.
    pub fn update_drag(&mut self, pointer: Point, container: &Rect) -> Option<Point> {
        let session = self.drag.current()?;
        let position = session.position_for(pointer, container);
        let id = session.overlay_id().to_string();

        let tracked = self.get_mut(&id)?;
        tracked.overlay.position = position;
        Some(position)
    }

    /// Pointer-up. Releases the drag slot and, when the dragged overlay still
    /// exists, issues one write carrying its current local position.
    pub fn end_drag(&mut self) -> Option<WriteTicket> {
        let session = self.drag.release()?;
        let id = session.overlay_id();
        let position = self.get(id)?.overlay.position;
        debug!(id, ?position, "Drag ended");
        self.issue_position(id, position)
    }

    /// [`end_drag`](Self::end_drag), then send the write and apply its
    /// outcome. Returns `true` when the write was confirmed.
    pub async fn finish_drag(&mut self) -> bool {
        match self.end_drag() {
            Some(ticket) => self.send(ticket).await,
            None => false,
        }
    }

    // ─── Position writes ────────────────────────────────────────────────────

    /// Apply `position` locally and mark the overlay `Pending` under a new
    /// version. Returns the ticket to dispatch, or `None` for unknown ids.
    pub fn issue_position(&mut self, id: &str, position: Point) -> Option<WriteTicket> {
        let tracked = self.get_mut(id)?;
        tracked.overlay.position = position;
        tracked.version += 1;
        tracked.sync = SyncState::Pending {
            version: tracked.version,
        };
        Some(WriteTicket {
            id: id.to_string(),
            version: tracked.version,
            position,
        })
    }

    /// Optimistically move overlay `id` and persist the position. A failed
    /// write keeps the local value and marks the overlay `Failed`.
    pub async fn persist_position(&mut self, id: &str, position: Point) -> bool {
        match self.issue_position(id, position) {
            Some(ticket) => self.send(ticket).await,
            None => {
                self.report(
                    "Failed to update position",
                    &OverlayError::NotFound(id.to_string()),
                );
                false
            }
        }
    }

    async fn send(&mut self, ticket: WriteTicket) -> bool {
        let outcome = ticket.dispatch(self.store()).await;
        let ok = outcome.result.is_ok();
        self.apply_outcome(outcome) && ok
    }

    /// Fold a write outcome into local state. Returns `false` when the
    /// outcome was stale or its overlay is gone. Failures are always
    /// reported, stale or not.
    pub fn apply_outcome(&mut self, outcome: WriteOutcome) -> bool {
        let WriteOutcome { ticket, result } = outcome;

        if let Err(ref err) = result {
            self.report("Failed to update position", err);
        }

        let Some(tracked) = self.get_mut(&ticket.id) else {
            debug!(id = %ticket.id, "Write outcome for removed overlay dropped");
            return false;
        };
        if ticket.version < tracked.version {
            debug!(
                id = %ticket.id,
                version = ticket.version,
                latest = tracked.version,
                "Stale write outcome ignored"
            );
            return false;
        }

        match result {
            Ok(()) => {
                tracked.confirmed_position = ticket.position;
                tracked.sync = SyncState::Synced;
                info!(id = %ticket.id, "Successfully updated overlay position");
            }
            Err(err) => {
                tracked.sync = SyncState::Failed {
                    version: ticket.version,
                    reason: err.to_string(),
                };
            }
        }
        true
    }

    /// Re-send the current local position of a `Failed` overlay.
    pub async fn retry_failed(&mut self, id: &str) -> bool {
        let position = match self.get(id) {
            Some(t) if matches!(t.sync, SyncState::Failed { .. }) => t.overlay.position,
            _ => return false,
        };
        self.persist_position(id, position).await
    }

    /// Restore the last confirmed position of a `Failed` overlay locally.
    pub fn revert_failed(&mut self, id: &str) -> bool {
        let Some(tracked) = self.get_mut(id) else {
            return false;
        };
        if !matches!(tracked.sync, SyncState::Failed { .. }) {
            return false;
        }
        tracked.overlay.position = tracked.confirmed_position;
        tracked.sync = SyncState::Synced;
        true
    }

    /// Change an overlay's size in local state only. A live drag keeps the
    /// size it grabbed.
    pub fn resize_local(&mut self, id: &str, size: Size) -> bool {
        match self.get_mut(id) {
            Some(tracked) => {
                tracked.overlay.size = size;
                true
            }
            None => false,
        }
    }

    // ─── Create / delete ────────────────────────────────────────────────────

    /// Store `draft` and append the authoritative record. Local state is
    /// untouched on failure.
    pub async fn create_overlay(&mut self, draft: &OverlayDraft) -> Option<Overlay> {
        if let Err(err) = draft.validate() {
            self.report("Failed to create overlay", &err);
            return None;
        }
        match self.store.create(draft).await {
            Ok(overlay) => {
                self.inform(format!("Created overlay {}", overlay.id));
                self.overlays.push(TrackedOverlay::synced(overlay.clone()));
                Some(overlay)
            }
            Err(err) => {
                self.report("Failed to create overlay", &err);
                None
            }
        }
    }

    /// Delete overlay `id` remotely, then drop exactly that entry locally.
    /// A live drag of the overlay is released.
    pub async fn delete_overlay(&mut self, id: &str) -> bool {
        match self.store.delete(id).await {
            Ok(()) => {
                self.overlays.retain(|t| t.overlay.id != id);
                if self.drag.is_dragging(id) {
                    self.drag.release();
                }
                self.inform(format!("Deleted overlay {id}"));
                true
            }
            Err(err) => {
                self.report("Delete failed", &err);
                false
            }
        }
    }
}
