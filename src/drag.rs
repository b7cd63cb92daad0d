//! Pointer drag sessions.
//!
//! A [`DragSession`] lives from pointer-down on an overlay until pointer-up.
//! Sessions are held in a [`DragSlot`], which holds at most one: acquiring
//! an occupied slot fails and leaves the live session untouched.

use crate::geometry::{Point, Rect, Size};

/// Pointer button, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Button 0 (usually left)
    Primary,
    /// Button 1 (wheel)
    Auxiliary,
    /// Button 2 (usually right)
    Secondary,
    Other(u16),
}

impl From<u16> for PointerButton {
    fn from(button: u16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// Pointer-down event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub position: Point,
    pub button: PointerButton,
}

impl PointerDown {
    #[must_use]
    pub const fn primary(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }
}

/// State of one in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    overlay_id: String,
    grab_offset: Point,
    size: Size,
}

impl DragSession {
    /// Session grabbing overlay `overlay_id`, whose element's top-left sits
    /// at `element_origin` (client space), at pointer `pointer`.
    ///
    /// `size` is copied: later size edits on the overlay do not affect this
    /// drag.
    #[must_use]
    pub fn grab(overlay_id: impl Into<String>, pointer: Point, element_origin: Point, size: Size) -> Self {
        Self {
            overlay_id: overlay_id.into(),
            grab_offset: pointer - element_origin,
            size,
        }
    }

    #[must_use]
    pub fn overlay_id(&self) -> &str {
        &self.overlay_id
    }

    /// Pointer offset inside the overlay at grab time.
    #[must_use]
    pub fn grab_offset(&self) -> Point {
        self.grab_offset
    }

    /// Overlay size frozen at grab time.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Container-relative, clamped overlay position for a pointer at
    /// `pointer` (client space).
    #[must_use]
    pub fn position_for(&self, pointer: Point, container: &Rect) -> Point {
        container.place(pointer, self.grab_offset, self.size)
    }
}

/// Single-slot owner for the live drag session.
#[derive(Debug, Default)]
pub struct DragSlot {
    session: Option<DragSession>,
}

impl DragSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot. Hands the session back if one is already live.
    pub fn acquire(&mut self, session: DragSession) -> Result<&DragSession, DragSession> {
        if self.session.is_some() {
            return Err(session);
        }
        Ok(self.session.insert(session))
    }

    /// Empty the slot, returning whatever was in it.
    pub fn release(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    #[must_use]
    pub fn current(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the live session (if any) is dragging `overlay_id`.
    #[must_use]
    pub fn is_dragging(&self, overlay_id: &str) -> bool {
        self.session.as_ref().is_some_and(|s| s.overlay_id == overlay_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_offset_is_pointer_minus_origin() {
        let session = DragSession::grab(
            "a",
            Point::new(130.0, 95.0),
            Point::new(100.0, 80.0),
            Size::new(200.0, 60.0),
        );
        assert_eq!(session.grab_offset(), Point::new(30.0, 15.0));
    }

    #[test]
    fn slot_holds_at_most_one_session() {
        let mut slot = DragSlot::new();
        let first = DragSession::grab("a", Point::default(), Point::default(), Size::default());
        let second = DragSession::grab("b", Point::default(), Point::default(), Size::default());

        assert!(slot.acquire(first).is_ok());
        let rejected = slot.acquire(second).unwrap_err();
        assert_eq!(rejected.overlay_id(), "b");
        assert!(slot.is_dragging("a"));

        assert_eq!(slot.release().unwrap().overlay_id(), "a");
        assert!(!slot.is_active());
        assert!(slot.release().is_none());
    }

    #[test]
    fn dom_button_numbers_map() {
        assert_eq!(PointerButton::from(0), PointerButton::Primary);
        assert_eq!(PointerButton::from(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from(4), PointerButton::Other(4));
    }
}
