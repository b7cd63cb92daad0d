//! Overlay records as the REST API defines them.
//!
//! Field names follow the API's camelCase JSON (`imageUrl`, `fontSize`,
//! `backgroundColor`). Records coming back from the server may omit fields;
//! those fall back to the same defaults the server applies on create.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::geometry::{Point, Size};

/// What an overlay renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    /// Styled text (the `content` field)
    #[default]
    Text,
    /// Image from `imageUrl`, with `content` as alt text
    Image,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

impl FromStr for OverlayKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(OverlayError::InvalidInput(format!(
                "unknown overlay type '{other}' (expected text or image)"
            ))),
        }
    }
}

/// Visual style. Values are CSS strings and pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl OverlayStyle {
    /// Style of the editor's "new overlay" form: white on crimson.
    #[must_use]
    pub fn live_badge() -> Self {
        Self {
            font_size: Some("24px".to_string()),
            color: Some("#FFFFFF".to_string()),
            background_color: Some("rgba(220, 20, 60, 0.8)".to_string()),
        }
    }
}

/// Position the server assigns when a create request carries none.
pub const SERVER_DEFAULT_POSITION: Point = Point::new(250.0, 150.0);

fn server_default_position() -> Point {
    SERVER_DEFAULT_POSITION
}

/// A stored overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// Store-assigned identifier
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: OverlayKind,
    /// Display text, or alt text for images
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    /// Top-left corner relative to the video container
    #[serde(default = "server_default_position")]
    pub position: Point,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub style: OverlayStyle,
    #[serde(
        rename = "created_at",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Overlay {
    /// Short human label: the text, or the image URL when there is none.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.content.is_empty() {
            &self.image_url
        } else {
            &self.content
        }
    }
}

/// An overlay that has not been stored yet (no identifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayDraft {
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub content: String,
    pub image_url: String,
    pub position: Point,
    pub size: Size,
    pub style: OverlayStyle,
}

impl Default for OverlayDraft {
    fn default() -> Self {
        Self {
            kind: OverlayKind::Text,
            content: "LIVE".to_string(),
            image_url: String::new(),
            position: Point::new(50.0, 50.0),
            size: Size::default(),
            style: OverlayStyle::live_badge(),
        }
    }
}

impl OverlayDraft {
    /// Text overlay with the default badge style.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Image overlay; `alt` becomes the content.
    #[must_use]
    pub fn image(image_url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            kind: OverlayKind::Image,
            content: alt.into(),
            image_url: image_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Reject drafts no renderer could show.
    pub fn validate(&self) -> Result<()> {
        if self.kind == OverlayKind::Image && self.image_url.trim().is_empty() {
            return Err(OverlayError::InvalidInput(
                "image overlays need an image URL".to_string(),
            ));
        }
        if !(self.size.width > 0.0 && self.size.height > 0.0) {
            return Err(OverlayError::InvalidInput(format!(
                "overlay size must be positive, got {}x{}",
                self.size.width, self.size.height
            )));
        }
        if self.position.x < 0.0 || self.position.y < 0.0 {
            return Err(OverlayError::InvalidInput(
                "overlay position must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize as a stored record under `id`.
    #[must_use]
    pub fn into_overlay(self, id: String, created_at: Option<String>) -> Overlay {
        Overlay {
            id,
            kind: self.kind,
            content: self.content,
            image_url: self.image_url,
            position: self.position,
            size: self.size,
            style: self.style,
            created_at,
        }
    }
}

/// Partial update. Absent fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OverlayKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<OverlayStyle>,
}

impl OverlayPatch {
    /// Patch carrying only a position.
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply every present field to `overlay`.
    pub fn apply_to(&self, overlay: &mut Overlay) {
        if let Some(kind) = self.kind {
            overlay.kind = kind;
        }
        if let Some(ref content) = self.content {
            overlay.content.clone_from(content);
        }
        if let Some(ref image_url) = self.image_url {
            overlay.image_url.clone_from(image_url);
        }
        if let Some(position) = self.position {
            overlay.position = position;
        }
        if let Some(size) = self.size {
            overlay.size = size;
        }
        if let Some(ref style) = self.style {
            overlay.style = style.clone();
        }
    }
}

// ============================================================================
// API envelopes
// ============================================================================

/// `GET /overlays` response body
#[derive(Debug, Deserialize)]
pub(crate) struct OverlayList {
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

/// `POST /overlays` response body
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedOverlay {
    pub overlay: Overlay,
}

/// Error body the API returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub details: Option<String>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        match (&self.error, &self.details) {
            (Some(e), Some(d)) => Some(format!("{e} ({d})")),
            (Some(e), None) => Some(e.clone()),
            (None, Some(d)) => Some(d.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_server_record() {
        let json = r##"{
            "id": "2b0c6c1e-1111-4222-8333-944445555666",
            "content": "LIVE",
            "imageUrl": "",
            "type": "text",
            "position": {"x": 50, "y": 75.5},
            "size": {"width": 200, "height": 60},
            "style": {"fontSize": "24px", "color": "#FFFFFF", "backgroundColor": "rgba(220, 20, 60, 0.8)"},
            "created_at": "2025-01-01T12:00:00"
        }"##;
        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.kind, OverlayKind::Text);
        assert_eq!(overlay.position, Point::new(50.0, 75.5));
        assert_eq!(overlay.style, OverlayStyle::live_badge());
        assert_eq!(overlay.created_at.as_deref(), Some("2025-01-01T12:00:00"));
    }

    #[test]
    fn missing_fields_fall_back_to_server_defaults() {
        let overlay: Overlay = serde_json::from_str(r#"{"id": "a", "style": {}}"#).unwrap();
        assert_eq!(overlay.kind, OverlayKind::Text);
        assert_eq!(overlay.position, SERVER_DEFAULT_POSITION);
        assert_eq!(overlay.size, Size::new(200.0, 60.0));
        assert_eq!(overlay.style, OverlayStyle::default());
    }

    #[test]
    fn position_patch_serializes_only_position() {
        let body = serde_json::to_value(OverlayPatch::position(Point::new(12.0, 34.0))).unwrap();
        assert_eq!(body, serde_json::json!({"position": {"x": 12.0, "y": 34.0}}));
    }

    #[test]
    fn draft_uses_api_field_names() {
        let body = serde_json::to_value(OverlayDraft::image("https://e.com/logo.png", "logo")).unwrap();
        assert_eq!(body["type"], "image");
        assert_eq!(body["imageUrl"], "https://e.com/logo.png");
        assert_eq!(body["style"]["backgroundColor"], "rgba(220, 20, 60, 0.8)");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn validate_rejects_image_without_url() {
        let draft = OverlayDraft {
            kind: OverlayKind::Image,
            ..OverlayDraft::default()
        };
        assert!(matches!(draft.validate(), Err(OverlayError::InvalidInput(_))));
        assert!(OverlayDraft::default().validate().is_ok());
    }

    #[test]
    fn label_prefers_content() {
        let mut overlay = OverlayDraft::image("https://e.com/a.png", "").into_overlay("x".into(), None);
        assert_eq!(overlay.label(), "https://e.com/a.png");
        overlay.content = "alt".into();
        assert_eq!(overlay.label(), "alt");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("IMAGE".parse::<OverlayKind>().unwrap(), OverlayKind::Image);
        assert!("video".parse::<OverlayKind>().is_err());
    }

    #[test]
    fn error_body_message_combines_fields() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": "Failed to update overlay.", "details": "boom"}"#).unwrap();
        assert_eq!(body.message().unwrap(), "Failed to update overlay. (boom)");
    }
}
