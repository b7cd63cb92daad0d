//! Video sources: YouTube embeds and local files.
//!
//! YouTube input may be a full URL (`watch?v=`, `youtu.be/`, `/embed/`) or a
//! bare 11-character video id. Local files are exposed to the player through
//! revocable `blob:` object URLs; the player revokes the previous one whenever
//! a new local file replaces it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{OverlayError, Result};

/// Length of a YouTube video id.
pub const YOUTUBE_ID_LEN: usize = 11;

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Extract a YouTube video id from a URL or bare id.
///
/// Input starting with `http` is parsed as a URL; anything else is treated as
/// the value of a `watch?v=` parameter. The id is the `v` query parameter, or
/// failing that the last path segment, truncated to 11 characters.
///
/// ```
/// use overlaykit::video::parse_youtube_id;
///
/// assert_eq!(parse_youtube_id("https://youtube.com/watch?v=dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
/// assert_eq!(parse_youtube_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
/// assert!(parse_youtube_id("not a url").is_err());
/// ```
pub fn parse_youtube_id(input: &str) -> Result<String> {
    let input = input.trim();
    let candidate = if input.starts_with("http") {
        Url::parse(input).ok()
    } else {
        Url::parse(&format!(
            "https://www.youtube.com/watch?v={}",
            urlencoding::encode(input)
        ))
        .ok()
    }
    .map(|url| id_from_url(&url))
    .or_else(|| (input.chars().count() == YOUTUBE_ID_LEN).then(|| input.to_string()));

    match candidate {
        Some(id) if YOUTUBE_ID.is_match(&id) => Ok(id),
        _ => Err(OverlayError::InvalidInput(format!(
            "Invalid YouTube URL or ID: {input}"
        ))),
    }
}

fn id_from_url(url: &Url) -> String {
    let id = url
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default();
    id.chars().take(YOUTUBE_ID_LEN).collect()
}

/// Embed URL for a YouTube video id.
#[must_use]
pub fn youtube_embed_url(id: &str) -> String {
    format!("https://www.youtube.com/embed/{id}?autoplay=0&controls=1&rel=0")
}

/// Revocable `blob:` handle standing for a local file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live object URLs.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    live: HashMap<ObjectUrl, PathBuf>,
}

impl ObjectUrlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new object URL for `path`.
    pub fn create(&mut self, path: &Path) -> ObjectUrl {
        let url = ObjectUrl(format!("blob:overlaykit/{}", uuid::Uuid::new_v4()));
        self.live.insert(url.clone(), path.to_path_buf());
        debug!(url = %url, path = %path.display(), "Object URL created");
        url
    }

    /// Release `url`. Revoking an unknown or already revoked URL is a no-op.
    pub fn revoke(&mut self, url: &ObjectUrl) -> bool {
        let removed = self.live.remove(url).is_some();
        if removed {
            debug!(url = %url, "Object URL revoked");
        }
        removed
    }

    #[must_use]
    pub fn resolve(&self, url: &ObjectUrl) -> Option<&Path> {
        self.live.get(url).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// What the player is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Local { url: ObjectUrl, path: PathBuf },
}

impl VideoSource {
    /// URL the front end should hand to its player element.
    #[must_use]
    pub fn player_url(&self) -> String {
        match self {
            Self::YouTube { id } => youtube_embed_url(id),
            Self::Local { url, .. } => url.to_string(),
        }
    }
}

/// Current video plus the object URLs it owns.
#[derive(Debug, Default)]
pub struct VideoPlayer {
    source: Option<VideoSource>,
    objects: ObjectUrlRegistry,
}

impl VideoPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(&self) -> Option<&VideoSource> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn objects(&self) -> &ObjectUrlRegistry {
        &self.objects
    }

    /// Show a YouTube video. Invalid input leaves the current source as is.
    pub fn load_youtube(&mut self, input: &str) -> Result<&VideoSource> {
        let id = parse_youtube_id(input).inspect_err(|err| {
            warn!(error = %err, input, "Rejected YouTube input");
        })?;
        info!(id = %id, "Loading YouTube video");
        Ok(self.replace(VideoSource::YouTube { id }))
    }

    /// Show a local file through a fresh object URL, revoking the previous
    /// local object URL if there was one.
    pub fn load_local_file(&mut self, path: impl AsRef<Path>) -> Result<&VideoSource> {
        let path = path.as_ref();
        let checked = std::fs::metadata(path)
            .map_err(OverlayError::from)
            .and_then(|meta| {
                if meta.is_file() {
                    Ok(())
                } else {
                    Err(OverlayError::InvalidInput(format!("not a file: {}", path.display())))
                }
            });
        if let Err(err) = checked {
            warn!(error = %err, path = %path.display(), "Rejected local video");
            return Err(err);
        }

        let url = self.objects.create(path);
        info!(path = %path.display(), url = %url, "Loading local video");
        Ok(self.replace(VideoSource::Local {
            url,
            path: path.to_path_buf(),
        }))
    }

    fn replace(&mut self, next: VideoSource) -> &VideoSource {
        if let Some(VideoSource::Local { url, .. }) = self.source.take() {
            self.objects.revoke(&url);
        }
        self.source.insert(next)
    }

    /// Drop the current source, releasing its object URL.
    pub fn unload(&mut self) {
        if let Some(VideoSource::Local { url, .. }) = self.source.take() {
            self.objects.revoke(&url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_watch_urls() {
        for input in [
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "  https://youtube.com/watch?v=dQw4w9WgXcQ  ",
        ] {
            assert_eq!(parse_youtube_id(input).unwrap(), "dQw4w9WgXcQ", "{input}");
        }
    }

    #[test]
    fn parses_path_style_urls() {
        assert_eq!(parse_youtube_id("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            parse_youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            parse_youtube_id("https://www.youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn truncates_long_ids() {
        assert_eq!(
            parse_youtube_id("https://youtube.com/watch?v=dQw4w9WgXcQEXTRA").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn bare_id() {
        assert_eq!(parse_youtube_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(parse_youtube_id("a-b_c1234XY").unwrap(), "a-b_c1234XY");
    }

    #[test]
    fn rejects_garbage() {
        for input in ["not a url", "", "short", "https://youtube.com/", "http://", "dQw4w9WgXc!"] {
            assert!(
                matches!(parse_youtube_id(input), Err(OverlayError::InvalidInput(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn embed_url_format() {
        assert_eq!(
            youtube_embed_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&controls=1&rel=0"
        );
    }

    #[test]
    fn invalid_youtube_leaves_state_unchanged() {
        let mut player = VideoPlayer::new();
        player.load_youtube("dQw4w9WgXcQ").unwrap();
        assert!(player.load_youtube("not a url").is_err());
        assert_eq!(
            player.source(),
            Some(&VideoSource::YouTube {
                id: "dQw4w9WgXcQ".into()
            })
        );
    }

    fn temp_video() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"\x00\x00\x00\x18ftypmp42").unwrap();
        file
    }

    #[test]
    fn second_local_file_revokes_first_url() {
        let (a, b) = (temp_video(), temp_video());
        let mut player = VideoPlayer::new();

        let first = match player.load_local_file(a.path()).unwrap() {
            VideoSource::Local { url, .. } => url.clone(),
            other => panic!("unexpected {other:?}"),
        };
        let second = match player.load_local_file(b.path()).unwrap() {
            VideoSource::Local { url, .. } => url.clone(),
            other => panic!("unexpected {other:?}"),
        };

        assert_ne!(first, second);
        assert!(player.objects().resolve(&first).is_none());
        assert_eq!(player.objects().resolve(&second), Some(b.path()));
        assert_eq!(player.objects().live_count(), 1);
        assert!(second.as_str().starts_with("blob:"));
    }

    #[test]
    fn switching_to_youtube_releases_local_url() {
        let file = temp_video();
        let mut player = VideoPlayer::new();
        player.load_local_file(file.path()).unwrap();
        player.load_youtube("dQw4w9WgXcQ").unwrap();
        assert_eq!(player.objects().live_count(), 0);
    }

    #[test]
    fn missing_file_is_rejected_without_state_change() {
        let mut player = VideoPlayer::new();
        assert!(player.load_local_file("/definitely/not/here.mp4").is_err());
        assert!(player.source().is_none());
        assert_eq!(player.objects().live_count(), 0);
    }

    #[test]
    fn directory_is_rejected_as_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = VideoPlayer::new();
        player.load_youtube("dQw4w9WgXcQ").unwrap();

        let err = player.load_local_file(dir.path()).unwrap_err();
        assert_eq!(err.kind(), "input");
        assert!(matches!(player.source(), Some(VideoSource::YouTube { .. })));
        assert_eq!(player.objects().live_count(), 0);
    }

    #[test]
    fn revoke_is_idempotent() {
        let mut registry = ObjectUrlRegistry::new();
        let url = registry.create(Path::new("/tmp/x.mp4"));
        assert!(registry.revoke(&url));
        assert!(!registry.revoke(&url));
    }
}
