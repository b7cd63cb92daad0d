//! RTSP → HLS conversion through an `ffmpeg` subprocess.
//!
//! Browsers cannot play RTSP, so a camera feed is re-encoded into a rolling
//! HLS playlist (`stream.m3u8` plus `segment_NNN.ts`) that any player can load
//! as the video under the overlays. Only the last five segments are kept.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::{OverlayError, Result};

/// Playlist file name inside the output directory.
pub const PLAYLIST_NAME: &str = "stream.m3u8";

/// HLS conversion settings.
#[derive(Debug, Clone)]
pub struct HlsConfig {
    /// Directory that receives the playlist and segments
    pub output_dir: PathBuf,
    /// Target duration of each `.ts` segment, in seconds
    pub segment_secs: u32,
    /// Segments kept in the rolling playlist
    pub list_size: u32,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("hls_streams"),
            segment_secs: 4,
            list_size: 5,
        }
    }
}

/// ffmpeg-based RTSP to HLS converter
pub struct HlsConverter {
    /// Path to ffmpeg binary
    ffmpeg_path: String,
    config: HlsConfig,
}

impl HlsConverter {
    /// Create a converter, searching for `ffmpeg` in PATH
    #[must_use]
    pub fn new(config: HlsConfig) -> Self {
        let ffmpeg_path = which::which("ffmpeg")
            .map_or_else(|_| "ffmpeg".to_string(), |p| p.to_string_lossy().to_string());
        Self {
            ffmpeg_path,
            config,
        }
    }

    /// Specify custom ffmpeg binary path
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: &str) -> Self {
        self.ffmpeg_path = path.to_string();
        self
    }

    #[must_use]
    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    /// Where the playlist will be written.
    #[must_use]
    pub fn playlist_path(&self) -> PathBuf {
        self.config.output_dir.join(PLAYLIST_NAME)
    }

    /// Build ffmpeg command arguments
    pub fn build_args(&self, rtsp_url: &str) -> Result<Vec<String>> {
        validate_rtsp_url(rtsp_url)?;
        if self.config.segment_secs == 0 {
            return Err(OverlayError::InvalidInput(
                "segment duration must be at least 1 second".to_string(),
            ));
        }

        let segments = self.config.output_dir.join("segment_%03d.ts");
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "warning",
            // TCP transport for stability
            "-rtsp_transport",
            "tcp",
            "-i",
        ]
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
        args.push(rtsp_url.to_string());

        args.extend(
            [
                "-c:v", "libx264",
                "-c:a", "aac",
                "-f", "hls",
            ]
            .iter()
            .map(std::string::ToString::to_string),
        );
        args.push("-hls_time".to_string());
        args.push(self.config.segment_secs.to_string());
        args.push("-hls_list_size".to_string());
        args.push(self.config.list_size.to_string());
        // Drop segments that fell out of the playlist
        args.push("-hls_flags".to_string());
        args.push("delete_segments".to_string());
        args.push("-hls_segment_filename".to_string());
        args.push(path_arg(&segments));
        args.push(path_arg(&self.playlist_path()));

        Ok(args)
    }

    /// Create the output directory and launch ffmpeg.
    pub async fn start(&self, rtsp_url: &str) -> Result<HlsProcess> {
        let args = self.build_args(rtsp_url)?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        debug!("Running: {} {}", self.ffmpeg_path, args.join(" "));
        info!(
            source = rtsp_url,
            playlist = %self.playlist_path().display(),
            "Starting RTSP to HLS conversion"
        );

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                OverlayError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to spawn {}: {e}", self.ffmpeg_path),
                ))
            })?;

        Ok(HlsProcess {
            child,
            playlist: self.playlist_path(),
        })
    }
}

/// A running conversion.
pub struct HlsProcess {
    child: Child,
    playlist: PathBuf,
}

impl HlsProcess {
    #[must_use]
    pub fn playlist(&self) -> &Path {
        &self.playlist
    }

    /// Wait until ffmpeg exits on its own (stream ended or failed).
    pub async fn wait(&mut self) -> Result<()> {
        let status = self.child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(OverlayError::Io(std::io::Error::other(format!(
                "ffmpeg exited with {status}"
            ))))
        }
    }

    /// Terminate the conversion.
    pub async fn stop(mut self) -> Result<()> {
        if let Err(e) = self.child.kill().await {
            warn!("Failed to stop ffmpeg: {e}");
            return Err(e.into());
        }
        info!("Stream conversion stopped");
        Ok(())
    }
}

fn validate_rtsp_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| OverlayError::InvalidInput(format!("invalid RTSP URL '{raw}': {e}")))?;
    match parsed.scheme() {
        "rtsp" | "rtsps" if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(OverlayError::InvalidInput(format!(
            "expected an rtsp:// URL, got '{raw}'"
        ))),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> HlsConverter {
        HlsConverter::new(HlsConfig {
            output_dir: PathBuf::from("out"),
            ..HlsConfig::default()
        })
        .with_ffmpeg_path("/usr/bin/ffmpeg")
    }

    #[test]
    fn args_follow_rolling_playlist_layout() {
        let args = converter().build_args("rtsp://cam.local:554/live").unwrap();
        let joined = args.join(" ");
        assert!(joined.contains("-rtsp_transport tcp -i rtsp://cam.local:554/live"));
        assert!(joined.contains("-c:v libx264 -c:a aac -f hls"));
        assert!(joined.contains("-hls_time 4"));
        assert!(joined.contains("-hls_list_size 5"));
        assert!(joined.contains("-hls_flags delete_segments"));

        let seg = args.iter().position(|a| a == "-hls_segment_filename").unwrap();
        assert_eq!(Path::new(&args[seg + 1]), Path::new("out").join("segment_%03d.ts"));
        assert_eq!(Path::new(args.last().unwrap()), Path::new("out").join("stream.m3u8"));
    }

    #[test]
    fn custom_segment_duration() {
        let conv = HlsConverter::new(HlsConfig {
            segment_secs: 2,
            ..HlsConfig::default()
        });
        let args = conv.build_args("rtsps://example.com/stream2").unwrap();
        let i = args.iter().position(|a| a == "-hls_time").unwrap();
        assert_eq!(args[i + 1], "2");
    }

    #[test]
    fn rejects_non_rtsp_sources() {
        for url in ["https://example.com/a.m3u8", "not a url", "rtsp://"] {
            assert!(
                matches!(converter().build_args(url), Err(OverlayError::InvalidInput(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn rejects_zero_segment_duration() {
        let conv = HlsConverter::new(HlsConfig {
            segment_secs: 0,
            ..HlsConfig::default()
        });
        assert!(conv.build_args("rtsp://cam/live").is_err());
    }

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let conv = HlsConverter::new(HlsConfig {
            output_dir: dir.path().join("hls"),
            ..HlsConfig::default()
        })
        .with_ffmpeg_path("/nonexistent/ffmpeg-binary");
        let err = conv.start("rtsp://cam/live").await.err().unwrap();
        assert!(matches!(err, OverlayError::Io(_)));
        // Output directory is prepared before launch.
        assert!(dir.path().join("hls").is_dir());
    }
}
