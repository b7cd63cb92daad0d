//! `overlaykit` CLI - manage and position video overlays against an overlay API

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use overlaykit::config::Config;
use overlaykit::{OverlayKind, Point};

#[derive(Parser)]
#[command(name = "overlaykit")]
#[command(about = "Create, position and delete video overlays stored behind a REST API")]
#[command(version)]
struct Cli {
    /// Overlay API base URL (overrides config and OVERLAYKIT_API_URL)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for listings
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per overlay
    #[default]
    Text,
    /// Raw JSON records
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored overlays
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Create an overlay
    Create {
        /// Overlay type (text or image)
        #[arg(long = "type", default_value = "text")]
        kind: OverlayKind,

        /// Display text (or alt text for images)
        #[arg(short, long, default_value = "LIVE")]
        content: String,

        /// Image URL (required for image overlays)
        #[arg(long)]
        image_url: Option<String>,

        #[arg(long, default_value = "50")]
        x: f64,

        #[arg(long, default_value = "50")]
        y: f64,

        #[arg(long, default_value = "200")]
        width: f64,

        #[arg(long, default_value = "60")]
        height: f64,

        /// CSS font size, e.g. 24px
        #[arg(long)]
        font_size: Option<String>,

        /// CSS text color, e.g. #FFFFFF
        #[arg(long)]
        color: Option<String>,

        /// CSS background color
        #[arg(long)]
        background: Option<String>,
    },

    /// Move an overlay to a position (clamped to the container)
    Move {
        /// Overlay ID
        id: String,
        x: f64,
        y: f64,
    },

    /// Replay a pointer drag on an overlay; saves once on release
    Drag {
        /// Overlay ID
        id: String,

        /// Pointer-down point inside the container, as X,Y
        #[arg(long, value_parser = cmd::parse_point)]
        grab: Point,

        /// Pointer-move points, as X,Y (repeatable)
        #[arg(long = "to", value_parser = cmd::parse_point, required = true)]
        to: Vec<Point>,
    },

    /// Delete an overlay
    Delete {
        /// Overlay ID
        id: String,
    },

    /// Resolve a YouTube URL/ID or local file to a player URL
    Video {
        /// YouTube URL, 11-character video ID, or path to a local video
        source: String,
    },

    /// Convert an RTSP stream to HLS with ffmpeg
    Hls {
        /// RTSP URL (rtsp:// or rtsps://)
        url: String,

        /// Output directory for the playlist and segments
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,

        /// Segment duration in seconds
        #[arg(short, long)]
        segment: Option<u32>,

        /// Print the ffmpeg command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = Config::load()?;
    if let Some(api) = cli.api {
        config.api_url = api;
    }

    match cli.command {
        Commands::List { format } => cmd::cmd_list(&config, format).await?,
        Commands::Create {
            kind,
            content,
            image_url,
            x,
            y,
            width,
            height,
            font_size,
            color,
            background,
        } => {
            let draft = cmd::build_draft(
                kind,
                content,
                image_url,
                Point::new(x, y),
                overlaykit::Size::new(width, height),
                font_size,
                color,
                background,
            );
            cmd::cmd_create(&config, &draft).await?;
        }
        Commands::Move { id, x, y } => cmd::cmd_move(&config, &id, Point::new(x, y)).await?,
        Commands::Drag { id, grab, to } => cmd::cmd_drag(&config, &id, grab, &to).await?,
        Commands::Delete { id } => cmd::cmd_delete(&config, &id).await?,
        Commands::Video { source } => cmd::cmd_video(&source)?,
        Commands::Hls {
            url,
            out,
            segment,
            dry_run,
        } => {
            let mut hls = config.hls_config();
            if let Some(dir) = out {
                hls.output_dir = dir;
            }
            if let Some(secs) = segment {
                hls.segment_secs = secs;
            }
            cmd::cmd_hls(&url, hls, dry_run).await?;
        }
    }

    Ok(())
}
