use std::path::Path;

use anyhow::Result;

use overlaykit::{VideoPlayer, VideoSource};

pub fn cmd_video(source: &str) -> Result<()> {
    let mut player = VideoPlayer::new();

    let loaded = if Path::new(source).is_file() {
        player.load_local_file(source)
    } else {
        player.load_youtube(source)
    };

    match loaded {
        Ok(VideoSource::YouTube { id }) => {
            println!("🎬 YouTube video: {id}");
            println!("{}", overlaykit::video::youtube_embed_url(id));
        }
        Ok(VideoSource::Local { url, path }) => {
            println!("📁 Local video: {}", path.display());
            println!("{url}");
        }
        Err(err) => {
            eprintln!("❌ {err}");
            return Err(err.into());
        }
    }
    Ok(())
}
