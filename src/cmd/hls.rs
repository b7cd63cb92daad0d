use anyhow::Result;

use overlaykit::{HlsConfig, HlsConverter};

pub async fn cmd_hls(url: &str, config: HlsConfig, dry_run: bool) -> Result<()> {
    let converter = HlsConverter::new(config);

    if dry_run {
        let args = converter.build_args(url)?;
        println!("{} {}", converter.ffmpeg_path(), args.join(" "));
        return Ok(());
    }

    eprintln!("🚀 Converting {url} to HLS...");
    eprintln!("📁 Output: {}", converter.playlist_path().display());

    let mut process = converter.start(url).await?;
    eprintln!("⏳ Stream conversion started (Ctrl-C to stop)");

    tokio::select! {
        result = process.wait() => {
            result?;
            eprintln!("✅ Stream ended.");
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n🛑 Stopping stream conversion...");
            process.stop().await?;
            eprintln!("✅ Stream stopped.");
        }
    }

    Ok(())
}
