use anyhow::Result;

use overlaykit::{Overlay, OverlayKind, SyncState, TrackedOverlay};

use crate::OutputFormat;

pub fn print_overlay(overlay: &Overlay) {
    println!(
        "{}  {:<5}  {:>7.1},{:<7.1} {:>5}x{:<5}  {}",
        overlay.id,
        overlay.kind,
        overlay.position.x,
        overlay.position.y,
        overlay.size.width,
        overlay.size.height,
        truncate_text(overlay.label(), 40)
    );
}

pub fn output_overlays(tracked: &[TrackedOverlay], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let overlays: Vec<&Overlay> = tracked.iter().map(TrackedOverlay::overlay).collect();
            println!("{}", serde_json::to_string_pretty(&overlays)?);
        }
        OutputFormat::Text => {
            for t in tracked {
                print_overlay(t.overlay());
                if let SyncState::Failed { reason, .. } = t.sync() {
                    println!("    ⚠️  unsaved: {reason}");
                }
            }
            let images = tracked
                .iter()
                .filter(|t| t.overlay().kind == OverlayKind::Image)
                .count();
            println!("\n({} overlays, {images} images)", tracked.len());
        }
    }
    Ok(())
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 3).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("ääääääääää", 6), "äää...");
    }
}
