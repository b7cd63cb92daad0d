use anyhow::{bail, Result};

use overlaykit::config::Config;
use overlaykit::{OverlayDraft, OverlayKind, OverlayStyle, Point, PointerDown, Size};

use super::output::print_overlay;
use super::{connect, flush_notices};

#[allow(clippy::too_many_arguments)]
pub fn build_draft(
    kind: OverlayKind,
    content: String,
    image_url: Option<String>,
    position: Point,
    size: Size,
    font_size: Option<String>,
    color: Option<String>,
    background: Option<String>,
) -> OverlayDraft {
    let defaults = OverlayStyle::live_badge();
    OverlayDraft {
        kind,
        content,
        image_url: image_url.unwrap_or_default(),
        position,
        size,
        style: OverlayStyle {
            font_size: font_size.or(defaults.font_size),
            color: color.or(defaults.color),
            background_color: background.or(defaults.background_color),
        },
    }
}

pub async fn cmd_create(config: &Config, draft: &OverlayDraft) -> Result<()> {
    let mut controller = connect(config).await?;
    let created = controller.create_overlay(draft).await;
    flush_notices(&mut controller)?;
    if let Some(overlay) = created {
        print_overlay(&overlay);
    }
    Ok(())
}

pub async fn cmd_move(config: &Config, id: &str, target: Point) -> Result<()> {
    let mut controller = connect(config).await?;
    let Some(size) = controller.get(id).map(|t| t.overlay().size) else {
        bail!("Overlay not found: {id}");
    };

    let position = config.container().clamp(target, size);
    if position != target {
        eprintln!(
            "📐 Clamped ({}, {}) → ({}, {}) to fit {}x{} container",
            target.x, target.y, position.x, position.y, config.container.width, config.container.height
        );
    }

    controller.persist_position(id, position).await;
    flush_notices(&mut controller)?;
    println!("✅ {id} saved at ({}, {})", position.x, position.y);
    Ok(())
}

/// Replays a drag in container coordinates: the container is anchored at the
/// client origin, so `grab` and `to` points are container-relative.
pub async fn cmd_drag(config: &Config, id: &str, grab: Point, to: &[Point]) -> Result<()> {
    let mut controller = connect(config).await?;
    let Some(origin) = controller.get(id).map(|t| t.overlay().position) else {
        bail!("Overlay not found: {id}");
    };

    let container = config.container();
    if !controller.start_drag(id, PointerDown::primary(grab.x, grab.y), origin) {
        bail!("Could not start drag on {id}");
    }
    for pointer in to {
        if let Some(p) = controller.update_drag(*pointer, &container) {
            eprintln!("   → ({}, {})", p.x, p.y);
        }
    }

    let saved = controller.finish_drag().await;
    flush_notices(&mut controller)?;
    if let Some(tracked) = controller.get(id).filter(|_| saved) {
        let p = tracked.overlay().position;
        println!("✅ {id} dropped at ({}, {})", p.x, p.y);
    }
    Ok(())
}

pub async fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    let mut controller = connect(config).await?;
    controller.delete_overlay(id).await;
    flush_notices(&mut controller)
}
