mod edit;
mod hls;
mod list;
mod output;
mod video;

use std::sync::Arc;

use anyhow::{bail, Result};

use overlaykit::config::Config;
use overlaykit::{HttpOverlayStore, NoticeLevel, OverlayController, Point};

pub use edit::{build_draft, cmd_create, cmd_delete, cmd_drag, cmd_move};
pub use hls::cmd_hls;
pub use list::cmd_list;
pub use video::cmd_video;

/// Parse `X,Y` into a point.
pub fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{raw}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid X in '{raw}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid Y in '{raw}'"))?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("coordinates must be finite: '{raw}'"));
    }
    Ok(Point::new(x, y))
}

/// Controller over the configured HTTP store, with overlays loaded.
async fn connect(config: &Config) -> Result<OverlayController> {
    let store = Arc::new(HttpOverlayStore::with_config(&config.store_config())?);
    let mut controller = OverlayController::new(store);
    controller.refresh().await;
    flush_notices(&mut controller)?;
    Ok(controller)
}

/// Print queued notices to stderr; fail if any was an error.
fn flush_notices(controller: &mut OverlayController) -> Result<()> {
    let notices = controller.take_notices();
    let mut errors = 0;
    for notice in &notices {
        eprintln!("{notice}");
        if notice.level == NoticeLevel::Error {
            errors += 1;
        }
    }
    if errors > 0 {
        bail!("{errors} operation(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("10,20").unwrap(), Point::new(10.0, 20.0));
        assert_eq!(parse_point(" 1.5 , -3 ").unwrap(), Point::new(1.5, -3.0));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }
}
