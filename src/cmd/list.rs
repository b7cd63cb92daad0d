use anyhow::Result;

use overlaykit::config::Config;

use super::connect;
use super::output::output_overlays;
use crate::OutputFormat;

pub async fn cmd_list(config: &Config, format: OutputFormat) -> Result<()> {
    let controller = connect(config).await?;
    if controller.tracked().is_empty() && matches!(format, OutputFormat::Text) {
        println!("No overlays yet. Create one with `overlaykit create`.");
        return Ok(());
    }
    output_overlays(controller.tracked(), format)
}
