//! PopupGallery - terminal host for the gallery engine
//!
//! Renders nothing: every surface call is logged, and input is read as
//! line commands from stdin.

mod shell;
mod surface;

use anyhow::{Context, Result};
use gallery_core::{FileConfigSource, GalleryTuning, GalleryWidget, InitOptions};
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    gallery_log::init()?;

    // Clean up old logs (7 days)
    if let Err(e) = gallery_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("PopupGallery starting...");

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .context("usage: popup_gallery <config.json> [height]")?;
    let options = match args.next() {
        Some(height) => InitOptions::default().with_height(&height),
        None => InitOptions::default(),
    };

    let tuning = GalleryTuning::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load tuning, using defaults: {}", e);
        GalleryTuning::default()
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gallery-worker")
        .build()?;

    runtime.block_on(async move {
        let widget = GalleryWidget::new(Arc::new(surface::LogSurface), tuning);
        widget
            .initialize(&FileConfigSource::new(&config_path), options)
            .await?;
        widget.open()?;
        shell::run(&widget).await
    })?;

    tracing::info!("PopupGallery exiting");
    Ok(())
}
