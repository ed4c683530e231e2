//! Library entry for envrec-cli used by integration tests and embedding.

pub mod handlers;

use anyhow::{Context, Result};
use envrec_core::constants::{GROUND_STEERING_REQUEST, IMAGE_READING};
use envrec_core::{replay, Dispatcher, FrameReader, ReplayStats};
use std::fs::File;
use std::path::Path;

/// Replay one recording with the standard handlers registered
///
/// Opening the file is the only fatal failure; everything else is counted
/// in the returned stats.
pub fn run(recording: &Path) -> Result<ReplayStats> {
    let file = File::open(recording)
        .with_context(|| format!("Failed to open recording: {}", recording.display()))?;

    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(
            GROUND_STEERING_REQUEST,
            handlers::GroundSteeringPrinter::default(),
        )
        .register(IMAGE_READING, handlers::ImageInspector::default());

    let stats = replay(FrameReader::new(file), &mut dispatcher)
        .with_context(|| format!("Failed reading recording: {}", recording.display()))?;

    Ok(stats)
}
