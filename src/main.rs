// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workouts-Privacy build tool
//!
//! Runs one batch job over the exported activities: encrypt the dataset,
//! bake the privacy offset into it, or emit GeoJSON / statistics for the
//! site. The job and its inputs come from the environment.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workouts_privacy::{config::Config, jobs};

fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        mode = ?config.mode,
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        scheme = %config.cipher_scheme,
        offset_km = config.map_offset.distance,
        bearing = config.map_offset.bearing,
        fix_gcj02 = config.fix_gcj02,
        "Starting workouts-privacy"
    );

    if let Err(err) = jobs::run(&config) {
        tracing::error!(kind = err.kind(), error = %err, "Job failed");
        return Err(err.into());
    }
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("workouts_privacy=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
