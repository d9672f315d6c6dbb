// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch jobs over a whole dataset.
//!
//! Each job reads the configured input, runs every activity through the
//! pipeline and writes one output file. Per-activity problems are logged and
//! skipped; only I/O and encryption failures abort the run.

use chrono::Utc;

use crate::config::{Config, PipelineMode};
use crate::error::Result;
use crate::models::{Activity, ActivityStats};
use crate::services::{dataset, render, ActivityGeoPipeline};
use crate::time_utils::format_utc_rfc3339;

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub mode: PipelineMode,
    /// Activities read from the input
    pub total: usize,
    /// Activities that ended up with a route in the output
    pub with_route: usize,
}

/// Run the job selected by `config.mode`.
pub fn run(config: &Config) -> Result<JobSummary> {
    let activities = dataset::load_from_file(&config.input_path)?;
    let pipeline = ActivityGeoPipeline::from_config(config);
    let summary = run_on(config, &pipeline, &activities)?;

    tracing::info!(
        mode = ?summary.mode,
        total = summary.total,
        with_route = summary.with_route,
        "Job finished"
    );
    Ok(summary)
}

/// Run a job over already-loaded activities.
pub fn run_on(
    config: &Config,
    pipeline: &ActivityGeoPipeline,
    activities: &[Activity],
) -> Result<JobSummary> {
    let total = activities.len();
    let with_route = match config.mode {
        PipelineMode::Encrypt => {
            let protected = activities
                .iter()
                .map(|a| pipeline.protect_activity(a))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            dataset::write_json(&config.output_path, &protected)?;
            protected.iter().filter(|a| a.has_route()).count()
        }
        PipelineMode::Offset => {
            let shifted: Vec<Activity> = activities
                .iter()
                .map(|a| pipeline.offset_activity(a))
                .collect();
            dataset::write_json(&config.output_path, &shifted)?;
            shifted.iter().filter(|a| a.has_route()).count()
        }
        PipelineMode::GeoJson => {
            let collection =
                render::feature_collection(pipeline, activities, config.apply_privacy_offset);
            let center = render::view_center(&collection);
            tracing::info!(
                longitude = center.longitude,
                latitude = center.latitude,
                "Map view center"
            );
            let drawn = render::drawn_count(&collection);
            dataset::write_json(&config.output_path, &collection)?;
            drawn
        }
        PipelineMode::Stats => {
            let stats = ActivityStats::from_activities(activities, &format_utc_rfc3339(Utc::now()));
            tracing::info!(
                years = ?stats.years_desc(),
                moving_time_secs = stats.total_moving_time_secs,
                "Computed statistics"
            );
            dataset::write_json(&config.output_path, &stats)?;
            stats.activities_with_route as usize
        }
    };

    Ok(JobSummary {
        mode: config.mode,
        total,
        with_route,
    })
}
