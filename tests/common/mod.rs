// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::path::PathBuf;

use geo::Coord;
use workouts_privacy::models::{Activity, OffsetConfig, Path};
use workouts_privacy::services::{dataset, ActivityGeoPipeline, CipherScheme, CoordinateObfuscator};

/// Key shared by the test pipelines.
#[allow(dead_code)]
pub const TEST_KEY: &str = "key123";

/// Load the sample dataset committed under tests/fixtures.
#[allow(dead_code)]
pub fn sample_activities() -> Vec<Activity> {
    dataset::load_from_file("tests/fixtures/activities_sample.json")
        .expect("Failed to load sample activities - is tests/fixtures committed?")
}

/// Pipeline with the test key and the site's default offset.
#[allow(dead_code)]
pub fn test_pipeline(scheme: CipherScheme) -> ActivityGeoPipeline {
    ActivityGeoPipeline::new(
        CoordinateObfuscator::new(TEST_KEY, scheme),
        OffsetConfig::default(),
    )
}

/// Fresh scratch directory for a test.
#[allow(dead_code)]
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "workouts-privacy-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

/// Assert two paths match point by point within `tolerance` degrees.
#[allow(dead_code)]
pub fn assert_paths_close(actual: &Path, expected: &[Coord<f64>], tolerance: f64) {
    assert_eq!(
        actual.0.len(),
        expected.len(),
        "path length mismatch: {:?}",
        actual
    );
    for (a, e) in actual.coords().zip(expected) {
        assert!(
            (a.x - e.x).abs() <= tolerance && (a.y - e.y).abs() <= tolerance,
            "{:?} not within {} of {:?}",
            a,
            tolerance,
            e
        );
    }
}
