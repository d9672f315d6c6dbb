// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests for the activity geo pipeline.
//!
//! These tests go through the public API the same way the build jobs do:
//! encrypt a route, hand the record to the pipeline, and check what comes
//! out for rendering.

use geo::coord;
use workouts_privacy::models::path::is_degenerate;
use workouts_privacy::models::{Activity, Path};
use workouts_privacy::services::{polyline_codec, CipherScheme};

mod common;
use common::{assert_paths_close, sample_activities, test_pipeline};

fn activity_with(polyline: Option<&str>, location: Option<&str>) -> Activity {
    let json = serde_json::json!({
        "run_id": 42,
        "name": "Test",
        "distance": 1500.0,
        "moving_time": "0:08:00",
        "type": "Run",
        "start_date": "2024-01-15 02:00:00",
        "start_date_local": "2024-01-15 10:00:00",
        "summary_polyline": polyline,
        "location_country": location,
        "average_speed": 3.1,
        "streak": 1
    });
    serde_json::from_value(json).expect("valid activity")
}

#[test]
fn test_encrypted_route_end_to_end() {
    let expected = [coord! { x: 121.47, y: 31.23 }, coord! { x: 121.48, y: 31.24 }];
    let route: Path = expected.to_vec().into();

    for scheme in [CipherScheme::BlockCipher, CipherScheme::XorBase64] {
        let pipeline = test_pipeline(scheme);
        let encoded = polyline_codec::encode(&route).expect("encodes");
        let ciphertext = pipeline.obfuscator().protect(&encoded).expect("protects");

        let activity = activity_with(Some(&ciphertext), None);
        let path = pipeline.renderable_path_for(&activity, false);
        assert_paths_close(&path, &expected, 1e-5);

        let reencoded = pipeline
            .encoded_path_for(&activity, false)
            .expect("route present");
        assert_eq!(reencoded, encoded);
    }
}

#[test]
fn test_location_fallback_without_polyline() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let activity = activity_with(
        None,
        Some("{'country': 'CN', 'latitude': 31.23, 'city': 'Shanghai', 'longitude': 121.47}"),
    );

    let path = pipeline.renderable_path_for(&activity, false);
    assert_eq!(path.0, vec![coord! { x: 121.47, y: 31.23 }; 2]);
    assert!(is_degenerate(&path));
}

#[test]
fn test_empty_string_polyline_treated_as_missing() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let activity = activity_with(Some(""), Some("'latitude': 31.23, 'longitude': 121.47"));

    let path = pipeline.renderable_path_for(&activity, false);
    assert_eq!(path.0.len(), 2);
}

#[test]
fn test_no_geodata_means_no_route() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let activity = activity_with(None, Some("上海市, 中国"));

    assert!(pipeline.renderable_path_for(&activity, true).0.is_empty());
}

#[test]
fn test_corrupted_polyline_falls_back_to_location() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let activity = activity_with(
        Some("this is not a polyline"),
        Some("'latitude': 31.23, 'longitude': 121.47"),
    );

    let path = pipeline.renderable_path_for(&activity, false);
    assert_eq!(path.0, vec![coord! { x: 121.47, y: 31.23 }; 2]);
}

#[test]
fn test_null_island_first_point_rejected() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let bogus: Path = vec![
        coord! { x: 0.00001, y: -0.00002 },
        coord! { x: 121.47, y: 31.23 },
    ]
    .into();
    let encoded = polyline_codec::encode(&bogus).unwrap();
    let ciphertext = pipeline.obfuscator().protect(&encoded).unwrap();

    let activity = activity_with(Some(&ciphertext), Some("'latitude': 30.5, 'longitude': 120.5"));
    let path = pipeline.renderable_path_for(&activity, false);
    assert_eq!(path.0, vec![coord! { x: 120.5, y: 30.5 }; 2]);

    let without_location = activity_with(Some(&ciphertext), None);
    assert!(pipeline
        .renderable_path_for(&without_location, false)
        .0
        .is_empty());
}

#[test]
fn test_privacy_offset_moves_every_route_by_same_vector() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let shift = pipeline.offset().shift();

    for activity in sample_activities() {
        let truth = pipeline.renderable_path_for(&activity, false);
        let shown = pipeline.renderable_path_for(&activity, true);
        assert_eq!(truth.0.len(), shown.0.len());

        for (t, s) in truth.coords().zip(shown.coords()) {
            let dx = s.x.to_radians() - t.x.to_radians();
            let dy = workouts_privacy::services::offset::mercator_y(s.y)
                - workouts_privacy::services::offset::mercator_y(t.y);
            assert!((dx - shift.dx).abs() < 1e-9, "run {}", activity.run_id);
            assert!((dy - shift.dy).abs() < 1e-9, "run {}", activity.run_id);
        }
    }
}

#[test]
fn test_sample_dataset_paths() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);
    let activities = sample_activities();

    let lengths: Vec<usize> = activities
        .iter()
        .map(|a| pipeline.renderable_path_for(a, false).0.len())
        .collect();

    // loop, ride, hike, location-only treadmill run, swim without geodata
    assert_eq!(lengths, vec![21, 30, 15, 2, 0]);
}

#[test]
fn test_protected_dataset_renders_identically() {
    let pipeline = test_pipeline(CipherScheme::BlockCipher);

    for activity in sample_activities() {
        let protected = pipeline.protect_activity(&activity).expect("protects");
        if let Some(polyline) = activity.summary_polyline.as_deref() {
            assert_ne!(protected.summary_polyline.as_deref(), Some(polyline));
        }

        assert_eq!(
            pipeline.renderable_path_for(&protected, true),
            pipeline.renderable_path_for(&activity, true),
            "run {}",
            activity.run_id
        );
    }
}
