// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GCJ-02 datum correction.
//!
//! Tracks recorded by apps that follow Chinese mapping regulations are stored
//! in GCJ-02, an obfuscated variant of WGS-84 offset by up to several hundred
//! meters. Drawing them over WGS-84 tiles needs the inverse transform. The
//! forward transform is a closed-form polynomial; the inverse is obtained by
//! fixed-point iteration on it.

use crate::models::{Coordinate, Path};
use geo::{Coord, LineString};
use std::f64::consts::PI;

/// Krasovsky 1940 semi-major axis (meters)
const A: f64 = 6_378_245.0;
/// Krasovsky 1940 first eccentricity squared
const EE: f64 = 0.006_693_421_622_965_943_23;

/// Convergence threshold for the inverse, in degrees.
const INVERSE_TOLERANCE: f64 = 1e-7;
const INVERSE_MAX_ITERATIONS: usize = 30;

/// Whether a coordinate lies in the region where GCJ-02 applies.
pub fn in_china(coord: Coordinate) -> bool {
    (72.004..=137.8347).contains(&coord.x) && (0.8293..=55.8271).contains(&coord.y)
}

fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

fn transform_lon(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// GCJ-02 offset `(dlon, dlat)` in degrees at a WGS-84 coordinate.
fn gcj_delta(coord: Coordinate) -> Coord<f64> {
    let dlat = transform_lat(coord.x - 105.0, coord.y - 35.0);
    let dlon = transform_lon(coord.x - 105.0, coord.y - 35.0);

    let rad_lat = coord.y.to_radians();
    let magic = 1.0 - EE * rad_lat.sin() * rad_lat.sin();
    let sqrt_magic = magic.sqrt();

    Coord {
        x: (dlon * 180.0) / (A / sqrt_magic * rad_lat.cos() * PI),
        y: (dlat * 180.0) / ((A * (1.0 - EE)) / (magic * sqrt_magic) * PI),
    }
}

/// WGS-84 → GCJ-02. Coordinates outside China are returned unchanged.
pub fn wgs84_to_gcj02(coord: Coordinate) -> Coordinate {
    if !in_china(coord) {
        return coord;
    }
    coord + gcj_delta(coord)
}

/// GCJ-02 → WGS-84. Coordinates outside China are returned unchanged.
pub fn gcj02_to_wgs84(coord: Coordinate) -> Coordinate {
    if !in_china(coord) {
        return coord;
    }

    let mut wgs = coord - gcj_delta(coord);
    for _ in 0..INVERSE_MAX_ITERATIONS {
        let error = wgs84_to_gcj02(wgs) - coord;
        if error.x.abs() < INVERSE_TOLERANCE && error.y.abs() < INVERSE_TOLERANCE {
            break;
        }
        wgs = wgs - error;
    }
    wgs
}

/// Correct every point of a GCJ-02 path to WGS-84.
pub fn correct_path(path: &Path) -> Path {
    LineString::new(path.coords().map(|&c| gcj02_to_wgs84(c)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_outside_china_passthrough() {
        let sf = coord! { x: -122.4194, y: 37.7749 };
        assert_eq!(wgs84_to_gcj02(sf), sf);
        assert_eq!(gcj02_to_wgs84(sf), sf);
    }

    #[test]
    fn test_forward_offset_magnitude() {
        // Shanghai: GCJ-02 shifts by a few hundred meters (~0.002-0.005 deg)
        let wgs = coord! { x: 121.47, y: 31.23 };
        let gcj = wgs84_to_gcj02(wgs);
        let dx = gcj.x - wgs.x;
        let dy = gcj.y - wgs.y;
        assert!(dx > 0.001 && dx < 0.01, "dx {}", dx);
        assert!(dy.abs() > 0.0005 && dy.abs() < 0.01, "dy {}", dy);
    }

    #[test]
    fn test_inverse_round_trip() {
        for wgs in [
            coord! { x: 121.47, y: 31.23 },
            coord! { x: 116.397, y: 39.908 },
            coord! { x: 104.066, y: 30.572 },
        ] {
            let back = gcj02_to_wgs84(wgs84_to_gcj02(wgs));
            assert!((back.x - wgs.x).abs() < 1e-6, "{:?} vs {:?}", back, wgs);
            assert!((back.y - wgs.y).abs() < 1e-6, "{:?} vs {:?}", back, wgs);
        }
    }

    #[test]
    fn test_correct_path_keeps_length() {
        let path: Path = vec![
            coord! { x: 121.47, y: 31.23 },
            coord! { x: 121.48, y: 31.24 },
        ]
        .into();
        let corrected = correct_path(&path);
        assert_eq!(corrected.0.len(), 2);
        assert_ne!(corrected.0[0], path.0[0]);
    }
}
