// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Encoded polyline codec (Google/Mapbox algorithm, precision 5).
//!
//! The wire format stores each point as `(latitude, longitude)`. Paths in
//! this crate are `(longitude, latitude)` (`x`, `y`), which is also what the
//! `polyline` crate hands back, so this module is the one place where the
//! two orders meet. Call sites that work with raw `(lat, lon)` pairs must
//! swap explicitly; see [`from_lat_lon_pairs`].

use crate::models::{Coordinate, Path};
use geo::LineString;

/// Fixed-point precision used by Strava exports and Mapbox decoders.
pub const PRECISION: u32 = 5;

/// Encode a path as a polyline string.
pub fn encode(path: &Path) -> Result<String, CodecError> {
    polyline::encode_coordinates(path.coords().copied(), PRECISION)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a polyline string, reporting malformed input.
pub fn try_decode(encoded: &str) -> Result<Path, CodecError> {
    polyline::decode_polyline(encoded, PRECISION).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Decode a polyline string. Malformed input yields an empty path so the
/// caller can fall back to a location-derived point.
pub fn decode(encoded: &str) -> Path {
    match try_decode(encoded) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, len = encoded.len(), "Polyline decode failed");
            LineString::new(Vec::new())
        }
    }
}

/// Build a path from `(latitude, longitude)` pairs, as produced by most
/// polyline libraries and GPX tooling.
pub fn from_lat_lon_pairs(pairs: &[(f64, f64)]) -> Path {
    pairs
        .iter()
        .map(|&(lat, lon)| Coordinate { x: lon, y: lat })
        .collect()
}

/// Errors from the polyline codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to encode polyline: {0}")]
    Encode(String),

    #[error("Failed to decode polyline: {0}")]
    Decode(String),
}
