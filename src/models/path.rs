// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coordinate and path types.
//!
//! Coordinates are `(longitude, latitude)` in WGS84 degrees, stored as
//! `geo::Coord` with `x = longitude` and `y = latitude`. That is the order
//! map renderers expect; the polyline wire format uses the opposite order,
//! and the swap happens only in `services::polyline_codec`.

use geo::{Coord, LineString};

/// A single `(longitude, latitude)` point.
pub type Coordinate = Coord<f64>;

/// An ordered route, possibly empty.
pub type Path = LineString<f64>;

/// Tolerance (degrees) under which a point is considered to sit on (0, 0).
pub const NULL_ISLAND_EPSILON: f64 = 1e-4;

/// Whether a coordinate is the (0, 0) signature of a failed decode.
pub fn is_null_island(coord: Coordinate) -> bool {
    coord.x.abs() < NULL_ISLAND_EPSILON && coord.y.abs() < NULL_ISLAND_EPSILON
}

/// A path made of one location repeated, used as a "marker" route when only
/// a point is known.
pub fn degenerate_path(coord: Coordinate) -> Path {
    LineString::new(vec![coord, coord])
}

/// Whether a path is exactly two identical points.
pub fn is_degenerate(path: &Path) -> bool {
    matches!(path.0.as_slice(), [a, b] if a == b)
}

/// Bring a longitude back into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
