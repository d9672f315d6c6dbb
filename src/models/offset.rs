// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Privacy offset configuration.

use geo::{Bearing, Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Displacement applied uniformly to every published route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetConfig {
    /// Displacement distance in kilometers
    pub distance: f64,
    /// Bearing in degrees clockwise from north
    pub bearing: f64,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            distance: 234.56,
            bearing: 225.0,
        }
    }
}

impl OffsetConfig {
    pub fn new(distance: f64, bearing: f64) -> Self {
        Self { distance, bearing }
    }

    /// Offset that moves `from` onto `to`: great-circle distance and
    /// initial bearing between the two coordinates.
    pub fn between(from: Coord<f64>, to: Coord<f64>) -> Self {
        let from = Point::from(from);
        let to = Point::from(to);
        let distance_km = Haversine.distance(from, to) / 1000.0;
        let bearing = Haversine.bearing(from, to).rem_euclid(360.0);
        Self {
            distance: distance_km,
            bearing,
        }
    }

    /// A zero-length offset leaves every path where it is.
    pub fn is_noop(&self) -> bool {
        self.distance == 0.0
    }
}
