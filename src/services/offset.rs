// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Privacy offset: a constant shift in Mercator space.
//!
//! The displacement `(dx, dy)` is derived once from the configured distance
//! and bearing, starting from a fixed reference latitude, and then added to
//! every projected point of every route. Mercator is conformal, so a constant
//! shift keeps each route's local shape and orientation; adding degree deltas
//! directly would stretch routes differently depending on their latitude.

use crate::models::{Coordinate, OffsetConfig, Path};
use geo::{Coord, LineString};
use std::f64::consts::FRAC_PI_4;

/// Mean Earth radius (km) for the spherical direct geodesic.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude at which distance/bearing is converted into a Mercator shift.
/// Shared by all routes so they all move by the same vector.
pub const REFERENCE_LATITUDE: f64 = 35.0;

/// Latitude clamp keeping Mercator `y` finite.
pub const MAX_MERCATOR_LATITUDE: f64 = 89.9;

/// Project longitude (degrees) to Mercator `x`.
pub fn mercator_x(lon: f64) -> f64 {
    lon.to_radians()
}

/// Project latitude (degrees) to Mercator `y`, clamping near the poles.
pub fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

pub fn inverse_mercator_x(x: f64) -> f64 {
    x.to_degrees()
}

pub fn inverse_mercator_y(y: f64) -> f64 {
    (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees()
}

/// Project a coordinate into Mercator space (radians-scaled).
pub fn project(coord: Coordinate) -> Coord<f64> {
    Coord {
        x: mercator_x(coord.x),
        y: mercator_y(coord.y),
    }
}

pub fn unproject(point: Coord<f64>) -> Coordinate {
    Coord {
        x: inverse_mercator_x(point.x),
        y: inverse_mercator_y(point.y),
    }
}

/// Point reached from `origin` after `distance_km` along the great circle
/// with initial `bearing_deg`, on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn destination(origin: Coordinate, distance_km: f64, bearing_deg: f64) -> Coordinate {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.y.to_radians();
    let lon1 = origin.x.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coord {
        x: lon2.to_degrees(),
        y: lat2.to_degrees(),
    }
}

/// A displacement vector in Mercator space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorShift {
    pub dx: f64,
    pub dy: f64,
}

impl MercatorShift {
    /// Shift corresponding to `config`, measured at [`REFERENCE_LATITUDE`].
    pub fn from_config(config: &OffsetConfig) -> Self {
        Self::at_latitude(config, REFERENCE_LATITUDE)
    }

    /// Shift corresponding to `config`, measured at `latitude`.
    pub fn at_latitude(config: &OffsetConfig, latitude: f64) -> Self {
        let origin = Coord { x: 0.0, y: latitude };
        let target = destination(origin, config.distance, config.bearing);

        let from = project(origin);
        let to = project(target);
        Self {
            dx: to.x - from.x,
            dy: to.y - from.y,
        }
    }

    /// Shift a single coordinate.
    pub fn apply_to(&self, coord: Coordinate) -> Coordinate {
        let projected = project(coord);
        unproject(Coord {
            x: projected.x + self.dx,
            y: projected.y + self.dy,
        })
    }

    /// Shift every point of a path. Empty paths stay empty.
    pub fn apply(&self, path: &Path) -> Path {
        LineString::new(path.coords().map(|&c| self.apply_to(c)).collect())
    }
}

/// Privacy offset transform holding its pre-computed shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrivacyOffsetTransform {
    config: OffsetConfig,
    shift: MercatorShift,
}

impl PrivacyOffsetTransform {
    pub fn new(config: OffsetConfig) -> Self {
        let shift = MercatorShift::from_config(&config);
        tracing::debug!(
            distance_km = config.distance,
            bearing = config.bearing,
            dx = shift.dx,
            dy = shift.dy,
            "Computed privacy offset"
        );
        Self { config, shift }
    }

    pub fn config(&self) -> &OffsetConfig {
        &self.config
    }

    pub fn shift(&self) -> MercatorShift {
        self.shift
    }

    /// Shift a path. A zero-length offset returns the path untouched, with
    /// no projection round trip.
    pub fn apply(&self, path: &Path) -> Path {
        if self.config.is_noop() {
            return path.clone();
        }
        self.shift.apply(path)
    }
}
