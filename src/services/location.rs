// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coordinate extraction from free-text `location_country` values.
//!
//! Some exporters dump a reverse-geocoding result into the location field,
//! e.g. `"{'latitude': 31.23, 'longitude': 121.47, ...}, 上海市, 中国"`.
//! When a route is missing or unusable, that point is the best we have.

use crate::models::Coordinate;
use geo::Coord;

const LATITUDE_KEY: &str = "'latitude': ";
const LONGITUDE_KEY: &str = "'longitude': ";

/// Find `'latitude': <float>` followed (anywhere later) by
/// `'longitude': <float>`. Both numbers must contain a decimal point.
pub fn extract_coordinate(text: &str) -> Option<Coordinate> {
    let lat_start = text.find(LATITUDE_KEY)? + LATITUDE_KEY.len();
    let (latitude, lat_len) = parse_decimal(&text[lat_start..])?;

    let rest = &text[lat_start + lat_len..];
    let lon_start = rest.find(LONGITUDE_KEY)? + LONGITUDE_KEY.len();
    let (longitude, _) = parse_decimal(&rest[lon_start..])?;

    Some(Coord {
        x: longitude,
        y: latitude,
    })
}

/// Parse a leading `-?\d+\.\d+` and return it with its byte length.
fn parse_decimal(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == int_start || bytes.get(end) != Some(&b'.') {
        return None;
    }
    end += 1;

    let frac_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == frac_start {
        return None;
    }

    s[..end].parse().ok().map(|value| (value, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_coordinate() {
        let text = "{'latitude': 31.23, 'city': 'x', 'longitude': 121.47}, 上海市, 中国";
        let coord = extract_coordinate(text).expect("coordinate present");
        assert_eq!(coord.x, 121.47);
        assert_eq!(coord.y, 31.23);
    }

    #[test]
    fn test_negative_values() {
        let coord =
            extract_coordinate("'latitude': -33.8688, 'longitude': -151.2093").expect("present");
        assert_eq!((coord.x, coord.y), (-151.2093, -33.8688));
    }

    #[test]
    fn test_missing_or_malformed() {
        assert!(extract_coordinate("上海市, 中国").is_none());
        assert!(extract_coordinate("'latitude': 31, 'longitude': 121.47").is_none());
        assert!(extract_coordinate("'longitude': 121.47, 'latitude': 31.23").is_none());
        assert!(extract_coordinate("'latitude': 31.23").is_none());
        assert!(extract_coordinate("").is_none());
    }
}
