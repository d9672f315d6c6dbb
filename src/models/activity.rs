// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout activity record as found in the exported `activities.json`.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time_utils::parse_local_timestamp;

/// Distance (meters) at or above which a run counts as a full marathon.
const FULL_MARATHON_METERS: f64 = 40_000.0;
/// Distance (meters) above which a run counts as a half marathon.
const HALF_MARATHON_METERS: f64 = 20_000.0;

/// One exercise record.
///
/// Field names match the JSON export exactly. Anything else present on a
/// record is kept in `extra` so that rewriting a dataset does not drop it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity ID
    pub run_id: u64,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time, "H:MM:SS" or "N days, H:MM:SS"
    #[serde(default)]
    pub moving_time: String,
    /// Sport type (Run, Ride, Hike, Swim, etc.)
    #[serde(rename = "type", default)]
    pub sport_type: String,
    /// Start date/time, UTC
    #[serde(default)]
    pub start_date: String,
    /// Start date/time, local
    #[serde(default)]
    pub start_date_local: String,
    /// Free-text location, possibly with an embedded coordinate
    #[serde(default)]
    pub location_country: Option<String>,
    /// Encoded (and possibly encrypted) route
    #[serde(default)]
    pub summary_polyline: Option<String>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    #[serde(default)]
    pub average_speed: f64,
    /// Consecutive-day counter
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields we do not model, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Activity {
    /// Whether the record carries any route data at all.
    pub fn has_route(&self) -> bool {
        self.summary_polyline
            .as_deref()
            .is_some_and(|p| !p.is_empty())
    }

    /// Sport type with long runs promoted to "Full Marathon" / "Half Marathon".
    pub fn display_type(&self) -> &str {
        match self.sport_type.as_str() {
            "Run" | "Trail Run" if self.distance >= FULL_MARATHON_METERS => "Full Marathon",
            "Run" | "Trail Run" if self.distance > HALF_MARATHON_METERS => "Half Marathon",
            other => other,
        }
    }

    /// Moving time in seconds. Unparseable values count as zero.
    pub fn moving_time_secs(&self) -> u64 {
        parse_moving_time(&self.moving_time).unwrap_or(0)
    }

    /// Parsed `start_date_local`.
    pub fn local_start(&self) -> Option<NaiveDateTime> {
        parse_local_timestamp(&self.start_date_local)
    }

    pub fn year(&self) -> Option<i32> {
        self.local_start().map(|d| d.year())
    }
}

/// Parse "12:34:56" or "2 days, 12:34:56" into seconds.
fn parse_moving_time(moving_time: &str) -> Option<u64> {
    let moving_time = moving_time.trim();
    if moving_time.is_empty() {
        return None;
    }

    let (days, clock) = match moving_time.split_once(", ") {
        Some((days_part, clock)) => {
            let days = days_part.split_whitespace().next()?.parse::<u64>().ok()?;
            (days, clock)
        }
        None => (0, moving_time),
    };

    // Some exports carry fractional seconds ("0:25:13.500000")
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(((days * 24 + hours) * 60 + minutes) * 60 + seconds.floor() as u64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_activity(id: u64, sport: &str, distance: f64) -> Activity {
        Activity {
            run_id: id,
            name: format!("Test Activity {}", id),
            distance,
            moving_time: "0:30:00".to_string(),
            sport_type: sport.to_string(),
            start_date: "2024-01-15 02:00:00".to_string(),
            start_date_local: "2024-01-15 10:00:00".to_string(),
            location_country: None,
            summary_polyline: None,
            average_heartrate: None,
            elevation_gain: None,
            average_speed: 3.0,
            streak: 1,
            description: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_display_type_marathons() {
        assert_eq!(make_activity(1, "Run", 42_195.0).display_type(), "Full Marathon");
        assert_eq!(make_activity(2, "Trail Run", 21_097.0).display_type(), "Half Marathon");
        assert_eq!(make_activity(3, "Run", 20_000.0).display_type(), "Run");
        assert_eq!(make_activity(4, "Trail Run", 5_000.0).display_type(), "Trail Run");
        assert_eq!(make_activity(5, "Ride", 100_000.0).display_type(), "Ride");
    }

    #[test]
    fn test_parse_moving_time() {
        assert_eq!(parse_moving_time("0:30:00"), Some(1800));
        assert_eq!(parse_moving_time("12:34:56"), Some(45_296));
        assert_eq!(parse_moving_time("2 days, 12:34:56"), Some(2 * 86_400 + 45_296));
        assert_eq!(parse_moving_time("1 day, 0:00:01"), Some(86_401));
        assert_eq!(parse_moving_time("0:25:13.500000"), Some(1513));
        assert_eq!(parse_moving_time(""), None);
        assert_eq!(parse_moving_time("garbage"), None);
    }

    #[test]
    fn test_deserialize_export_record() {
        let json = r#"{
            "run_id": 9876543210,
            "name": "Morning Run",
            "distance": 5012.3,
            "moving_time": "0:27:41",
            "type": "Run",
            "start_date": "2024-03-02 22:10:00",
            "start_date_local": "2024-03-03 06:10:00",
            "location_country": null,
            "summary_polyline": "_p~iF~ps|U_ulLnnqC",
            "average_heartrate": 151.2,
            "elevation_gain": 12.0,
            "average_speed": 3.01,
            "streak": 4,
            "subtype": "generic"
        }"#;

        let activity: Activity = serde_json::from_str(json).expect("valid record");
        assert_eq!(activity.run_id, 9876543210);
        assert_eq!(activity.sport_type, "Run");
        assert!(activity.has_route());
        assert_eq!(activity.year(), Some(2024));
        assert_eq!(activity.moving_time_secs(), 27 * 60 + 41);
        assert_eq!(
            activity.extra.get("subtype").and_then(|v| v.as_str()),
            Some("generic")
        );

        let back = serde_json::to_value(&activity).expect("serializes");
        assert_eq!(back["type"], "Run");
        assert_eq!(back["subtype"], "generic");
        assert!(back.get("description").is_none());
    }
}
