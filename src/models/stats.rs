//! Activity statistics aggregates for the summary and per-year pages.
//!
//! These are computed once at build time so the front-end never has to walk
//! the full activity list to draw its totals.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::Activity;

/// Pre-computed statistics over a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "src/static/generated/")
)]
pub struct ActivityStats {
    // ─── Totals ──────────────────────────────────────────────────
    /// Total activities counted
    #[serde(default)]
    pub total_activities: u32,
    /// Total distance across all activities (meters)
    #[serde(default)]
    pub total_distance_meters: f64,
    /// Total moving time across all activities (seconds)
    #[serde(default)]
    pub total_moving_time_secs: u64,
    /// Activities that carry a route
    #[serde(default)]
    pub activities_with_route: u32,
    /// Longest consecutive-day streak seen
    #[serde(default)]
    pub longest_streak: u32,

    // ─── By Type ─────────────────────────────────────────────────
    /// Activity count per display type (marathons split out)
    #[serde(default)]
    pub activities_by_type: BTreeMap<String, u32>,
    /// Total distance per display type (meters)
    #[serde(default)]
    pub distance_by_type: BTreeMap<String, f64>,

    // ─── Time Series ─────────────────────────────────────────────
    /// Activity count per month ("YYYY-MM" format)
    #[serde(default)]
    pub activities_by_month: BTreeMap<String, u32>,
    /// Activity count per year ("YYYY" format)
    #[serde(default)]
    pub activities_by_year: BTreeMap<String, u32>,
    /// Distance per year (meters)
    #[serde(default)]
    pub distance_by_year: BTreeMap<String, f64>,

    // ─── Idempotency ─────────────────────────────────────────────
    /// Activity IDs already counted
    #[serde(default, skip_serializing)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    counted_ids: HashSet<u64>,

    /// Generation timestamp (ISO 8601)
    #[serde(default)]
    pub updated_at: String,
}

impl ActivityStats {
    /// Aggregate a whole dataset.
    pub fn from_activities(activities: &[Activity], now: &str) -> Self {
        let mut stats = Self::default();
        for activity in activities {
            stats.update_from_activity(activity, now);
        }
        stats
    }

    /// Update stats with one activity.
    ///
    /// Returns `false` if the activity was already counted.
    pub fn update_from_activity(&mut self, activity: &Activity, now: &str) -> bool {
        if !self.counted_ids.insert(activity.run_id) {
            return false;
        }
        self.updated_at = now.to_string();

        self.total_activities += 1;
        self.total_distance_meters += activity.distance;
        self.total_moving_time_secs += activity.moving_time_secs();
        if activity.has_route() {
            self.activities_with_route += 1;
        }
        self.longest_streak = self.longest_streak.max(activity.streak);

        let display_type = activity.display_type().to_string();
        *self
            .activities_by_type
            .entry(display_type.clone())
            .or_insert(0) += 1;
        *self.distance_by_type.entry(display_type).or_insert(0.0) += activity.distance;

        if let Some(start) = activity.local_start() {
            let month_key = start.format("%Y-%m").to_string();
            *self.activities_by_month.entry(month_key).or_insert(0) += 1;
        }
        if let Some(year) = activity.year() {
            let year_key = year.to_string();
            *self.activities_by_year.entry(year_key.clone()).or_insert(0) += 1;
            *self.distance_by_year.entry(year_key).or_insert(0.0) += activity.distance;
        }

        true
    }

    /// Years present in the dataset, most recent first.
    pub fn years_desc(&self) -> Vec<&str> {
        self.activities_by_year.keys().rev().map(String::as_str).collect()
    }
}
