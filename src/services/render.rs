// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON output for the map front-end.

use geo::{BoundingRect, LineString};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::models::{Activity, Path};
use crate::services::ActivityGeoPipeline;

/// Where the map opens when there is nothing to frame.
const DEFAULT_CENTER: ViewCenter = ViewCenter {
    longitude: 116.4,
    latitude: 39.9,
};

/// Route color for the sport types the map styles; anything else gets the
/// site's main color.
pub fn route_color(sport_type: &str) -> &'static str {
    match sport_type {
        "Run" => "rgb(0, 166, 153)",
        "Trail Run" => "rgb(33, 150, 243)",
        "Ride" | "Indoor Ride" => "rgb(255, 140, 0)",
        "VirtualRide" => "rgb(111, 78, 255)",
        "Hike" => "rgb(255, 64, 129)",
        "Rowing" => "rgb(0, 229, 255)",
        "Swim" => "rgb(255, 193, 7)",
        "RoadTrip" => "rgb(156, 39, 176)",
        "Flight" => "rgb(121, 85, 72)",
        "Kayaking" => "rgb(244, 67, 54)",
        "Snowboard" | "Ski" => "rgb(76, 175, 80)",
        _ => "rgb(32, 178, 170)",
    }
}

/// Initial map center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "src/static/generated/")
)]
pub struct ViewCenter {
    pub longitude: f64,
    pub latitude: f64,
}

/// One `LineString` feature per activity. Activities without geodata get an
/// empty line so the collection stays index-aligned with the input.
pub fn feature_collection(
    pipeline: &ActivityGeoPipeline,
    activities: &[Activity],
    apply_privacy_offset: bool,
) -> FeatureCollection {
    let features = activities
        .iter()
        .map(|activity| {
            let path = pipeline.renderable_path_for(activity, apply_privacy_offset);
            activity_feature(activity, &path)
        })
        .collect::<Vec<_>>();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    tracing::info!(
        total = collection.features.len(),
        drawn = drawn_count(&collection),
        "Built feature collection"
    );
    collection
}

/// Number of features with at least one coordinate to draw.
pub fn drawn_count(collection: &FeatureCollection) -> usize {
    collection
        .features
        .iter()
        .filter(|f| line_coordinates(f).is_some_and(|c| !c.0.is_empty()))
        .count()
}

fn activity_feature(activity: &Activity, path: &Path) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("run_id".to_string(), activity.run_id.into());
    properties.insert("name".to_string(), activity.name.clone().into());
    properties.insert("type".to_string(), activity.display_type().into());
    properties.insert(
        "start_date_local".to_string(),
        activity.start_date_local.clone().into(),
    );
    properties.insert("distance".to_string(), activity.distance.into());
    properties.insert("color".to_string(), route_color(&activity.sport_type).into());

    let coordinates = path.coords().map(|c| vec![c.x, c.y]).collect();
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coordinates))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Coordinates of a feature's `LineString` geometry.
fn line_coordinates(feature: &Feature) -> Option<Path> {
    match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::LineString(points)) => Some(
            points
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| (p[0], p[1]))
                .collect::<LineString<f64>>(),
        ),
        _ => None,
    }
}

/// Center of the first feature that has coordinates.
pub fn view_center(collection: &FeatureCollection) -> ViewCenter {
    collection
        .features
        .iter()
        .filter_map(line_coordinates)
        .find_map(|path| path.bounding_rect())
        .map(|rect| {
            let center = rect.center();
            ViewCenter {
                longitude: center.x,
                latitude: center.y,
            }
        })
        .unwrap_or(DEFAULT_CENTER)
}
