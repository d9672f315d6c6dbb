// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity geo pipeline.
//!
//! Handles the core workflow for one activity:
//! 1. Reveal the (possibly encrypted) polyline
//! 2. Decode it into a `(lon, lat)` path
//! 3. Correct GCJ-02 data to WGS-84 when configured
//! 4. Reject null-island and degenerate decodes in favour of the location text
//! 5. Apply the privacy offset
//!
//! Nothing here returns an error for bad geodata. The worst case is an empty
//! path, which renderers treat as "no route to draw".

use dashmap::DashMap;
use geo::LineString;

use crate::config::Config;
use crate::models::path::{degenerate_path, is_degenerate, is_null_island, wrap_longitude};
use crate::models::{Activity, Coordinate, OffsetConfig, Path};
use crate::services::obfuscator::{CipherScheme, CoordinateObfuscator, CryptoError};
use crate::services::offset::PrivacyOffsetTransform;
use crate::services::{datum, location, polyline_codec};

/// Turns activity records into renderable paths.
#[derive(Debug)]
pub struct ActivityGeoPipeline {
    obfuscator: CoordinateObfuscator,
    offset: PrivacyOffsetTransform,
    fix_gcj02: bool,
    /// Location-text coordinate per `run_id`. Records are immutable once
    /// loaded, so entries are never invalidated.
    location_cache: DashMap<u64, Option<Coordinate>>,
}

impl ActivityGeoPipeline {
    pub fn new(obfuscator: CoordinateObfuscator, offset: OffsetConfig) -> Self {
        Self {
            obfuscator,
            offset: PrivacyOffsetTransform::new(offset),
            fix_gcj02: false,
            location_cache: DashMap::new(),
        }
    }

    /// Enable GCJ-02 → WGS-84 correction of decoded routes.
    pub fn with_datum_correction(mut self, enabled: bool) -> Self {
        self.fix_gcj02 = enabled;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let obfuscator = CoordinateObfuscator::new(&config.encryption_key, config.cipher_scheme);
        Self::new(obfuscator, config.map_offset).with_datum_correction(config.fix_gcj02)
    }

    pub fn obfuscator(&self) -> &CoordinateObfuscator {
        &self.obfuscator
    }

    pub fn offset(&self) -> &PrivacyOffsetTransform {
        &self.offset
    }

    /// Path to draw for an activity.
    pub fn renderable_path_for(&self, activity: &Activity, apply_privacy_offset: bool) -> Path {
        let path = self.true_path_for(activity);
        if apply_privacy_offset {
            self.offset.apply(&path)
        } else {
            path
        }
    }

    /// Renderable path re-encoded as a polyline. `None` when there is
    /// nothing to draw.
    pub fn encoded_path_for(
        &self,
        activity: &Activity,
        apply_privacy_offset: bool,
    ) -> Option<String> {
        let path = self.renderable_path_for(activity, apply_privacy_offset);
        if path.0.is_empty() {
            return None;
        }

        let wrapped: Path = path
            .coords()
            .map(|c| Coordinate {
                x: wrap_longitude(c.x),
                y: c.y,
            })
            .collect();
        match polyline_codec::encode(&wrapped) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::warn!(run_id = activity.run_id, error = %e, "Failed to re-encode path");
                None
            }
        }
    }

    /// Coordinate embedded in the activity's location text, memoized.
    pub fn location_for(&self, activity: &Activity) -> Option<Coordinate> {
        if let Some(cached) = self.location_cache.get(&activity.run_id) {
            return *cached;
        }

        let coordinate = activity
            .location_country
            .as_deref()
            .map(|text| self.obfuscator.reveal_any(text))
            .and_then(|text| location::extract_coordinate(&text));
        self.location_cache.insert(activity.run_id, coordinate);
        coordinate
    }

    /// Number of activities whose location text has been parsed.
    pub fn cached_locations(&self) -> usize {
        self.location_cache.len()
    }

    /// Copy of `activity` with route and location encrypted for publication.
    ///
    /// With the block cipher, fields that already open under the key are not
    /// encrypted twice. XOR output cannot be told apart from plaintext, so
    /// under that scheme every field is encrypted as given.
    pub fn protect_activity(&self, activity: &Activity) -> Result<Activity, CryptoError> {
        let mut protected = activity.clone();
        protected.summary_polyline = self.protect_field(activity.summary_polyline.as_deref())?;
        protected.location_country = self.protect_field(activity.location_country.as_deref())?;
        Ok(protected)
    }

    /// Copy of `activity` whose polyline is replaced by the offset route, in
    /// plaintext. Activities without a route are returned unchanged.
    pub fn offset_activity(&self, activity: &Activity) -> Activity {
        let mut shifted = activity.clone();
        if activity.has_route() {
            shifted.summary_polyline = self.encoded_path_for(activity, true);
            if shifted.summary_polyline.is_none() {
                tracing::warn!(run_id = activity.run_id, "Dropping unusable route");
            }
        }
        shifted
    }

    fn protect_field(&self, value: Option<&str>) -> Result<Option<String>, CryptoError> {
        match value {
            Some(text) if !text.is_empty() => {
                let plaintext = match self.obfuscator.scheme() {
                    CipherScheme::BlockCipher => self
                        .obfuscator
                        .try_reveal_with(CipherScheme::BlockCipher, text)
                        .unwrap_or_else(|_| text.to_string()),
                    CipherScheme::XorBase64 => text.to_string(),
                };
                self.obfuscator.protect(&plaintext).map(Some)
            }
            other => Ok(other.map(str::to_string)),
        }
    }

    /// Path before the privacy offset.
    fn true_path_for(&self, activity: &Activity) -> Path {
        let Some(raw) = activity.summary_polyline.as_deref().filter(|p| !p.is_empty()) else {
            return self.location_fallback(activity);
        };

        let mut path = self.decode_field(raw);
        if path.0.is_empty() {
            tracing::debug!(run_id = activity.run_id, "Route did not decode, using location");
            return self.location_fallback(activity);
        }

        if self.fix_gcj02 {
            path = datum::correct_path(&path);
        }

        if path.0.first().copied().is_some_and(is_null_island) {
            tracing::debug!(run_id = activity.run_id, "Null island decode, using location");
            return self.location_fallback(activity);
        }

        if is_degenerate(&path) {
            if let Some(coordinate) = self.location_for(activity) {
                return degenerate_path(coordinate);
            }
        }

        path
    }

    /// Reveal and decode a polyline field. If the revealed text does not
    /// decode to a route, the field itself may already be plaintext.
    fn decode_field(&self, raw: &str) -> Path {
        let revealed = self.obfuscator.reveal_any(raw);
        if revealed != raw {
            let path = polyline_codec::decode(&revealed);
            if !path.0.is_empty() {
                return path;
            }
        }
        polyline_codec::decode(raw)
    }

    fn location_fallback(&self, activity: &Activity) -> Path {
        match self.location_for(activity) {
            Some(coordinate) => degenerate_path(coordinate),
            None => LineString::new(Vec::new()),
        }
    }
}
