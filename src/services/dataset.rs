// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loading and writing activity datasets (JSON arrays).

use crate::models::Activity;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load activities from a JSON file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Activity>, DatasetError> {
    let json_data =
        fs::read_to_string(path.as_ref()).map_err(|e| DatasetError::IoError(e.to_string()))?;
    let activities = load_from_json(&json_data)?;
    tracing::info!(
        path = %path.as_ref().display(),
        count = activities.len(),
        "Loaded activities"
    );
    Ok(activities)
}

/// Load activities from a JSON string.
pub fn load_from_json(json_data: &str) -> Result<Vec<Activity>, DatasetError> {
    serde_json::from_str(json_data).map_err(|e| DatasetError::ParseError(e.to_string()))
}

/// Pretty-print any serializable value to a file, creating parent
/// directories as needed.
pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(
    path: P,
    value: &T,
) -> Result<(), DatasetError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DatasetError::IoError(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DatasetError::SerializeError(e.to_string()))?;
    fs::write(path, json).map_err(|e| DatasetError::IoError(e.to_string()))?;
    tracing::info!(path = %path.display(), "Wrote output");
    Ok(())
}

/// Errors from dataset I/O.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to access file: {0}")]
    IoError(String),

    #[error("Failed to parse activities: {0}")]
    ParseError(String),

    #[error("Failed to serialize output: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_json_minimal_records() {
        let json = r#"[
            {"run_id": 1, "name": "A", "distance": 1000.0, "type": "Run"},
            {"run_id": 2, "summary_polyline": null, "location_country": "上海市"}
        ]"#;
        let activities = load_from_json(json).expect("parses");
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].sport_type, "Run");
        assert_eq!(activities[1].location_country.as_deref(), Some("上海市"));
        assert!(!activities[1].has_route());
    }

    #[test]
    fn test_load_from_json_rejects_non_array() {
        assert!(matches!(
            load_from_json(r#"{"run_id": 1}"#),
            Err(DatasetError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_from_file("does/not/exist.json"),
            Err(DatasetError::IoError(_))
        ));
    }
}
