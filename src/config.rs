//! Build-time configuration loaded from environment variables.
//!
//! A `.env` file next to the dataset is honoured for local runs, the same
//! way the site build reads its keys.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::OffsetConfig;
use crate::services::obfuscator::CipherScheme;

/// Fallback key used only when no key is configured and the job does not
/// publish ciphertext. Reveal attempts with it simply fail over to plaintext.
const DEFAULT_ENCRYPT_KEY: &str = "workouts_default_secret_key";

/// Which batch job the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Rewrite the dataset with encrypted polyline/location fields
    Encrypt,
    /// Rewrite the dataset with offset (plaintext) polylines
    Offset,
    /// Emit a GeoJSON FeatureCollection of renderable routes
    GeoJson,
    /// Emit aggregate statistics
    Stats,
}

impl FromStr for PipelineMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encrypt" => Ok(PipelineMode::Encrypt),
            "offset" => Ok(PipelineMode::Offset),
            "geojson" => Ok(PipelineMode::GeoJson),
            "stats" => Ok(PipelineMode::Stats),
            _ => Err(ConfigError::Invalid("PIPELINE_MODE", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source `activities.json`
    pub input_path: PathBuf,
    /// Where the job writes its result
    pub output_path: PathBuf,
    pub mode: PipelineMode,

    // --- Secrets ---
    /// Shared key for protect/reveal
    pub encryption_key: String,
    pub cipher_scheme: CipherScheme,

    // --- Geo ---
    pub map_offset: OffsetConfig,
    /// Shift rendered routes by `map_offset`
    pub apply_privacy_offset: bool,
    /// Dataset was recorded in GCJ-02 and needs correcting to WGS-84
    pub fix_gcj02: bool,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            input_path: PathBuf::from("src/static/activities.json"),
            output_path: PathBuf::from("public/data/activities.json"),
            mode: PipelineMode::Encrypt,
            encryption_key: "test_encrypt_key".to_string(),
            cipher_scheme: CipherScheme::BlockCipher,
            map_offset: OffsetConfig::default(),
            apply_privacy_offset: true,
            fix_gcj02: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mode: PipelineMode = env::var("PIPELINE_MODE")
            .unwrap_or_else(|_| "encrypt".to_string())
            .parse()?;

        let encryption_key = match env::var("ENCRYPT_KEY") {
            Ok(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ if mode == PipelineMode::Encrypt => {
                return Err(ConfigError::Missing("ENCRYPT_KEY"));
            }
            _ => {
                tracing::warn!("ENCRYPT_KEY not set, encrypted fields will not be revealed");
                DEFAULT_ENCRYPT_KEY.to_string()
            }
        };

        let cipher_scheme = match env::var("CIPHER_SCHEME") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("CIPHER_SCHEME", value))?,
            Err(_) => CipherScheme::default(),
        };

        let defaults = OffsetConfig::default();
        let map_offset = OffsetConfig {
            distance: parse_var("MAP_OFFSET_DISTANCE_KM", defaults.distance)?,
            bearing: parse_var("MAP_OFFSET_BEARING_DEG", defaults.bearing)?,
        };
        if !map_offset.distance.is_finite() || map_offset.distance < 0.0 {
            return Err(ConfigError::Invalid(
                "MAP_OFFSET_DISTANCE_KM",
                map_offset.distance.to_string(),
            ));
        }

        Ok(Self {
            input_path: env::var("ACTIVITIES_INPUT")
                .unwrap_or_else(|_| "src/static/activities.json".to_string())
                .into(),
            output_path: env::var("ACTIVITIES_OUTPUT")
                .map_err(|_| ConfigError::Missing("ACTIVITIES_OUTPUT"))?
                .into(),
            mode,
            encryption_key,
            cipher_scheme,
            map_offset,
            apply_privacy_offset: parse_var("APPLY_PRIVACY_OFFSET", true)?,
            fix_gcj02: parse_var("FIX_GCJ02", false)?,
        })
    }
}

/// Read and parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, value)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
