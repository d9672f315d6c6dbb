// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Crate-wide error type.
//!
//! Almost nothing in the geo pipeline is allowed to fail: decode and decrypt
//! problems degrade to a fallback path. The errors below cover the parts that
//! can genuinely stop a batch run (configuration, dataset I/O) plus the
//! fallible lower-level calls that the pipeline wraps.

use crate::config::ConfigError;
use crate::services::dataset::DatasetError;
use crate::services::obfuscator::CryptoError;
use crate::services::polyline_codec::CodecError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Polyline error: {0}")]
    Codec(#[from] CodecError),

    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::Codec(_) => "codec_error",
            AppError::Crypto(_) => "crypto_error",
            AppError::Dataset(_) => "dataset_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, AppError>;
