// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - geo pipeline and dataset processing.

pub mod dataset;
pub mod datum;
pub mod location;
pub mod obfuscator;
pub mod offset;
pub mod pipeline;
pub mod polyline_codec;
pub mod render;

pub use obfuscator::{CipherScheme, CoordinateObfuscator};
pub use offset::{MercatorShift, PrivacyOffsetTransform};
pub use pipeline::ActivityGeoPipeline;
