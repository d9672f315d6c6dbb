// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod offset;
pub mod path;
pub mod stats;

pub use activity::Activity;
pub use offset::OffsetConfig;
pub use path::{Coordinate, Path};
pub use stats::ActivityStats;
