// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workouts-Privacy: publish workout routes without publishing where you live
//!
//! This crate provides the build-time geo pipeline for a static workouts
//! site: it decrypts, decodes, corrects and displaces activity routes, and
//! writes the protected dataset, GeoJSON and statistics the site serves.

pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod services;
pub mod time_utils;
