//! Classification, aggregation and view building.
//!
//! This module maps fuel labels to motorization classes, groups scored
//! records into per-brand and per-class summaries, normalizes them for the
//! radar chart and assembles the views printed by the CLI.

pub mod aggregate;
pub mod classify;
pub mod types;
pub mod utility;
pub mod views;
