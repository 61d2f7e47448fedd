//! Station ranking, line grouping, and rent subsidy evaluation for relocation search.
//!
//! The [`ranking`] module holds the pure scoring pipeline. [`catalog`] turns raw search
//! records into [`ranking::Station`] values, and [`config`], [`error`], and [`telemetry`]
//! carry the process-level plumbing shared by the binaries.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ranking;
pub mod telemetry;
