//! Live notification feed for hospital supply-chain dashboards.
//!
//! The [`notifications`] module is the library proper; the remaining modules
//! support the `supplyfeed` command line tool.

pub mod app;
pub mod cli;
pub mod config;
pub mod display;
pub mod logging;
pub mod notifications;
