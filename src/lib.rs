//! Classified-ad tracker.
//!
//! Scrapes listing pages from several sites, drops every ad already recorded
//! in the seen store, matches the remaining ones against per-search criteria
//! and mails one digest of new matches per run.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod notifier;
pub mod pipeline;
pub mod runner;
pub mod scrapers;
pub mod store;

pub use error::{Result, TrackerError};
