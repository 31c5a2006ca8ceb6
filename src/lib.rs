//! Quake Watcher core
//!
//! Fetches recent earthquakes for a selection, trains a small follow-up
//! classifier on them and ranks synthetic candidate events by risk.
//!
//! ```text
//! Selection ─► catalog ─► features/labels ─► model::fit ─► sampler ─► DashboardSnapshot
//! ```

pub mod api;
pub mod constants;
pub mod logic;
