//! API Module
//!
//! Boundary towards the presentation layer.
//!
//! Structure:
//! - dashboard.rs: Serializable snapshot of the pipeline state

pub mod dashboard;

pub use dashboard::DashboardSnapshot;
