//! Catalog Module - Historical event acquisition
//!
//! This module handles:
//! - Predefined regions and selection resolution
//! - Query construction for the USGS event API
//! - GeoJSON decoding into `SeismicEvent`

pub mod client;
pub mod event;
pub mod region;

pub use client::{CatalogClient, CatalogError, CatalogQuery, EventSource};
pub use event::SeismicEvent;
pub use region::{QueryArea, RegionKey, Selection, Target};
