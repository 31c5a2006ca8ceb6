//! Logic Module - Seismic risk pipeline
//!
//! Chứa các stage: Catalog fetch, Feature/Label builder, Classifier, Sampler.
//!
//! ## Layout
//! - `catalog/` - Regions, USGS query, GeoJSON decoding
//! - `features/` - Feature vectors and follow-up labels
//! - `model/` - Network, training loop, tensor pool
//! - `sampler` - Synthetic candidate scoring
//! - `pipeline/` - Orchestration and state

pub mod catalog;
pub mod config;
pub mod features;
pub mod geolocation;
pub mod model;
pub mod pipeline;
pub mod risk;
pub mod sampler;
