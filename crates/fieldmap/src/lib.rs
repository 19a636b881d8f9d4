mod config;
mod geometry;
mod storage;
mod store;
mod types;

pub use config::StoreConfig;
pub use geometry::*;
pub use storage::{check_slot_name, FileStore, KeyValueStore, MemoryStore};
pub use store::{PolygonStore, DEFAULT_SLOT};
pub use types::{check_ring, LatLng, Polygon};

/// Parse a ring given as a JSON array of `[lat, lng]` pairs.
pub fn parse_ring(json: &str) -> anyhow::Result<Vec<LatLng>> {
    use anyhow::Context;
    serde_json::from_str(json).context("coordinates must be a JSON array of [lat, lng] pairs")
}
