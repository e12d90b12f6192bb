//! Snapshot export functionality
//!
//! Writes a snapshot's regions as JSON for offline analysis, and replays
//! a previously exported document as a static region list.

pub mod maps_json;

pub use maps_json::{import, SnapshotExporter};
