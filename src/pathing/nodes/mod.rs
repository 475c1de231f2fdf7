//! The quadtree cells of a movement class and the layer that owns them
//!

pub mod node;
pub mod node_layer;

/// Sentinel for "no node", used by back-links and lookup tables
pub const INVALID_NODE: u32 = u32::MAX;
