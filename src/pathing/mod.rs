//! Hierarchical path search across a quadtree partition of the map
//!
//! Terrain is partitioned per movement class into quadtree cells, each cell
//! carrying the average cost of traversing it with [f32::INFINITY] marking
//! impassable ground. A request names a source point, a target point and an
//! optional search rectangle; the driver expands cells cheapest-first,
//! handing off between neighbouring cells at the middle of their shared edge:
//!
//! ```text
//!  ___________________________
//! |         |    |    |       |
//! |    S----x    |    |       |
//! |         |\___|____x___    |
//! |_________|____|____|   \   |
//! |         |         |    \  |
//! |         |         |     T |
//! |         |         |       |
//! |_________|_________|_______|
//! ```
//!
//! Definitions:
//!
//! * Node - a quadtree cell with a single averaged move cost
//! * Node layer - the quadtree of one movement class
//! * Edge-transition point - the waypoint on the boundary shared by two
//!   touching cells
//! * Search-state offset - the base stamp of one search, its low bit encodes
//!   open/closed and its magnitude outranks every older search
//! * Magic number - the terrain-change epoch, stale records are recognised by
//!   carrying an older one
//! * Live cache - the per-layer store of finished paths available for sharing
//!
//! A finished search emits a [paths::Path]: the waypoint sequence from
//! source to target. Paths whose requests resolve to the same cell pair can
//! be shared straight out of the [paths::PathCache] without searching again.
//!

pub mod nodes;
pub mod paths;
pub mod search;
pub mod utilities;
