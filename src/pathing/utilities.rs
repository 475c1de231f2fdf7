//! Shared structures and tools used by the node layer and the search
//!

use bevy::prelude::*;

/// World-unit size of one terrain square, the quantum all node extents are
/// measured in
pub const SQUARE_SIZE: f32 = 8.0;

/// Set when the other node touches this node's left (`xmin`) boundary
pub const EDGE_LEFT: u8 = 1 << 0;
/// Set when the other node touches this node's right (`xmax`) boundary
pub const EDGE_RIGHT: u8 = 1 << 1;
/// Set when the other node touches this node's top (`zmin`) boundary
pub const EDGE_TOP: u8 = 1 << 2;
/// Set when the other node touches this node's bottom (`zmax`) boundary
pub const EDGE_BOTTOM: u8 = 1 << 3;

/// The length `x` and depth `z` of the map measured in terrain squares
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Reflect, Default, Clone, Copy, Debug)]
pub struct MapDimensions {
	/// Dimensions of the world in terrain squares
	size: (u32, u32),
}

impl MapDimensions {
	/// Create a new instance of [MapDimensions]. A `unit` of world space is
	/// [SQUARE_SIZE] wide so the world spans `length * SQUARE_SIZE` by
	/// `depth * SQUARE_SIZE`
	pub fn new(length: u32, depth: u32) -> Self {
		if length == 0 || depth == 0 {
			panic!(
				"Map dimensions `({}, {})` must be at least one square along each axis",
				length, depth
			);
		}
		MapDimensions {
			size: (length, depth),
		}
	}
	pub fn get_size(&self) -> (u32, u32) {
		self.size
	}
	pub fn get_length(&self) -> u32 {
		self.size.0
	}
	pub fn get_depth(&self) -> u32 {
		self.size.1
	}
	/// Length of the world along `x` in world units
	pub fn get_world_length(&self) -> f32 {
		self.size.0 as f32 * SQUARE_SIZE
	}
	/// Depth of the world along `z` in world units
	pub fn get_world_depth(&self) -> f32 {
		self.size.1 as f32 * SQUARE_SIZE
	}
	/// Clamp a world position into the map bounds, `y` is left untouched
	pub fn clamp_in_bounds(&self, position: Vec3) -> Vec3 {
		Vec3::new(
			position.x.clamp(0.0, self.get_world_length()),
			position.y,
			position.z.clamp(0.0, self.get_world_depth()),
		)
	}
	/// From a world position calculate the `(column, row)` terrain square it
	/// resides in
	pub fn world_to_square(&self, position: Vec3) -> (u32, u32) {
		let mut column = (position.x / SQUARE_SIZE).floor() as u32;
		let mut row = (position.z / SQUARE_SIZE).floor() as u32;
		// safety for positions at the exact limits of map size
		if column >= self.get_length() {
			column = self.get_length() - 1;
		}
		if row >= self.get_depth() {
			row = self.get_depth() - 1;
		}
		(column, row)
	}
}

/// Bounds of a search measured in terrain squares. Nodes whose midpoint
/// falls outside the rectangle are pruned from expansion, which is how a
/// caller budgets a search without an iteration cap
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Reflect, Default, Clone, Copy, Debug, PartialEq)]
pub struct SearchRect {
	/// Western limit
	pub x1: u32,
	/// Northern limit
	pub z1: u32,
	/// Eastern limit
	pub x2: u32,
	/// Southern limit
	pub z2: u32,
}

impl SearchRect {
	/// Create a new instance of [SearchRect] from square-unit bounds
	pub fn new(x1: u32, z1: u32, x2: u32, z2: u32) -> Self {
		SearchRect { x1, z1, x2, z2 }
	}
	/// A rectangle spanning the whole map
	pub fn full(map_dimensions: &MapDimensions) -> Self {
		SearchRect {
			x1: 0,
			z1: 0,
			x2: map_dimensions.get_length(),
			z2: map_dimensions.get_depth(),
		}
	}
}

/// Runtime policy of a search. The branches these flags guard are cheap and
/// evaluating them per search keeps every mode testable from one build
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Reflect, Clone, Copy, Debug)]
pub struct SearchConfig {
	/// Fall back to the reachable node closest to the target when the target
	/// itself cannot be reached, snapping the target point onto it
	pub partial_searches: bool,
	/// Post-process traced paths to pull waypoints along their shared edges
	/// towards the straight line
	pub smooth_paths: bool,
	/// Weight the heuristic by the average move cost of the partial path so
	/// far instead of the flat-terrain constant
	pub weighted_heuristic: bool,
	/// Read precomputed edge-transition points keyed by neighbour index
	/// instead of recomputing them during expansion
	pub cached_edge_points: bool,
	/// Stamp the terrain epoch on nodes as they are closed rather than
	/// leaving the stamp to the layer maintenance outside the search
	pub conservative_neighbour_updates: bool,
	/// Copy neighbour indices into a scratch buffer before expanding them
	pub copy_neighbour_nodes: bool,
	/// Two finished searches may share waypoints when their target points lie
	/// within this world-unit radius of each other
	pub shared_target_radius: f32,
}

impl Default for SearchConfig {
	fn default() -> Self {
		SearchConfig {
			partial_searches: true,
			smooth_paths: true,
			weighted_heuristic: false,
			cached_edge_points: false,
			conservative_neighbour_updates: false,
			copy_neighbour_nodes: false,
			shared_target_radius: SQUARE_SIZE,
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn valid_map_dimensions() {
		let _map_dimensions = MapDimensions::new(16, 16);
	}
	#[test]
	#[should_panic]
	fn invalid_map_dimensions() {
		MapDimensions::new(16, 0);
	}
	#[test]
	fn clamp_negative_position() {
		let map_dimensions = MapDimensions::new(16, 16);
		let position = Vec3::new(-40.0, 0.0, 12.0);
		let result = map_dimensions.clamp_in_bounds(position);
		let actual = Vec3::new(0.0, 0.0, 12.0);
		assert_eq!(actual, result);
	}
	#[test]
	fn clamp_overflowing_position() {
		let map_dimensions = MapDimensions::new(16, 16);
		let position = Vec3::new(500.0, 0.0, 500.0);
		let result = map_dimensions.clamp_in_bounds(position);
		let actual = Vec3::new(128.0, 0.0, 128.0);
		assert_eq!(actual, result);
	}
	#[test]
	fn world_to_square_interior() {
		let map_dimensions = MapDimensions::new(16, 16);
		let position = Vec3::new(100.0, 0.0, 4.0);
		let result = map_dimensions.world_to_square(position);
		let actual = (12, 0);
		assert_eq!(actual, result);
	}
	#[test]
	fn world_to_square_at_limit() {
		let map_dimensions = MapDimensions::new(16, 16);
		let position = Vec3::new(128.0, 0.0, 128.0);
		let result = map_dimensions.world_to_square(position);
		let actual = (15, 15);
		assert_eq!(actual, result);
	}
	#[test]
	fn full_rect_spans_map() {
		let map_dimensions = MapDimensions::new(24, 12);
		let result = SearchRect::full(&map_dimensions);
		let actual = SearchRect::new(0, 0, 24, 12);
		assert_eq!(actual, result);
	}
}
