//! Defines a bundle which can be spawned as/inserted into an entity which
//! movable actors can query for pathing data
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Defines all required components for planning paths over one movement
/// class
#[derive(Bundle)]
pub struct QuadtreePathingBundle {
	/// Size of the world
	map_dimensions: MapDimensions,
	/// The quadtree cells of the movement class
	node_layer: NodeLayer,
	/// Owner of every finished path
	path_cache: PathCache,
	/// Serves requests against the layer
	search_executor: SearchExecutor,
	/// Runtime policy of the searches
	search_config: SearchConfig,
}

impl QuadtreePathingBundle {
	/// Create a new instance of [QuadtreePathingBundle] over uniform terrain
	pub fn new(map_length: u32, map_depth: u32, movement_class: u32) -> Self {
		let map_dimensions = MapDimensions::new(map_length, map_depth);
		let costs = vec![1.0; (map_length * map_depth) as usize];
		let node_layer = NodeLayer::from_cost_grid(movement_class, map_dimensions, &costs);
		QuadtreePathingBundle {
			map_dimensions,
			node_layer,
			path_cache: PathCache::default(),
			search_executor: SearchExecutor::new(),
			search_config: SearchConfig::default(),
		}
	}
	/// Create a new instance of [QuadtreePathingBundle] from explicit cell
	/// rectangles `(xmin, zmin, xmax, zmax, move_cost)` in terrain squares
	pub fn from_rects(
		map_length: u32,
		map_depth: u32,
		movement_class: u32,
		rects: &[(u32, u32, u32, u32, f32)],
	) -> Self {
		let map_dimensions = MapDimensions::new(map_length, map_depth);
		let node_layer = NodeLayer::from_rects(movement_class, map_dimensions, rects);
		QuadtreePathingBundle {
			map_dimensions,
			node_layer,
			path_cache: PathCache::default(),
			search_executor: SearchExecutor::new(),
			search_config: SearchConfig::default(),
		}
	}
	/// Create a new instance of [QuadtreePathingBundle] where the cost grid
	/// is derived from a `.ron` file
	#[cfg(feature = "ron")]
	pub fn from_ron(map_length: u32, map_depth: u32, movement_class: u32, path: &str) -> Self {
		let map_dimensions = MapDimensions::new(map_length, map_depth);
		let node_layer = NodeLayer::from_ron(movement_class, map_dimensions, path.to_string());
		QuadtreePathingBundle {
			map_dimensions,
			node_layer,
			path_cache: PathCache::default(),
			search_executor: SearchExecutor::new(),
			search_config: SearchConfig::default(),
		}
	}
}
