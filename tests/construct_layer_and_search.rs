//! Try building a layer and driving searches end to end
//!

use bevy::math::Vec3;
use bevy_quadtree_pathing_plugin::prelude::*;

/// Build a 10x10 layer with a hook-shaped wall in its south
///
///  _____________________________
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|__|__|__|__|__|__|
/// |__|__|__|__|x_|__|__|__|__|__|
/// |__|__|__|__|x_|x_|__|__|__|__|
/// |__|__|__|__|x_|x_|__|__|__|__|
/// |__|__|__|__|x_|x_|x_|__|__|__|
fn walled_layer() -> NodeLayer {
	let map_dimensions = MapDimensions::new(10, 10);
	let mut costs = vec![1.0; 100];
	for (column, row) in [
		(4, 6),
		(4, 7),
		(5, 7),
		(4, 8),
		(5, 8),
		(4, 9),
		(5, 9),
		(6, 9),
	] {
		costs[row * 10 + column] = f32::INFINITY;
	}
	NodeLayer::from_cost_grid(0, map_dimensions, &costs)
}

/// Every emitted path must keep its waypoints inside the bounding box and
/// free of coinciding neighbours (the final target excepted)
fn assert_path_invariants(path: &Path) {
	assert!(path.num_points() >= 2);
	let (mins, maxs) = path.get_bounding_box();
	for i in 0..path.num_points() {
		let point = path.get_point(i);
		assert!(point.x.is_finite() && point.z.is_finite());
		assert!(point.x >= mins.x && point.x <= maxs.x);
		assert!(point.z >= mins.z && point.z <= maxs.z);
	}
	for i in 1..path.num_points() {
		let previous = path.get_point(i - 1);
		let current = path.get_point(i);
		if i < path.num_points() - 1 {
			assert_ne!(previous, current);
		}
	}
}

#[test]
fn search_around_the_wall() {
	let layer = walled_layer();
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	// from the south west corner to the south east corner, the wall forces
	// the route north around the hook
	let source = Vec3::new(4.0, 0.0, 76.0);
	let target = Vec3::new(76.0, 0.0, 76.0);
	let path_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let path = cache.get_live_path(path_id).unwrap();
	assert_path_invariants(path);
	assert_eq!(source, path.get_source_point());
	assert_eq!(target, path.get_target_point());
	// the route must clear the top of the hook at some point
	let mut crosses_above_wall = false;
	for i in 0..path.num_points() {
		if path.get_point(i).z <= 6.0 * SQUARE_SIZE {
			crosses_above_wall = true;
		}
	}
	assert!(crosses_above_wall);
}

#[test]
fn dijkstra_goes_around_the_same_wall() {
	let layer = walled_layer();
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	let source = Vec3::new(4.0, 0.0, 76.0);
	let target = Vec3::new(76.0, 0.0, 76.0);
	let dijkstra_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::Dijkstra,
		)
		.unwrap();
	let dijkstra_path = cache.get_live_path(dijkstra_id).unwrap();
	assert_path_invariants(dijkstra_path);
	assert_eq!(source, dijkstra_path.get_source_point());
	assert_eq!(target, dijkstra_path.get_target_point());
	// the hook has no southern gap so the route clears its top as well
	let mut crosses_above_wall = false;
	for i in 0..dijkstra_path.num_points() {
		if dijkstra_path.get_point(i).z <= 6.0 * SQUARE_SIZE {
			crosses_above_wall = true;
		}
	}
	assert!(crosses_above_wall);
}

#[test]
fn partial_result_ends_at_the_reachable_minimum() {
	// wall the eastern column off completely
	let map_dimensions = MapDimensions::new(6, 4);
	let mut costs = vec![1.0; 24];
	for row in 0..4 {
		costs[row * 6 + 4] = f32::INFINITY;
	}
	let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	let source = Vec3::new(4.0, 0.0, 12.0);
	let target = Vec3::new(44.0, 0.0, 12.0);
	let path_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let path = cache.get_live_path(path_id).unwrap();
	assert_path_invariants(path);
	// the emitted target snapped onto the midpoint of a reachable node short
	// of the wall
	let snapped = path.get_target_point();
	assert!(snapped.x < 4.0 * SQUARE_SIZE);
	let (column, row) = layer.get_map_dimensions().world_to_square(snapped);
	assert!(!layer.get_node(column, row).get_move_cost().is_infinite());
}

#[test]
fn blocked_source_restores_and_escapes() {
	let map_dimensions = MapDimensions::new(4, 1);
	let costs = vec![f32::INFINITY, 1.0, 1.0, 1.0];
	let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	let source = Vec3::new(4.0, 0.0, 4.0);
	let target = Vec3::new(28.0, 0.0, 4.0);
	let path_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let path = cache.get_live_path(path_id).unwrap();
	assert_path_invariants(path);
	assert_eq!(target, path.get_target_point());
	// the layer reads impassable again once the search is over
	assert!(layer.get_node(0, 0).get_move_cost().is_infinite());
	// no node past the source on the path is impassable
	for i in 1..path.num_points() {
		let (column, row) = layer.get_map_dimensions().world_to_square(path.get_point(i));
		assert!(!layer.get_node(column, row).get_move_cost().is_infinite());
	}
}

#[test]
fn collinear_route_stays_a_straight_line() {
	// three merged cells in a row
	//  ______________________________
	// |         |         |          |
	// |    S----|---------|-----T    |
	// |_________|_________|__________|
	let map_dimensions = MapDimensions::new(12, 4);
	let rects = vec![
		(0, 0, 4, 4, 1.0),
		(4, 0, 8, 4, 1.0),
		(8, 0, 12, 4, 1.0),
	];
	let layer = NodeLayer::from_rects(0, map_dimensions, &rects);
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	let source = Vec3::new(8.0, 0.0, 16.0);
	let target = Vec3::new(88.0, 0.0, 16.0);
	let path_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let path = cache.get_live_path(path_id).unwrap();
	assert_path_invariants(path);
	for i in 0..path.num_points() {
		assert!((path.get_point(i).z - 16.0).abs() < 1e-3);
	}
}

#[test]
fn smoothing_relocates_a_bent_waypoint() {
	// two merged cells side by side, the un-smoothed route bends through the
	// middle of the shared edge
	let map_dimensions = MapDimensions::new(8, 4);
	let rects = vec![(0, 0, 4, 4, 1.0), (4, 0, 8, 4, 1.0)];
	let layer = NodeLayer::from_rects(0, map_dimensions, &rects);
	let mut cache = PathCache::default();
	let source = Vec3::new(4.0, 0.0, 4.0);
	let target = Vec3::new(60.0, 0.0, 8.0);
	// trace without smoothing first
	let mut config = SearchConfig::default();
	config.smooth_paths = false;
	let mut executor = SearchExecutor::new();
	let raw_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let raw_middle = cache.get_live_path(raw_id).unwrap().get_point(1);
	// the un-smoothed hand-off aims for the middle of the shared edge
	assert_eq!(Vec3::new(32.0, 0.0, 16.0), raw_middle);
	cache.delete_path(raw_id);
	// now with smoothing, the waypoint slides onto the straight line
	config.smooth_paths = true;
	let smooth_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	let path = cache.get_live_path(smooth_id).unwrap();
	assert_path_invariants(path);
	assert_eq!(3, path.num_points());
	let smoothed = path.get_point(1);
	assert!((smoothed.x - 32.0).abs() < 1e-2);
	assert!((smoothed.z - 6.0).abs() < 1e-2);
	// the relocated waypoint aligns the two segments strictly better
	let alignment = |middle: Vec3| {
		let a = (middle - source).normalize_or_zero();
		let b = (target - middle).normalize_or_zero();
		a.dot(b)
	};
	assert!(alignment(smoothed) > alignment(raw_middle));
}

#[test]
fn released_paths_leave_the_cache_for_good() {
	let layer = walled_layer();
	let config = SearchConfig::default();
	let mut cache = PathCache::default();
	let mut executor = SearchExecutor::new();
	let source = Vec3::new(4.0, 0.0, 4.0);
	let target = Vec3::new(76.0, 0.0, 44.0);
	let path_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	assert_eq!(1, cache.len());
	assert!(cache.delete_path(path_id).is_some());
	assert!(cache.is_empty());
	// a fresh request after the release runs its own search again
	let second_id = executor
		.request_path(
			&layer,
			&mut cache,
			&config,
			source,
			target,
			None,
			SearchType::AStar,
		)
		.unwrap();
	assert_ne!(path_id, second_id);
	assert_eq!(1, cache.len());
}
