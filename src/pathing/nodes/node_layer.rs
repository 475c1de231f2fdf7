//! The [NodeLayer] owns every [QuadtreeNode] of one movement class together
//! with a square-to-node lookup table. Layers are built once from a cost
//! description of the terrain, the search only ever reads them.
//!
//! A cost grid maps onto a layer with one node per terrain square, a value of
//! 255 marks impassable terrain in grid form:
//!
//! ```text
//!  ___________________________
//! |    |    |    |    |    |
//! |  1 |  1 |  1 |255 |  1 |
//! |____|____|____|____|____|
//! |    |    |    |    |    |
//! |  1 |  4 |  1 |255 |  1 |
//! |____|____|____|____|____|
//! ```
//!
//! Larger merged cells can be described directly as rectangles via
//! [NodeLayer::from_rects], which checks that the rectangles tile the map
//! exactly.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The quadtree cells of one movement class ordered by node number
#[derive(Component, Default, Clone)]
pub struct NodeLayer {
	/// Index of the movement class this layer describes, feeds the path hash
	movement_class: u32,
	/// Size of the world
	map_dimensions: MapDimensions,
	/// Every cell of the partition, a node's number is its position here
	nodes: Vec<QuadtreeNode>,
	/// Square `(row * length + column)` to node-number lookup
	square_lookup: Vec<u32>,
}

impl NodeLayer {
	/// Build a layer with one node per terrain square from a row-major grid
	/// of move costs, [f32::INFINITY] marking impassable squares
	pub fn from_cost_grid(
		movement_class: u32,
		map_dimensions: MapDimensions,
		costs: &[f32],
	) -> Self {
		let length = map_dimensions.get_length();
		let depth = map_dimensions.get_depth();
		if costs.len() != (length * depth) as usize {
			panic!(
				"Cost grid holds {} squares, map `({}, {})` needs {}",
				costs.len(),
				length,
				depth,
				length * depth
			);
		}
		let mut rects = Vec::with_capacity(costs.len());
		for row in 0..depth {
			for column in 0..length {
				let cost = costs[(row * length + column) as usize];
				rects.push((column, row, column + 1, row + 1, cost));
			}
		}
		Self::from_rects(movement_class, map_dimensions, &rects)
	}
	/// Build a layer from explicit cell rectangles
	/// `(xmin, zmin, xmax, zmax, move_cost)` in terrain squares. The
	/// rectangles must tile the map exactly, neighbour lists and cached
	/// edge-transition points are derived from their adjacency
	pub fn from_rects(
		movement_class: u32,
		map_dimensions: MapDimensions,
		rects: &[(u32, u32, u32, u32, f32)],
	) -> Self {
		let length = map_dimensions.get_length();
		let depth = map_dimensions.get_depth();
		let mut nodes = Vec::with_capacity(rects.len());
		let mut square_lookup = vec![INVALID_NODE; (length * depth) as usize];
		for (i, (xmin, zmin, xmax, zmax, move_cost)) in rects.iter().enumerate() {
			let node_number = i as u32;
			if *xmax > length || *zmax > depth {
				panic!(
					"Node {} extent `({}, {}, {}, {})` overflows map `({}, {})`",
					node_number, xmin, zmin, xmax, zmax, length, depth
				);
			}
			for row in *zmin..*zmax {
				for column in *xmin..*xmax {
					let square = (row * length + column) as usize;
					if square_lookup[square] != INVALID_NODE {
						panic!(
							"Square `({}, {})` is covered by nodes {} and {}",
							column, row, square_lookup[square], node_number
						);
					}
					square_lookup[square] = node_number;
				}
			}
			nodes.push(QuadtreeNode::new(
				node_number, *xmin, *zmin, *xmax, *zmax, *move_cost,
			));
		}
		for (square, node_number) in square_lookup.iter().enumerate() {
			if *node_number == INVALID_NODE {
				panic!(
					"Square `({}, {})` is not covered by any node",
					square as u32 % length,
					square as u32 / length
				);
			}
		}
		derive_adjacency(&mut nodes);
		NodeLayer {
			movement_class,
			map_dimensions,
			nodes,
			square_lookup,
		}
	}
	/// Build a layer with one node per square from a `ron` file holding a
	/// row-major grid of 8-bit costs where 255 marks impassable terrain
	#[cfg(feature = "ron")]
	pub fn from_ron(movement_class: u32, map_dimensions: MapDimensions, path: String) -> Self {
		let file = std::fs::File::open(path).expect("Failed opening cost grid file");
		let grid: Vec<Vec<u8>> = match ron::de::from_reader(file) {
			Ok(grid) => grid,
			Err(e) => panic!("Failed deserializing cost grid: {}", e),
		};
		if grid.len() != map_dimensions.get_depth() as usize {
			panic!(
				"Cost grid has {} rows, map depth is {}",
				grid.len(),
				map_dimensions.get_depth()
			);
		}
		let mut costs = Vec::with_capacity(grid.len() * grid[0].len());
		for row in grid.iter() {
			if row.len() != map_dimensions.get_length() as usize {
				panic!(
					"Cost grid row has {} columns, map length is {}",
					row.len(),
					map_dimensions.get_length()
				);
			}
			for value in row.iter() {
				if *value == 255 {
					costs.push(f32::INFINITY);
				} else {
					costs.push(*value as f32);
				}
			}
		}
		Self::from_cost_grid(movement_class, map_dimensions, &costs)
	}
	/// Get the movement class index this layer describes
	pub fn get_movement_class(&self) -> u32 {
		self.movement_class
	}
	pub fn get_map_dimensions(&self) -> &MapDimensions {
		&self.map_dimensions
	}
	/// Get every node ordered by node number
	pub fn get_nodes(&self) -> &[QuadtreeNode] {
		&self.nodes
	}
	pub fn get_node_count(&self) -> usize {
		self.nodes.len()
	}
	/// Get a node by its stable node number
	///
	/// NB: This will panic if out of bounds
	pub fn get_node_by_number(&self, node_number: u32) -> &QuadtreeNode {
		&self.nodes[node_number as usize]
	}
	/// The number of the node covering the `(column, row)` terrain square,
	/// indices beyond the map edge are clamped onto it
	pub fn get_node_number_at(&self, column: u32, row: u32) -> u32 {
		let length = self.map_dimensions.get_length();
		let depth = self.map_dimensions.get_depth();
		// safety for indices at the exact limits of map size
		let column = column.min(length - 1);
		let row = row.min(depth - 1);
		self.square_lookup[(row * length + column) as usize]
	}
	/// Get the node covering the `(column, row)` terrain square
	pub fn get_node(&self, column: u32, row: u32) -> &QuadtreeNode {
		self.get_node_by_number(self.get_node_number_at(column, row))
	}
}

/// Wire up neighbour lists and cached edge-transition points between every
/// pair of touching cells
fn derive_adjacency(nodes: &mut [QuadtreeNode]) {
	let mut links: Vec<Vec<(u32, Vec3)>> = vec![Vec::new(); nodes.len()];
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let a = &nodes[i];
			let b = &nodes[j];
			if a.neighbour_relation(b) == 0 {
				continue;
			}
			// boundary coordinates can match across the map, the extents
			// must actually touch
			if a.xmin().max(b.xmin()) > a.xmax().min(b.xmax()) {
				continue;
			}
			if a.zmin().max(b.zmin()) > a.zmax().min(b.zmax()) {
				continue;
			}
			links[i].push((j as u32, a.edge_transition_point(b, Vec3::ZERO)));
			links[j].push((i as u32, b.edge_transition_point(a, Vec3::ZERO)));
		}
	}
	for (i, node_links) in links.into_iter().enumerate() {
		for (node_number, transition_point) in node_links {
			nodes[i].add_neighbour(node_number, transition_point);
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn grid_layer_lookup() {
		let map_dimensions = MapDimensions::new(3, 3);
		let costs = vec![1.0; 9];
		let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
		assert_eq!(9, layer.get_node_count());
		assert_eq!(0, layer.get_node_number_at(0, 0));
		assert_eq!(4, layer.get_node_number_at(1, 1));
		assert_eq!(8, layer.get_node_number_at(2, 2));
	}
	#[test]
	fn grid_layer_lookup_clamps() {
		let map_dimensions = MapDimensions::new(3, 3);
		let costs = vec![1.0; 9];
		let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
		assert_eq!(8, layer.get_node_number_at(30, 30));
	}
	#[test]
	fn grid_layer_neighbour_counts() {
		// corner cells touch 3 others, edge cells 5 and the centre cell 8
		let map_dimensions = MapDimensions::new(3, 3);
		let costs = vec![1.0; 9];
		let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
		assert_eq!(3, layer.get_node(0, 0).get_neighbours().len());
		assert_eq!(5, layer.get_node(1, 0).get_neighbours().len());
		assert_eq!(8, layer.get_node(1, 1).get_neighbours().len());
	}
	#[test]
	#[should_panic]
	fn grid_layer_wrong_size() {
		let map_dimensions = MapDimensions::new(3, 3);
		let costs = vec![1.0; 8];
		NodeLayer::from_cost_grid(0, map_dimensions, &costs);
	}
	#[test]
	fn rect_layer_mixed_cell_sizes() {
		//  ___________________
		// |         |    1    |
		// |    0    |_________|
		// |         |    2    |
		// |_________|_________|
		let map_dimensions = MapDimensions::new(8, 4);
		let rects = vec![
			(0, 0, 4, 4, 1.0),
			(4, 0, 8, 2, 1.0),
			(4, 2, 8, 4, f32::INFINITY),
		];
		let layer = NodeLayer::from_rects(0, map_dimensions, &rects);
		assert_eq!(3, layer.get_node_count());
		assert_eq!(0, layer.get_node_number_at(3, 3));
		assert_eq!(1, layer.get_node_number_at(4, 0));
		assert_eq!(2, layer.get_node_number_at(7, 3));
		// the big cell touches both halves on its right
		assert_eq!(2, layer.get_node(0, 0).get_neighbours().len());
		assert!(layer.get_node(7, 3).get_move_cost().is_infinite());
	}
	#[test]
	fn rect_layer_detached_cells_are_not_neighbours() {
		// nodes 0 and 4 share the boundary coordinate x = 2 but their
		// z-ranges sit apart, node 2 separates them
		//  _________
		// | 0  | 1  |
		// |____|____|
		// |    2    |
		// |____ ____|
		// | 3  | 4  |
		// |____|____|
		let map_dimensions = MapDimensions::new(4, 6);
		let rects = vec![
			(0, 0, 2, 2, 1.0),
			(2, 0, 4, 2, 1.0),
			(0, 2, 4, 4, 1.0),
			(0, 4, 2, 6, 1.0),
			(2, 4, 4, 6, 1.0),
		];
		let layer = NodeLayer::from_rects(0, map_dimensions, &rects);
		let result = layer.get_node_by_number(0).get_neighbours().to_vec();
		let actual = vec![1, 2];
		assert_eq!(actual, result);
	}
	#[test]
	#[should_panic]
	fn rect_layer_overlap() {
		let map_dimensions = MapDimensions::new(4, 4);
		let rects = vec![(0, 0, 4, 4, 1.0), (2, 2, 4, 4, 1.0)];
		NodeLayer::from_rects(0, map_dimensions, &rects);
	}
	#[test]
	#[should_panic]
	fn rect_layer_gap() {
		let map_dimensions = MapDimensions::new(4, 4);
		let rects = vec![(0, 0, 4, 2, 1.0)];
		NodeLayer::from_rects(0, map_dimensions, &rects);
	}
	#[test]
	fn cached_transition_points_match_on_demand() {
		let map_dimensions = MapDimensions::new(4, 2);
		let rects = vec![(0, 0, 2, 2, 1.0), (2, 0, 4, 2, 1.0)];
		let layer = NodeLayer::from_rects(0, map_dimensions, &rects);
		let a = layer.get_node_by_number(0);
		let b = layer.get_node_by_number(1);
		let result = a.get_cached_transition_point(0);
		let actual = a.edge_transition_point(b, Vec3::ZERO);
		assert_eq!(actual, result);
	}
	#[test]
	#[cfg(feature = "ron")]
	fn cost_grid_file() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/cost_grid.ron";
		let map_dimensions = MapDimensions::new(10, 10);
		let layer = NodeLayer::from_ron(0, map_dimensions, path);
		assert_eq!(100, layer.get_node_count());
		assert!(layer.get_node(4, 9).get_move_cost().is_infinite());
	}
}
