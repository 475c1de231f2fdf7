//! A quadtree cell carries one averaged move cost for the terrain squares it
//! covers. A cost of [f32::INFINITY] marks the cell impassable. Cells can
//! cover differently sized areas so a node records its extent in terrain
//! squares and the list of nodes it touches:
//!
//! ```text
//!  ___________________
//! |         |    |    |
//! |         |____|____|
//! |         |    |    |
//! |_________|____|____|
//! |         |         |
//! |         |         |
//! |         |         |
//! |_________|_________|
//! ```
//!
//! During a search the driver never writes to a node, all mutable search
//! bookkeeping lives in the per-layer scratch records.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A cell of the quadtree partition for one movement class
#[derive(Reflect, Default, Clone, Debug)]
pub struct QuadtreeNode {
	/// Stable identity of the node within its layer, doubles as its index in
	/// the layer's node list
	node_number: u32,
	/// Western extent in terrain squares
	xmin: u32,
	/// Northern extent in terrain squares
	zmin: u32,
	/// Eastern extent in terrain squares
	xmax: u32,
	/// Southern extent in terrain squares
	zmax: u32,
	/// Average cost of traversing the cell, [f32::INFINITY] for impassable
	move_cost: f32,
	/// Node numbers of every touching cell, stable during a search
	neighbours: Vec<u32>,
	/// Edge-transition points parallel to `neighbours`, filled by the layer
	/// when it derives adjacency
	transition_points: Vec<Vec3>,
}

impl QuadtreeNode {
	/// Create a new instance of [QuadtreeNode] covering the given extent,
	/// neighbour lists are derived later by the layer
	pub fn new(node_number: u32, xmin: u32, zmin: u32, xmax: u32, zmax: u32, move_cost: f32) -> Self {
		if xmin >= xmax || zmin >= zmax {
			panic!(
				"Node {} extent `({}, {}, {}, {})` is degenerate",
				node_number, xmin, zmin, xmax, zmax
			);
		}
		QuadtreeNode {
			node_number,
			xmin,
			zmin,
			xmax,
			zmax,
			move_cost,
			neighbours: Vec::new(),
			transition_points: Vec::new(),
		}
	}
	/// Get the stable identity of the node within its layer
	pub fn get_node_number(&self) -> u32 {
		self.node_number
	}
	pub fn xmin(&self) -> u32 {
		self.xmin
	}
	pub fn zmin(&self) -> u32 {
		self.zmin
	}
	pub fn xmax(&self) -> u32 {
		self.xmax
	}
	pub fn zmax(&self) -> u32 {
		self.zmax
	}
	/// Midpoint of the extent along `x` in square units
	pub fn xmid(&self) -> f32 {
		(self.xmin + self.xmax) as f32 * 0.5
	}
	/// Midpoint of the extent along `z` in square units
	pub fn zmid(&self) -> f32 {
		(self.zmin + self.zmax) as f32 * 0.5
	}
	/// Get the average cost of traversing the cell, [f32::INFINITY] means
	/// the cell is impassable
	pub fn get_move_cost(&self) -> f32 {
		self.move_cost
	}
	/// Get the node numbers of every touching cell
	pub fn get_neighbours(&self) -> &[u32] {
		&self.neighbours
	}
	/// Whether the `(column, row)` terrain square lies within the extent
	pub fn contains_square(&self, column: u32, row: u32) -> bool {
		column >= self.xmin && column < self.xmax && row >= self.zmin && row < self.zmax
	}
	/// Which of this node's boundaries the `other` node touches as a bitmask
	/// of [EDGE_LEFT], [EDGE_RIGHT], [EDGE_TOP] and [EDGE_BOTTOM]. A
	/// corner-diagonal neighbour sets one horizontal and one vertical bit
	pub fn neighbour_relation(&self, other: &QuadtreeNode) -> u8 {
		let mut relation = 0;
		if self.xmin == other.xmax {
			relation |= EDGE_LEFT;
		}
		if self.xmax == other.xmin {
			relation |= EDGE_RIGHT;
		}
		if self.zmin == other.zmax {
			relation |= EDGE_TOP;
		}
		if self.zmax == other.zmin {
			relation |= EDGE_BOTTOM;
		}
		relation
	}
	/// The world-coordinate hand-off point between this node and a touching
	/// `other` node: the midpoint of the boundary segment the two extents
	/// share. For corner-diagonal contact the segment degenerates to the
	/// corner itself. `reference` only contributes its `y` coordinate
	pub fn edge_transition_point(&self, other: &QuadtreeNode, reference: Vec3) -> Vec3 {
		let xmin = self.xmin.max(other.xmin) as f32;
		let zmin = self.zmin.max(other.zmin) as f32;
		let xmax = self.xmax.min(other.xmax) as f32;
		let zmax = self.zmax.min(other.zmax) as f32;
		Vec3::new(
			(xmin + xmax) * 0.5 * SQUARE_SIZE,
			reference.y,
			(zmin + zmax) * 0.5 * SQUARE_SIZE,
		)
	}
	/// Read the precomputed transition point for the neighbour at
	/// `ngb_index` within [Self::get_neighbours]
	pub fn get_cached_transition_point(&self, ngb_index: usize) -> Vec3 {
		self.transition_points[ngb_index]
	}
	/// Record a touching node and its hand-off point, used by the layer while
	/// deriving adjacency
	pub(crate) fn add_neighbour(&mut self, node_number: u32, transition_point: Vec3) {
		self.neighbours.push(node_number);
		self.transition_points.push(transition_point);
	}
}
