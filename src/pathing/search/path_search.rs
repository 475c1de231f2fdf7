//! The driver walks a [NodeLayer] from a source to a target point, expanding
//! the cheapest open node until the target is reached or the frontier runs
//! dry. Path segments pay the average move cost of the node they cross, the
//! heuristic is weighted so it stays of the same order as the travel cost.
//! If it under-weighs the search degenerates into uniform-cost expansion, if
//! it over-weighs the paths degrade, so the flat-terrain default is the
//! inverse of the average relative speed modifier (0.5), giving 2.0.
//!
//! Expansion aims for the middle of the edge shared between two nodes which
//! can produce slightly bent paths, the smoothing pass straightens those
//! afterwards by sliding waypoints along their shared edges.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A single source-to-target search against one layer
pub struct PathSearch<'a> {
	layer: &'a NodeLayer,
	config: &'a SearchConfig,
	search_type: SearchType,
	/// Clamped start of the search
	src_point: Vec3,
	/// Clamped goal, snapped onto the reachable minimum when only a partial
	/// result exists
	tgt_point: Vec3,
	/// Hand-off point reached so far, advanced while nodes are expanded
	cur_point: Vec3,
	/// Hand-off point of the neighbour being scored
	nxt_point: Vec3,
	src_node: u32,
	tgt_node: u32,
	cur_node: u32,
	nxt_node: u32,
	/// Expanded node with the lowest heuristic cost, the fallback target
	min_node: u32,
	search_rect: SearchRect,
	search_state: u32,
	search_magic: u32,
	h_cost_mult: f32,
	/// Whether the source node itself is impassable, its move cost then
	/// reads as zero for the duration of the search so a unit standing on a
	/// partially blocked cell can still leave it without the emitted path
	/// accumulating infinite cost
	src_blocked: bool,
	have_full_path: bool,
	have_part_path: bool,
	/// Neighbour numbers copied out of the current node when the config
	/// asks for buffered expansion
	ngb_buffer: Vec<u32>,
}

impl<'a> PathSearch<'a> {
	pub fn new(layer: &'a NodeLayer, config: &'a SearchConfig, search_type: SearchType) -> Self {
		PathSearch {
			layer,
			config,
			search_type,
			src_point: Vec3::ZERO,
			tgt_point: Vec3::ZERO,
			cur_point: Vec3::ZERO,
			nxt_point: Vec3::ZERO,
			src_node: INVALID_NODE,
			tgt_node: INVALID_NODE,
			cur_node: INVALID_NODE,
			nxt_node: INVALID_NODE,
			min_node: INVALID_NODE,
			search_rect: SearchRect::default(),
			search_state: 0,
			search_magic: 0,
			h_cost_mult: 0.0,
			src_blocked: false,
			have_full_path: false,
			have_part_path: false,
			ngb_buffer: Vec::new(),
		}
	}
	/// Clamp the endpoints into the map and resolve the nodes they fall in
	pub fn initialize(&mut self, source_point: Vec3, target_point: Vec3, search_rect: SearchRect) {
		let map_dimensions = self.layer.get_map_dimensions();
		self.src_point = map_dimensions.clamp_in_bounds(source_point);
		self.tgt_point = map_dimensions.clamp_in_bounds(target_point);
		self.cur_point = self.src_point;
		self.nxt_point = self.tgt_point;
		self.search_rect = search_rect;
		let (src_column, src_row) = map_dimensions.world_to_square(self.src_point);
		let (tgt_column, tgt_row) = map_dimensions.world_to_square(self.tgt_point);
		self.src_node = self.layer.get_node_number_at(src_column, src_row);
		self.tgt_node = self.layer.get_node_number_at(tgt_column, tgt_row);
		self.cur_node = INVALID_NODE;
		self.nxt_node = INVALID_NODE;
		self.min_node = self.src_node;
	}
	/// Run the search to completion. Returns whether any usable result
	/// exists, full or partial; with a partial result the target is snapped
	/// onto the midpoint of the closest reachable node so a follower can
	/// still decide it has arrived
	pub fn execute(
		&mut self,
		scratch: &mut SearchScratch,
		open: &mut NodeHeap,
		search_state_offset: u32,
		search_magic_number: u32,
	) -> bool {
		self.search_state = search_state_offset;
		self.search_magic = search_magic_number;
		self.have_full_path = self.src_node == self.tgt_node;
		self.have_part_path = false;
		// early-out
		if self.have_full_path {
			return true;
		}
		self.h_cost_mult = match self.search_type {
			SearchType::AStar => 1.0,
			SearchType::Dijkstra => 0.0,
		};
		self.src_blocked = self
			.layer
			.get_node_by_number(self.src_node)
			.get_move_cost()
			.is_infinite();
		scratch.ensure_capacity(self.layer.get_node_count());
		open.reset(self.layer.get_node_count());
		self.update_node(
			scratch,
			self.src_node,
			INVALID_NODE,
			0.0,
			self.src_point.distance(self.tgt_point),
			self.effective_move_cost(self.src_node),
		);
		open.push(self.src_node, scratch);
		while !open.is_empty() {
			self.iterate(scratch, open);
			self.have_full_path = self.cur_node == self.tgt_node;
			self.have_part_path = self.min_node != self.src_node;
			if self.have_full_path {
				open.clear();
			}
		}
		// adjust the target point if we only got a partial result, otherwise
		// a follower can never decide it is at its goal and will spin over
		// the last waypoint
		if self.config.partial_searches && !self.have_full_path && self.have_part_path {
			let min_node = self.layer.get_node_by_number(self.min_node);
			self.tgt_node = self.min_node;
			self.tgt_point.x = min_node.xmid() * SQUARE_SIZE;
			self.tgt_point.z = min_node.zmid() * SQUARE_SIZE;
		}
		self.have_full_path || self.have_part_path
	}
	/// The move cost the search reads for a node, the blocked source reads
	/// as freely passable while the search runs
	fn effective_move_cost(&self, node: u32) -> f32 {
		if self.src_blocked && node == self.src_node {
			return 0.0;
		}
		self.layer.get_node_by_number(node).get_move_cost()
	}
	/// Stamp a node's scratch record as reached via `prev` with the given
	/// costs
	fn update_node(
		&self,
		scratch: &mut SearchScratch,
		nxt_node: u32,
		prev_node: u32,
		g_cost: f32,
		h_cost: f32,
		m_cost: f32,
	) {
		// the heuristic can never be strictly admissible on an irregular
		// partition where a node only carries an averaged move cost, paths
		// are "nearly optimal"
		scratch.set_state(nxt_node, self.search_state | NODE_STATE_OPEN);
		scratch.set_prev_node(nxt_node, prev_node);
		scratch.set_path_costs(nxt_node, g_cost, h_cost * self.h_cost_mult, m_cost);
		if self.config.weighted_heuristic {
			let count = if prev_node != INVALID_NODE {
				scratch.get_prev_count(prev_node) + 1
			} else {
				0
			};
			scratch.set_prev_count(nxt_node, count);
		}
	}
	/// Expand the cheapest open node into its neighbours
	fn iterate(&mut self, scratch: &mut SearchScratch, open: &mut NodeHeap) {
		let layer = self.layer;
		let config = self.config;
		let Some(cur_node) = open.pop(scratch) else {
			return;
		};
		self.cur_node = cur_node;
		scratch.set_state(cur_node, self.search_state | NODE_STATE_CLOSED);
		if config.conservative_neighbour_updates {
			// otherwise the layer maintenance stamps epochs outside the
			// search
			scratch.set_magic_number(cur_node, self.search_magic);
		}
		debug_assert!(open.check_heap_property(0, scratch));
		if cur_node == self.tgt_node {
			return;
		}
		if cur_node != self.src_node {
			let prev_node = scratch.get_prev_node(cur_node);
			self.cur_point = layer
				.get_node_by_number(cur_node)
				.edge_transition_point(layer.get_node_by_number(prev_node), self.cur_point);
		}
		if self.effective_move_cost(cur_node).is_infinite() {
			return;
		}
		let cur_ref = layer.get_node_by_number(cur_node);
		if cur_ref.xmid() < self.search_rect.x1 as f32 {
			return;
		}
		if cur_ref.zmid() < self.search_rect.z1 as f32 {
			return;
		}
		if cur_ref.xmid() > self.search_rect.x2 as f32 {
			return;
		}
		if cur_ref.zmid() > self.search_rect.z2 as f32 {
			return;
		}
		if config.partial_searches {
			// remember the node with the lowest h-cost in case the search
			// never reaches the target
			if scratch.get_h_cost(cur_node) < scratch.get_h_cost(self.min_node) {
				self.min_node = cur_node;
			}
		}
		let h_weight = if config.weighted_heuristic {
			(scratch.get_m_cost(cur_node) / (scratch.get_prev_count(cur_node) + 1) as f32).sqrt()
		} else {
			// flat terrain carries a relative speed modifier of 0.5 on
			// average, its inverse keeps the heuristic of the same order as
			// the travel cost
			2.0
		};
		let num_ngbs = if config.copy_neighbour_nodes {
			self.ngb_buffer.clear();
			self.ngb_buffer.extend_from_slice(cur_ref.get_neighbours());
			self.ngb_buffer.len()
		} else {
			cur_ref.get_neighbours().len()
		};
		let cur_move_cost = self.effective_move_cost(cur_node);
		for i in 0..num_ngbs {
			let nxt_node = if config.copy_neighbour_nodes {
				self.ngb_buffer[i]
			} else {
				cur_ref.get_neighbours()[i]
			};
			self.nxt_node = nxt_node;
			self.nxt_point = if config.cached_edge_points {
				cur_ref.get_cached_transition_point(i)
			} else {
				cur_ref.edge_transition_point(layer.get_node_by_number(nxt_node), self.cur_point)
			};
			if self.effective_move_cost(nxt_node).is_infinite() {
				continue;
			}
			let is_current = scratch.get_state(nxt_node) >= self.search_state;
			let is_closed = (scratch.get_state(nxt_node) & 1) == NODE_STATE_CLOSED;
			let is_target = nxt_node == self.tgt_node;
			let target_gate = if is_target { 1.0 } else { 0.0 };
			// plain distances, squared ones would bias the search towards
			// smaller cells
			let g_dist = self.cur_point.distance(self.nxt_point);
			let h_dist = self.nxt_point.distance(self.tgt_point);
			// crossing into the target pays the target's own cost as well,
			// every other step only pays for traversing the current node
			let nxt_move_cost = self.effective_move_cost(nxt_node);
			let m_cost = scratch.get_m_cost(cur_node) + cur_move_cost + nxt_move_cost * target_gate;
			let g_cost = scratch.get_g_cost(cur_node)
				+ cur_move_cost * g_dist
				+ nxt_move_cost * h_dist * target_gate;
			let h_cost = h_weight * h_dist * (1.0 - target_gate);
			if !is_current {
				self.update_node(scratch, nxt_node, cur_node, g_cost, h_cost, m_cost);
				open.push(nxt_node, scratch);
				debug_assert!(open.check_heap_property(0, scratch));
				continue;
			}
			if g_cost >= scratch.get_g_cost(nxt_node) {
				continue;
			}
			// a strictly better route may re-open a closed node
			if is_closed {
				open.push(nxt_node, scratch);
			}
			self.update_node(scratch, nxt_node, cur_node, g_cost, h_cost, m_cost);
			// restore ordering, changing the f-cost of a queued node messes
			// up the queue's internal consistency
			open.resort(nxt_node, scratch);
			debug_assert!(open.check_heap_property(0, scratch));
		}
	}
	/// Reconstruct the waypoints, optionally smooth them, stamp the bounding
	/// box and hand the finished path over to the cache, which owns it until
	/// an explicit delete
	pub fn finalize(&self, scratch: &SearchScratch, mut path: Path, cache: &mut PathCache) -> u32 {
		self.trace_path(scratch, &mut path);
		if self.config.smooth_paths {
			self.smooth_path(scratch, &mut path);
		}
		path.set_bounding_box();
		let path_id = path.get_id();
		cache.add_live_path(path);
		path_id
	}
	/// Walk the back-links from the target to the source, emitting the
	/// edge-transition points in source-to-target order
	fn trace_path(&self, scratch: &SearchScratch, path: &mut Path) {
		let layer = self.layer;
		let mut points = Vec::new();
		if self.src_node != self.tgt_node {
			let mut tmp_node = self.tgt_node;
			let mut prv_node = scratch.get_prev_node(tmp_node);
			let mut prv_point = self.tgt_point;
			while prv_node != INVALID_NODE && tmp_node != self.src_node {
				let tmp_point = layer
					.get_node_by_number(tmp_node)
					.edge_transition_point(layer.get_node_by_number(prv_node), prv_point);
				assert!(tmp_point.x.is_finite() && tmp_point.z.is_finite());
				assert!(tmp_node != prv_node);
				// waypoints must never coincide, the one exception being the
				// target point landing exactly on its first transition point
				assert!(tmp_point != prv_point || tmp_node == self.tgt_node);
				if tmp_point != prv_point {
					points.push(tmp_point);
				}
				prv_point = tmp_point;
				tmp_node = prv_node;
				prv_node = scratch.get_prev_node(tmp_node);
			}
		}
		// if source equals target two points suffice
		if !points.is_empty() {
			path.alloc_points(points.len() + 2);
		} else {
			assert!(path.num_points() == 2);
		}
		// the walk collected them target-first, write them back in
		// source-to-target order between the endpoints
		let num_points = path.num_points();
		for (i, point) in points.iter().enumerate() {
			path.set_point(num_points - 2 - i, *point);
		}
		path.set_source_point(self.src_point);
		path.set_target_point(self.tgt_point);
	}
	/// Pull waypoints along their shared edges towards the straight line
	/// through their neighbours, walking the back-link chain from the target
	/// end to the source
	fn smooth_path(&self, scratch: &SearchScratch, path: &mut Path) {
		if path.num_points() == 2 {
			return;
		}
		let layer = self.layer;
		let mut n0;
		let mut n1 = self.tgt_node;
		debug_assert!(scratch.get_prev_node(self.src_node) == INVALID_NODE);
		let mut ni = path.num_points();
		while n1 != self.src_node {
			n0 = n1;
			n1 = scratch.get_prev_node(n0);
			if n1 == INVALID_NODE {
				break;
			}
			ni -= 1;
			// a transition point that collapsed into the target during
			// tracing shortens the waypoint walk
			if ni < 2 {
				break;
			}
			let r0 = layer.get_node_by_number(n0);
			let r1 = layer.get_node_by_number(n1);
			let ngb_rel = r0.neighbour_relation(r1);
			assert!(ngb_rel != 0);
			assert!(r1.neighbour_relation(r0) != 0);
			let p0 = path.get_point(ni);
			let mut p1 = path.get_point(ni - 1);
			let p2 = path.get_point(ni - 2);
			// check if the angle between segments p0-p1 and p1-p2 can be
			// reduced (ideally to zero, making p0-p2 a straight line)
			// without either segment crossing into other nodes
			//
			// p1 always lies on the node to the right and/or bottom of the
			// shared edge between p0 and p2 and may only move along the
			// edge dimension within the extent overlap
			let p1p0 = (p1 - p0).normalize_or_zero();
			let p2p1 = (p2 - p1).normalize_or_zero();
			let p2p0 = (p2 - p0).normalize_or_zero();
			let dot = p1p0.dot(p2p1);
			// nearly parallel already
			if dot >= 0.995 {
				continue;
			}
			// both flags set means p1 sits in a corner
			let h_edge = (ngb_rel & (EDGE_TOP | EDGE_BOTTOM)) != 0;
			let v_edge = (ngb_rel & (EDGE_LEFT | EDGE_RIGHT)) != 0;
			assert!(h_edge || v_edge);
			// the range within which p1 can be moved
			let xmin = r1.xmin().max(r0.xmin()) as f32 * SQUARE_SIZE;
			let zmin = r1.zmin().max(r0.zmin()) as f32 * SQUARE_SIZE;
			let xmax = r1.xmax().min(r0.xmax()) as f32 * SQUARE_SIZE;
			let zmax = r1.zmax().min(r0.zmax()) as f32 * SQUARE_SIZE;
			{
				// intersect the ray p0-p2 with the edge, if the hit lies
				// within the range use it and move on
				let mut pi = Vec3::ZERO;
				let dfx = if p2p0.x > 0.0 {
					(r0.xmax() as f32 * SQUARE_SIZE) - p0.x
				} else {
					(r0.xmin() as f32 * SQUARE_SIZE) - p0.x
				};
				let dfz = if p2p0.z > 0.0 {
					(r0.zmax() as f32 * SQUARE_SIZE) - p0.z
				} else {
					(r0.zmin() as f32 * SQUARE_SIZE) - p0.z
				};
				let dx = if p2p0.x.abs() > 0.001 { p2p0.x } else { 0.001 };
				let dz = if p2p0.z.abs() > 0.001 { p2p0.z } else { 0.001 };
				let tx = dfx / dx;
				let tz = dfz / dz;
				if h_edge {
					pi.x = p0.x + p2p0.x * tz;
					pi.z = p1.z;
				}
				if v_edge {
					pi.x = p1.x;
					pi.z = p0.z + p2p0.z * tx;
				}
				let ok = pi.x >= xmin && pi.x <= xmax && pi.z >= zmin && pi.z <= zmax;
				if ok {
					assert!(pi.x.is_finite() && pi.z.is_finite());
					path.set_point(ni - 1, pi);
					continue;
				}
			}
			if h_edge != v_edge {
				// substitute the edge end-points for p1 and keep whichever
				// straightens the two segments the most
				let mut e0 = p1;
				let mut e1 = p1;
				if h_edge {
					e0.x = xmin;
					e1.x = xmax;
				}
				if v_edge {
					e0.z = zmin;
					e1.z = zmax;
				}
				let e0p0 = (e0 - p0).normalize_or_zero();
				let p2e0 = (p2 - e0).normalize_or_zero();
				let dot0 = e0p0.dot(p2e0);
				let e1p0 = (e1 - p0).normalize_or_zero();
				let p2e1 = (p2 - e1).normalize_or_zero();
				let dot1 = e1p0.dot(p2e1);
				// neither end-point is an improvement
				if dot > dot0.max(dot1) {
					continue;
				}
				if dot0 > dot1.max(dot) {
					p1 = e0;
				}
				if dot1 > dot0.max(dot) {
					p1 = e1;
				}
				assert!(p1.x.is_finite() && p1.z.is_finite());
				path.set_point(ni - 1, p1);
			}
		}
	}
	/// The fast path for requests whose endpoints already resolved to a
	/// finished path in the cache: when the two target points lie within the
	/// configured sharing radius the waypoints are copied over and `path`
	/// is installed, otherwise it is handed back for a full search
	pub fn shared_finalize(&self, cache: &mut PathCache, mut path: Path) -> Result<u32, Path> {
		assert!(path.get_id() != 0);
		assert!(path.num_points() == 2);
		let Some(src_path) = cache.get_live_path_by_hash(path.get_hash()) else {
			return Err(path);
		};
		assert!(path.get_id() != src_path.get_id());
		let p0 = src_path.get_target_point();
		let p1 = path.get_target_point();
		let radius = self.config.shared_target_radius;
		if p0.distance_squared(p1) < radius * radius {
			path.copy_points(src_path);
			path.set_source_point(self.src_point);
			path.set_target_point(self.tgt_point);
			path.set_bounding_box();
			let path_id = path.get_id();
			cache.add_live_path(path);
			Ok(path_id)
		} else {
			Err(path)
		}
	}
	/// Identity of this request within its layer: collision free as long as
	/// the layer's node count bounds its node numbers
	pub fn get_hash(&self) -> u64 {
		let n = self.layer.get_node_count() as u64;
		let k = self.layer.get_movement_class() as u64;
		self.src_node as u64 + self.tgt_node as u64 * n + k * n * n
	}
	pub fn get_source_point(&self) -> Vec3 {
		self.src_point
	}
	/// The clamped target, snapped onto the reachable minimum after a
	/// partial search
	pub fn get_target_point(&self) -> Vec3 {
		self.tgt_point
	}
	pub fn get_source_node(&self) -> u32 {
		self.src_node
	}
	pub fn get_target_node(&self) -> u32 {
		self.tgt_node
	}
	/// The node expanded last
	pub fn get_current_node(&self) -> u32 {
		self.cur_node
	}
	/// The neighbour scored last
	pub fn get_next_node(&self) -> u32 {
		self.nxt_node
	}
	pub fn have_full_path(&self) -> bool {
		self.have_full_path
	}
	pub fn have_part_path(&self) -> bool {
		self.have_part_path
	}
}
