//! One [SearchExecutor] serves all requests against one layer. It owns the
//! scratch records and the open heap those searches share, reserves a fresh
//! state offset per search and carries the terrain epoch that invalidates
//! stale records. Because scratch and heap live here, running two layers in
//! parallel only requires giving each its own executor.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Orchestrates path requests for one movement class
#[derive(Component, Default)]
pub struct SearchExecutor {
	/// Per-node search records shared by sequential searches
	scratch: SearchScratch,
	/// The open frontier shared by sequential searches
	open: NodeHeap,
	/// Base stamp of the most recent search
	state_offset: u32,
	/// Terrain-change counter, searches treat records from older epochs as
	/// absent
	terrain_epoch: u32,
	/// Last path ID handed out
	last_path_id: u32,
}

impl SearchExecutor {
	pub fn new() -> Self {
		Self::default()
	}
	/// Record that the terrain changed so older scratch records stop being
	/// trusted
	pub fn notify_terrain_change(&mut self) {
		self.terrain_epoch += 1;
	}
	pub fn get_terrain_epoch(&self) -> u32 {
		self.terrain_epoch
	}
	/// Path IDs are nonzero and unique within this executor's lifetime
	fn allocate_path_id(&mut self) -> u32 {
		self.last_path_id += 1;
		self.last_path_id
	}
	/// Offsets grow by at least the open/closed stride so a fresh search
	/// outranks every stamp an older one left behind
	fn allocate_state_offset(&mut self) -> u32 {
		self.state_offset += NODE_STATE_OFFSET_STEP;
		self.state_offset
	}
	/// Serve one request end to end: resolve the endpoints, try to share a
	/// finished path with an equal request, otherwise run a full search and
	/// install the result. Returns the ID of the path now sitting in the
	/// cache, or [None] when no result exists
	pub fn request_path(
		&mut self,
		layer: &NodeLayer,
		cache: &mut PathCache,
		config: &SearchConfig,
		source_point: Vec3,
		target_point: Vec3,
		search_rect: Option<SearchRect>,
		search_type: SearchType,
	) -> Option<u32> {
		let search_rect =
			search_rect.unwrap_or_else(|| SearchRect::full(layer.get_map_dimensions()));
		let mut search = PathSearch::new(layer, config, search_type);
		search.initialize(source_point, target_point, search_rect);
		let hash = search.get_hash();
		let path_id = self.allocate_path_id();
		let mut path = Path::new(path_id, hash);
		path.alloc_points(2);
		path.set_source_point(search.get_source_point());
		path.set_target_point(search.get_target_point());
		// an equal finished request may already sit in the cache
		match search.shared_finalize(cache, path) {
			Ok(shared_id) => {
				debug!("Path request {} shares waypoints of an equal request", shared_id);
				return Some(shared_id);
			}
			Err(unshared) => path = unshared,
		}
		let state_offset = self.allocate_state_offset();
		if search.execute(&mut self.scratch, &mut self.open, state_offset, self.terrain_epoch) {
			Some(search.finalize(&self.scratch, path, cache))
		} else {
			debug!("Path request from {} to {} found no route", source_point, target_point);
			None
		}
	}
}
