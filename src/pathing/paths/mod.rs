//! Finished paths and the cache that owns them
//!
//! A [Path] is the product of a search: the waypoint sequence from a source
//! point to a target point together with a bounding rectangle. Every path is
//! keyed by a nonzero ID and by the request hash so that later requests
//! resolving to the same node pair can share the finished waypoints instead
//! of searching again.
//!
//! Once a path is installed the [PathCache] owns it, deleting it from the
//! cache is the sole way to release it.
//!

use std::collections::BTreeMap;

use bevy::prelude::*;

/// An ordered sequence of world waypoints, source first, target last
#[derive(Default, Clone, Debug)]
pub struct Path {
	/// Nonzero identity within a cache generation
	id: u32,
	/// Request hash, equal hashes mean equal endpoint nodes and movement
	/// class
	hash: u64,
	/// The waypoints, at least two once allocated
	points: Vec<Vec3>,
	/// Minimum corner of the bounding rectangle
	bounding_box_mins: Vec3,
	/// Maximum corner of the bounding rectangle
	bounding_box_maxs: Vec3,
}

impl Path {
	/// Create a new instance of [Path] with no waypoints yet
	pub fn new(id: u32, hash: u64) -> Self {
		Path {
			id,
			hash,
			points: Vec::new(),
			bounding_box_mins: Vec3::ZERO,
			bounding_box_maxs: Vec3::ZERO,
		}
	}
	pub fn get_id(&self) -> u32 {
		self.id
	}
	pub fn get_hash(&self) -> u64 {
		self.hash
	}
	/// Resize the waypoint list to `count` zeroed points
	pub fn alloc_points(&mut self, count: usize) {
		self.points.clear();
		self.points.resize(count, Vec3::ZERO);
	}
	pub fn num_points(&self) -> usize {
		self.points.len()
	}
	/// NB: This will panic if out of bounds
	pub fn set_point(&mut self, index: usize, point: Vec3) {
		self.points[index] = point;
	}
	/// NB: This will panic if out of bounds
	pub fn get_point(&self, index: usize) -> Vec3 {
		self.points[index]
	}
	/// Set the first waypoint
	pub fn set_source_point(&mut self, point: Vec3) {
		self.points[0] = point;
	}
	/// Set the last waypoint
	pub fn set_target_point(&mut self, point: Vec3) {
		let last = self.points.len() - 1;
		self.points[last] = point;
	}
	pub fn get_source_point(&self) -> Vec3 {
		self.points[0]
	}
	pub fn get_target_point(&self) -> Vec3 {
		self.points[self.points.len() - 1]
	}
	/// Overwrite the waypoint list with `other`'s, endpoints included
	pub fn copy_points(&mut self, other: &Path) {
		self.points.clear();
		self.points.extend_from_slice(&other.points);
	}
	/// Recompute the bounding rectangle over all waypoints
	pub fn set_bounding_box(&mut self) {
		let mut mins = Vec3::splat(f32::MAX);
		let mut maxs = Vec3::splat(f32::MIN);
		for point in self.points.iter() {
			mins = mins.min(*point);
			maxs = maxs.max(*point);
		}
		self.bounding_box_mins = mins;
		self.bounding_box_maxs = maxs;
	}
	/// Get the `(mins, maxs)` corners of the bounding rectangle
	pub fn get_bounding_box(&self) -> (Vec3, Vec3) {
		(self.bounding_box_mins, self.bounding_box_maxs)
	}
}

/// Owner of every finished path of a layer, keyed by path ID with a hash
/// index for sharing
#[derive(Component, Default)]
pub struct PathCache {
	/// Finished paths by ID
	live_paths: BTreeMap<u32, Path>,
	/// Request hash to path ID, so equal requests can share waypoints
	hash_index: BTreeMap<u64, u32>,
}

impl PathCache {
	/// Take ownership of a finished path. Fails and drops nothing when a
	/// path with the same ID is already installed
	pub fn add_live_path(&mut self, path: Path) -> bool {
		if self.live_paths.contains_key(&path.get_id()) {
			warn!("Live path {} already installed", path.get_id());
			return false;
		}
		self.hash_index.insert(path.get_hash(), path.get_id());
		self.live_paths.insert(path.get_id(), path);
		true
	}
	/// Release a path, the sole way one leaves the cache
	pub fn delete_path(&mut self, path_id: u32) -> Option<Path> {
		let path = self.live_paths.remove(&path_id)?;
		// another live path may have taken over the hash slot
		if self.hash_index.get(&path.get_hash()) == Some(&path_id) {
			self.hash_index.remove(&path.get_hash());
		}
		Some(path)
	}
	pub fn get_live_path(&self, path_id: u32) -> Option<&Path> {
		self.live_paths.get(&path_id)
	}
	/// Find a finished path for an equal request, the sharing lookup
	pub fn get_live_path_by_hash(&self, hash: u64) -> Option<&Path> {
		let path_id = self.hash_index.get(&hash)?;
		self.live_paths.get(path_id)
	}
	pub fn len(&self) -> usize {
		self.live_paths.len()
	}
	pub fn is_empty(&self) -> bool {
		self.live_paths.is_empty()
	}
}
