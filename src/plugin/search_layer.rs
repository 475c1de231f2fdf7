//! Logic driving the [SearchExecutor] from request and release events
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A request to plan a path from `source` to `target` across the layer of
/// the given search type, optionally bounded by a search rectangle
#[derive(Event)]
pub struct EventPathRequest {
	/// World position the requester stands at
	source: Vec3,
	/// World position the requester wants to reach
	target: Vec3,
	/// Bounds the expansion, [None] spans the whole map
	search_rect: Option<SearchRect>,
	/// Which cost model drives the search
	search_type: SearchType,
}

impl EventPathRequest {
	pub fn new(
		source: Vec3,
		target: Vec3,
		search_rect: Option<SearchRect>,
		search_type: SearchType,
	) -> Self {
		EventPathRequest {
			source,
			target,
			search_rect,
			search_type,
		}
	}
}

/// Emitted once a request's path sits in the [PathCache], requesters poll
/// the cache with the ID to read their waypoints
#[derive(Event)]
pub struct EventPathComputed {
	/// ID of the freshly installed path
	path_id: u32,
	/// Request hash of the installed path
	hash: u64,
}

impl EventPathComputed {
	pub fn get_path_id(&self) -> u32 {
		self.path_id
	}
	pub fn get_hash(&self) -> u64 {
		self.hash
	}
}

/// An owner is done with its path, deletion from the cache is the sole
/// release
#[derive(Event)]
pub struct EventReleasePath(u32);

impl EventReleasePath {
	pub fn new(path_id: u32) -> Self {
		EventReleasePath(path_id)
	}
}

/// The terrain cost description changed, searches must stop trusting older
/// per-node records
#[derive(Event)]
pub struct EventTerrainChange;

/// Bump the terrain epoch of every executor for each change notification
pub fn apply_terrain_changes(
	mut events: EventReader<EventTerrainChange>,
	mut q_executors: Query<&mut SearchExecutor>,
) {
	for _ in events.read() {
		for mut executor in q_executors.iter_mut() {
			executor.notify_terrain_change();
		}
	}
}

/// Process [EventPathRequest] and install finished paths into the
/// [PathCache], announcing each one with an [EventPathComputed]
pub fn handle_path_requests(
	mut events: EventReader<EventPathRequest>,
	mut q_layers: Query<(
		&NodeLayer,
		&mut PathCache,
		&mut SearchExecutor,
		&SearchConfig,
	)>,
	mut computed: EventWriter<EventPathComputed>,
) {
	for event in events.read() {
		for (layer, mut cache, mut executor, config) in q_layers.iter_mut() {
			if let Some(path_id) = executor.request_path(
				layer,
				&mut cache,
				config,
				event.source,
				event.target,
				event.search_rect,
				event.search_type,
			) {
				debug!("Path {} installed", path_id);
				let hash = cache.get_live_path(path_id).unwrap().get_hash();
				computed.send(EventPathComputed { path_id, hash });
			} else {
				debug!(
					"No route from {:?} to {:?}, request dropped",
					event.source, event.target
				);
			}
		}
	}
}

/// Remove released paths from the [PathCache]
pub fn release_paths(
	mut events: EventReader<EventReleasePath>,
	mut q_caches: Query<&mut PathCache>,
) {
	for event in events.read() {
		for mut cache in q_caches.iter_mut() {
			if cache.delete_path(event.0).is_some() {
				trace!("Path {} released", event.0);
			}
		}
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	fn test_app() -> App {
		let mut app = App::new();
		app.add_plugins(crate::plugin::QuadtreePathingPlugin);
		let map_dimensions = MapDimensions::new(8, 8);
		let costs = vec![1.0; 64];
		let layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
		app.world_mut().spawn((
			map_dimensions,
			layer,
			PathCache::default(),
			SearchExecutor::new(),
			SearchConfig::default(),
		));
		app
	}

	#[test]
	fn request_event_fills_the_cache() {
		let mut app = test_app();
		app.world_mut().send_event(EventPathRequest::new(
			Vec3::new(4.0, 0.0, 4.0),
			Vec3::new(60.0, 0.0, 60.0),
			None,
			SearchType::AStar,
		));
		app.update();
		let mut q_caches = app.world_mut().query::<&PathCache>();
		let cache = q_caches.single(app.world());
		assert_eq!(1, cache.len());
	}
	#[test]
	fn release_event_empties_the_cache() {
		let mut app = test_app();
		app.world_mut().send_event(EventPathRequest::new(
			Vec3::new(4.0, 0.0, 4.0),
			Vec3::new(60.0, 0.0, 60.0),
			None,
			SearchType::AStar,
		));
		app.update();
		app.world_mut().send_event(EventReleasePath::new(1));
		app.update();
		let mut q_caches = app.world_mut().query::<&PathCache>();
		let cache = q_caches.single(app.world());
		assert!(cache.is_empty());
	}
	#[test]
	fn terrain_change_event_bumps_the_epoch() {
		let mut app = test_app();
		app.world_mut().send_event(EventTerrainChange);
		app.update();
		let mut q_executors = app.world_mut().query::<&SearchExecutor>();
		let executor = q_executors.single(app.world());
		assert_eq!(1, executor.get_terrain_epoch());
	}
}
