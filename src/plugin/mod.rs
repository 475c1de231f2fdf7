//! Defines the Bevy [Plugin] for quadtree pathing
//!

use bevy::prelude::*;

pub mod search_layer;

pub struct QuadtreePathingPlugin;

impl Plugin for QuadtreePathingPlugin {
	fn build(&self, app: &mut App) {
		app.add_event::<search_layer::EventTerrainChange>()
			.add_event::<search_layer::EventPathRequest>()
			.add_event::<search_layer::EventPathComputed>()
			.add_event::<search_layer::EventReleasePath>()
			.add_systems(
				Update,
				(
					search_layer::apply_terrain_changes,
					search_layer::handle_path_requests,
					search_layer::release_paths,
				)
					.chain(),
			);
	}
}
