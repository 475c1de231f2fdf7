//! Measure building a large NodeLayer from a cost grid
//!

use bevy_quadtree_pathing_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a layer with scattered impassable squares
fn init_node_layer(map_length: u32, map_depth: u32) {
	let map_dimensions = MapDimensions::new(map_length, map_depth);
	let mut costs = vec![1.0; (map_length * map_depth) as usize];
	// wall off every eighth column apart from a gap at its middle
	for column in (4..map_length).step_by(8) {
		for row in 0..map_depth {
			if row != map_depth / 2 {
				costs[(row * map_length + column) as usize] = f32::INFINITY;
			}
		}
	}
	let _node_layer = NodeLayer::from_cost_grid(0, map_dimensions, &costs);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("smaller_sample");
	group.significance_level(0.05).sample_size(20);
	group.bench_function("init_node_layer", |b| {
		b.iter(|| init_node_layer(black_box(48), black_box(48)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
