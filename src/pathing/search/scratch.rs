//! Mutable per-node bookkeeping of a search lives here instead of on the
//! nodes themselves, as parallel vectors indexed by node number. The records
//! are never cleared between searches: each search stamps its own state
//! offset and terrain epoch, and any record carrying an older stamp is
//! treated as absent on first touch.
//!

use crate::prelude::*;

/// Per-node search records for one layer, reused across sequential searches
#[derive(Default, Clone)]
pub struct SearchScratch {
	/// Search-state stamps, a fresh search's offset outranks every older one
	states: Vec<u32>,
	/// Terrain-epoch stamps
	magic_numbers: Vec<u32>,
	/// Back-links forming the search tree, [INVALID_NODE] for none
	prev_nodes: Vec<u32>,
	/// Cost of the best known route from the source
	g_costs: Vec<f32>,
	/// Weighted heuristic cost to the target
	h_costs: Vec<f32>,
	/// Heap key, always `g + h`
	f_costs: Vec<f32>,
	/// Accumulated move cost of the nodes along the back-link chain
	m_costs: Vec<f32>,
	/// Length of the back-link chain, feeds the adaptive heuristic weight
	prev_counts: Vec<u32>,
}

impl SearchScratch {
	/// Grow the records to cover `node_count` nodes, existing stamps are kept
	/// since staleness is decided by offset and epoch, not by clearing
	pub fn ensure_capacity(&mut self, node_count: usize) {
		if self.states.len() >= node_count {
			return;
		}
		self.states.resize(node_count, 0);
		self.magic_numbers.resize(node_count, 0);
		self.prev_nodes.resize(node_count, INVALID_NODE);
		self.g_costs.resize(node_count, 0.0);
		self.h_costs.resize(node_count, 0.0);
		self.f_costs.resize(node_count, 0.0);
		self.m_costs.resize(node_count, 0.0);
		self.prev_counts.resize(node_count, 0);
	}
	pub fn get_state(&self, node: u32) -> u32 {
		self.states[node as usize]
	}
	pub fn set_state(&mut self, node: u32, state: u32) {
		self.states[node as usize] = state;
	}
	pub fn get_magic_number(&self, node: u32) -> u32 {
		self.magic_numbers[node as usize]
	}
	pub fn set_magic_number(&mut self, node: u32, magic: u32) {
		self.magic_numbers[node as usize] = magic;
	}
	pub fn get_prev_node(&self, node: u32) -> u32 {
		self.prev_nodes[node as usize]
	}
	pub fn set_prev_node(&mut self, node: u32, prev: u32) {
		self.prev_nodes[node as usize] = prev;
	}
	pub fn get_g_cost(&self, node: u32) -> f32 {
		self.g_costs[node as usize]
	}
	pub fn get_h_cost(&self, node: u32) -> f32 {
		self.h_costs[node as usize]
	}
	pub fn get_f_cost(&self, node: u32) -> f32 {
		self.f_costs[node as usize]
	}
	pub fn get_m_cost(&self, node: u32) -> f32 {
		self.m_costs[node as usize]
	}
	/// Stamp the four path costs at once, `f` is derived so it can never
	/// disagree with `g + h`
	pub fn set_path_costs(&mut self, node: u32, g: f32, h: f32, m: f32) {
		let i = node as usize;
		self.g_costs[i] = g;
		self.h_costs[i] = h;
		self.f_costs[i] = g + h;
		self.m_costs[i] = m;
	}
	pub fn get_prev_count(&self, node: u32) -> u32 {
		self.prev_counts[node as usize]
	}
	pub fn set_prev_count(&mut self, node: u32, count: u32) {
		self.prev_counts[node as usize] = count;
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn capacity_only_grows() {
		let mut scratch = SearchScratch::default();
		scratch.ensure_capacity(8);
		scratch.set_state(7, 42);
		scratch.ensure_capacity(4);
		assert_eq!(42, scratch.get_state(7));
	}
	#[test]
	fn f_cost_is_derived() {
		let mut scratch = SearchScratch::default();
		scratch.ensure_capacity(1);
		scratch.set_path_costs(0, 3.0, 4.0, 2.0);
		assert_eq!(7.0, scratch.get_f_cost(0));
		assert_eq!(4.0, scratch.get_h_cost(0));
		assert_eq!(2.0, scratch.get_m_cost(0));
	}
	#[test]
	fn fresh_records_have_no_back_link() {
		let mut scratch = SearchScratch::default();
		scratch.ensure_capacity(3);
		assert_eq!(INVALID_NODE, scratch.get_prev_node(2));
	}
}
