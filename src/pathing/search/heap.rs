//! An indexed binary min-heap over node numbers keyed by each node's current
//! f-cost in the [SearchScratch]. Every node remembers its heap position so
//! an open node whose f-cost strictly decreased can be re-sorted in place
//! instead of being re-pushed, which would corrupt the queue.
//!
//! Ties break by insertion order since the sifts compare strictly on f.
//!

use crate::prelude::*;

/// The open frontier of a search, bound to one layer's scratch records
#[derive(Default, Clone)]
pub struct NodeHeap {
	/// Heap-ordered node numbers
	nodes: Vec<u32>,
	/// Node number to heap position plus one, zero meaning absent
	positions: Vec<usize>,
}

impl NodeHeap {
	/// Empty the heap and size the position table for `node_count` nodes
	pub fn reset(&mut self, node_count: usize) {
		for node in self.nodes.iter() {
			self.positions[*node as usize] = 0;
		}
		self.nodes.clear();
		if self.positions.len() < node_count {
			self.positions.resize(node_count, 0);
		}
	}
	/// Drop all queued nodes, used to exit the drive loop once the target
	/// has been reached
	pub fn clear(&mut self) {
		for node in self.nodes.iter() {
			self.positions[*node as usize] = 0;
		}
		self.nodes.clear();
	}
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
	pub fn len(&self) -> usize {
		self.nodes.len()
	}
	/// The node with the minimum f-cost
	pub fn top(&self) -> Option<u32> {
		self.nodes.first().copied()
	}
	/// Queue a node, its position is remembered for later re-sorting
	pub fn push(&mut self, node: u32, scratch: &SearchScratch) {
		self.nodes.push(node);
		let i = self.nodes.len() - 1;
		self.positions[node as usize] = i + 1;
		self.sift_up(i, scratch);
	}
	/// Remove and return the node with the minimum f-cost
	pub fn pop(&mut self, scratch: &SearchScratch) -> Option<u32> {
		let top = *self.nodes.first()?;
		self.positions[top as usize] = 0;
		let last = self.nodes.pop().unwrap();
		if !self.nodes.is_empty() {
			self.nodes[0] = last;
			self.positions[last as usize] = 1;
			self.sift_down(0, scratch);
		}
		Some(top)
	}
	/// Restore ordering after `node`'s f-cost strictly decreased while it
	/// was queued
	pub fn resort(&mut self, node: u32, scratch: &SearchScratch) {
		let position = self.positions[node as usize];
		if position == 0 {
			return;
		}
		self.sift_up(position - 1, scratch);
	}
	/// Diagnostic, whether the subtree under `root` satisfies the heap
	/// ordering
	pub fn check_heap_property(&self, root: usize, scratch: &SearchScratch) -> bool {
		let left = root * 2 + 1;
		let right = root * 2 + 2;
		if left < self.nodes.len() {
			if scratch.get_f_cost(self.nodes[left]) < scratch.get_f_cost(self.nodes[root]) {
				return false;
			}
			if !self.check_heap_property(left, scratch) {
				return false;
			}
		}
		if right < self.nodes.len() {
			if scratch.get_f_cost(self.nodes[right]) < scratch.get_f_cost(self.nodes[root]) {
				return false;
			}
			if !self.check_heap_property(right, scratch) {
				return false;
			}
		}
		true
	}
	fn sift_up(&mut self, mut i: usize, scratch: &SearchScratch) {
		while i > 0 {
			let parent = (i - 1) / 2;
			if scratch.get_f_cost(self.nodes[i]) < scratch.get_f_cost(self.nodes[parent]) {
				self.swap(i, parent);
				i = parent;
			} else {
				break;
			}
		}
	}
	fn sift_down(&mut self, mut i: usize, scratch: &SearchScratch) {
		loop {
			let left = i * 2 + 1;
			let right = i * 2 + 2;
			let mut smallest = i;
			if left < self.nodes.len()
				&& scratch.get_f_cost(self.nodes[left]) < scratch.get_f_cost(self.nodes[smallest])
			{
				smallest = left;
			}
			if right < self.nodes.len()
				&& scratch.get_f_cost(self.nodes[right]) < scratch.get_f_cost(self.nodes[smallest])
			{
				smallest = right;
			}
			if smallest == i {
				break;
			}
			self.swap(i, smallest);
			i = smallest;
		}
	}
	fn swap(&mut self, a: usize, b: usize) {
		self.nodes.swap(a, b);
		self.positions[self.nodes[a] as usize] = a + 1;
		self.positions[self.nodes[b] as usize] = b + 1;
	}
}
