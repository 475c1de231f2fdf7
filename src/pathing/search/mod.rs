//! The search driver and the per-layer machinery it runs on
//!

pub mod executor;
pub mod heap;
pub mod path_search;
pub mod scratch;

/// Low search-state bit of a node sitting on the open frontier
pub const NODE_STATE_OPEN: u32 = 0;
/// Low search-state bit of a node that has been expanded
pub const NODE_STATE_CLOSED: u32 = 1;
/// Each search reserves a state offset this far above the previous one so
/// the low open/closed bit can never collide with an older search's stamp
pub const NODE_STATE_OFFSET_STEP: u32 = 2;

/// Which cost model drives the expansion order
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchType {
	/// Heuristic-guided, the heuristic weight applies in full
	#[default]
	AStar,
	/// Plain uniform-cost expansion, the heuristic is zeroed
	Dijkstra,
}
