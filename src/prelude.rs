//! `use bevy_quadtree_pathing_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::pathing::{
	nodes::{node::*, node_layer::*, *},
	paths::*,
	search::{executor::*, heap::*, path_search::*, scratch::*, *},
	utilities::*,
	*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{search_layer::*, *},
};
