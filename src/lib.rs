//! This is a plugin for Bevy game engine to handle the logic of searching for unit paths across a quadtree partition of the map
//!

pub mod pathing;
pub mod bundle;
pub mod plugin;

pub mod prelude;
