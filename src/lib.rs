//! Procedural city generator.
//!
//! Lays out a grid of blocks, each a grid of box buildings whose height falls
//! off with distance from the city origin, plus a ground plane under all of
//! it. Generation writes through the [`systems::city::scene::Scene`] trait, so
//! the same run can target Bevy entities or the in-memory
//! [`systems::city::buffer::SceneBuffer`].

pub mod config;
pub mod systems;
