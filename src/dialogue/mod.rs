//! Guided dialogue: a scripted menu tree over the static portfolio content.

pub mod content;
pub mod engine;
pub mod menu;
pub mod state;
