// src/digitization/mod.rs

pub mod api;
pub mod cell;
pub mod document;
pub mod events;
pub mod grid;
pub mod payloads;
pub mod plugin;
pub mod resources;
pub mod row_label;
pub mod session;
pub mod systems;
pub mod workflow;

pub use plugin::DigitizationPlugin;
