// src/digitization/systems/mod.rs

pub mod edits;
pub mod feedback;
pub mod probe;
pub mod upload;
pub mod validation;
