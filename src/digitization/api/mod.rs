// src/digitization/api/mod.rs

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod stub_server;

pub use client::{ImageUpload, OcrApiClient};
pub use error::ApiError;
