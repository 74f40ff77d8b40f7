//! Data models for Recipebook
//!
//! These models are shared between Rust and Flutter via flutter_rust_bridge.

pub mod draft;
pub mod recipe;

pub use draft::*;
pub use recipe::*;
