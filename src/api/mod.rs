//! Recipebook API - Flutter-Rust Bridge Interface
//!
//! This module defines the public API that Flutter can call.
//! All functions here are automatically exposed via flutter_rust_bridge.

pub mod recipes_api;
