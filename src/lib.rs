//! # Recipebook Core
#![allow(unexpected_cfgs)]

//! Recipe catalog engine for the Recipebook mobile application.
//!
//! ## Features
//!
//! - Remote recipe feed with offline fallback
//! - Locally created recipes and favorites persisted in SQLite
//! - Search and category filtering
//! - Draft validation for the add-recipe form
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Flutter UI (Dart)                     │
//! ├─────────────────────────────────────────────────────────┤
//! │               flutter_rust_bridge (FFI)                  │
//! ├─────────────────────────────────────────────────────────┤
//! │                 Recipebook Core (Rust)                   │
//! │  ┌─────────┐  ┌──────────┐  ┌────────┐  ┌───────────┐   │
//! │  │ Session │  │ Catalog  │  │ Remote │  │  Storage  │   │
//! │  │ (list)  │──│ Service  │──│  Feed  │  │ (SQLite)  │   │
//! │  └─────────┘  └──────────┘  └────────┘  └───────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```

// Public modules
pub mod api;
pub mod catalog;
pub mod models;
pub mod remote;
pub mod storage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
