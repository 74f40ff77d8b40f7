//! Remote recipe feed.
//!
//! The feed is a single unauthenticated `GET {base}/recipes`. The catalog
//! holds a `RecipeSource` so tests can swap in a canned source.

mod client;

pub use client::{FetchError, HttpRecipeSource, RecipeSource, StaticRecipeSource, StaticResponse};

/// Base URL of the public recipe feed
pub const DEFAULT_BASE_URL: &str = "https://1587d059-0024-4c40-a185-79ab06931fed.mock.pstmn.io/";
