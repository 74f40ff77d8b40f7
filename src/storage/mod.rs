//! Local persistence: a string key/value engine and the recipe store built on it

mod kv;
mod recipe_store;

pub use kv::{KeyValueStore, SqliteKeyValueStore, PREFS_FILE_NAME};
pub use recipe_store::{LocalRecipeStore, FIRST_LOCAL_ID};

use std::sync::Arc;

/// Open the durable recipe store under `storage_path`
pub fn open_local_store(storage_path: &str) -> anyhow::Result<LocalRecipeStore> {
    let kv = SqliteKeyValueStore::open(storage_path)?;
    Ok(LocalRecipeStore::new(Arc::new(kv)))
}
