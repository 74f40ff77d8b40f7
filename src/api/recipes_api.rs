//! Recipe API for Flutter
//!
//! This module provides the main API for driving the recipe catalog from Flutter.

use flutter_rust_bridge::frb;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

use crate::catalog::{CatalogEvent, CatalogService, CatalogSession, CatalogView};
use crate::models::{
    CategoryFilter, Recipe, RecipeDraft, DIFFICULTY_LABELS, RECIPE_CATEGORIES,
};
use crate::remote::{HttpRecipeSource, RecipeSource, DEFAULT_BASE_URL};
use crate::storage;

/// Environment variable overriding the remote feed base URL
pub const BASE_URL_ENV: &str = "RECIPES_BASE_URL";

struct CatalogState {
    service: Arc<CatalogService>,
    session: Mutex<CatalogSession>,
}

// Global catalog, installed by init_catalog
static CATALOG: Lazy<Mutex<Option<Arc<CatalogState>>>> = Lazy::new(|| Mutex::new(None));

/// Get the version of the Recipebook core library
#[frb(sync)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Prefix of the daily log files written in release builds
#[cfg_attr(debug_assertions, allow(dead_code))]
const LOG_FILE_PREFIX: &str = "recipebook_core";

/// Set up logging. Safe to call more than once; later calls keep the first subscriber.
///
/// Debug builds log to stderr. Release builds append to a daily file under
/// `{storage_path}/logs`.
#[allow(unused_variables)]
pub fn init_core(storage_path: Option<String>) -> Result<bool, String> {
    let level = log_level_from_env();

    #[cfg(debug_assertions)]
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    #[cfg(not(debug_assertions))]
    {
        let dir = log_dir(storage_path.as_deref());
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("cannot create log directory {}: {}", dir.display(), e))?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX));
        // The writer flushes on guard drop; the app logs until exit
        std::mem::forget(guard);
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(writer)
            .try_init();
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Recipebook core ready");
    Ok(true)
}

/// Level named by `RUST_LOG` (`error` .. `trace`, or `off`); `info` otherwise
fn log_level_from_env() -> tracing::level_filters::LevelFilter {
    use tracing::level_filters::LevelFilter;

    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| raw.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO)
}

#[cfg_attr(debug_assertions, allow(dead_code))]
fn log_dir(storage_path: Option<&str>) -> std::path::PathBuf {
    let base = storage_path.map(str::trim).filter(|p| !p.is_empty()).unwrap_or(".");
    std::path::Path::new(base).join("logs")
}

/// Catalog configuration
#[derive(Debug, Clone)]
#[frb]
pub struct CatalogConfig {
    /// Base URL of the remote feed; `recipes` is appended
    pub base_url: String,
    /// Directory holding the preferences database
    pub storage_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_path: "./".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Defaults, with the base URL taken from `RECIPES_BASE_URL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        config
    }
}

#[frb(sync)]
pub fn create_default_config() -> CatalogConfig {
    CatalogConfig::from_env()
}

/// Open local storage and connect to the remote feed.
/// Re-initializing replaces the previous catalog.
pub fn init_catalog(config: CatalogConfig) -> Result<bool, String> {
    if config.storage_path.trim().is_empty() {
        return Err("storage_path cannot be empty".to_string());
    }
    let source = HttpRecipeSource::new(&config.base_url).map_err(|e| e.to_string())?;
    tracing::info!(
        "Initializing catalog (endpoint={}, storage_path={})",
        source.endpoint(),
        config.storage_path
    );
    init_catalog_with_source(&config.storage_path, Arc::new(source))
}

/// Same as [`init_catalog`] but with a caller-supplied remote source.
#[frb(ignore)]
pub fn init_catalog_with_source(
    storage_path: &str,
    source: Arc<dyn RecipeSource>,
) -> Result<bool, String> {
    let store = storage::open_local_store(storage_path).map_err(|e| {
        tracing::error!("Failed to open local store: {:#}", e);
        format!("{:#}", e)
    })?;
    let service = Arc::new(CatalogService::new(source, Arc::new(store)));
    let state = Arc::new(CatalogState {
        session: Mutex::new(CatalogSession::new(Arc::clone(&service))),
        service,
    });

    let mut guard = CATALOG.lock().map_err(|e| format!("lock poisoned: {}", e))?;
    *guard = Some(state);
    Ok(true)
}

fn catalog() -> Result<Arc<CatalogState>, String> {
    let guard = CATALOG.lock().map_err(|e| format!("lock poisoned: {}", e))?;
    guard
        .clone()
        .ok_or_else(|| "catalog not initialized".to_string())
}

fn with_session<T>(f: impl FnOnce(&mut CatalogSession) -> T) -> Result<T, String> {
    let state = catalog()?;
    let mut session = state
        .session
        .lock()
        .map_err(|e| format!("lock poisoned: {}", e))?;
    Ok(f(&mut session))
}

/// Load (or reload) the catalog and return the rows for the current filters.
pub async fn load_recipes() -> Result<CatalogView, String> {
    let state = catalog()?;
    let snapshot = state.service.load().await.map_err(|e| e.to_string())?;
    if snapshot.offline {
        tracing::info!("Catalog loaded in offline mode");
    }
    with_session(|session| {
        session.set_snapshot(snapshot);
        session.view()
    })
}

/// Apply a list-screen interaction to the cached catalog
#[frb(sync)]
pub fn apply_catalog_event(event: CatalogEvent) -> Result<CatalogView, String> {
    with_session(|session| {
        session.apply(event);
        session.view()
    })
}

/// Set search text and category chip in one call. `category` is a chip label;
/// `Все` and `Избранное` select all and favorites.
#[frb(sync)]
pub fn filter_recipes(query: String, category: String) -> Result<CatalogView, String> {
    with_session(|session| {
        session.apply(CatalogEvent::QueryChanged(query));
        session.apply(CatalogEvent::CategorySelected(CategoryFilter::from_label(
            &category,
        )));
        session.view()
    })
}

/// Validate and save a new local recipe. Call `load_recipes` afterwards to show it.
#[frb(sync)]
pub fn create_recipe(draft: RecipeDraft) -> Result<Recipe, String> {
    let state = catalog()?;
    state.service.create_recipe(&draft).map_err(|e| {
        tracing::warn!("Recipe creation rejected: {}", e);
        e.to_string()
    })
}

/// Delete a locally created recipe; false if no local recipe has that id
#[frb(sync)]
pub fn delete_recipe(recipe_id: i32) -> Result<bool, String> {
    with_session(|session| session.delete(recipe_id))
}

/// Flip the favorite flag; returns the new state
#[frb(sync)]
pub fn toggle_favorite(recipe_id: i32) -> Result<bool, String> {
    Ok(catalog()?.service.toggle_favorite(recipe_id))
}

#[frb(sync)]
pub fn is_favorite(recipe_id: i32) -> Result<bool, String> {
    Ok(catalog()?.service.is_favorite(recipe_id))
}

#[frb(sync)]
pub fn list_favorite_ids() -> Result<Vec<i32>, String> {
    Ok(catalog()?.service.favorite_ids())
}

#[frb(sync)]
pub fn list_local_recipes() -> Result<Vec<Recipe>, String> {
    Ok(catalog()?.service.store().list_local())
}

/// Categories offered by the add-recipe form
#[frb(sync)]
pub fn recipe_categories() -> Vec<String> {
    RECIPE_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

/// Difficulty labels offered by the add-recipe form
#[frb(sync)]
pub fn difficulty_labels() -> Vec<String> {
    DIFFICULTY_LABELS.iter().map(|s| s.to_string()).collect()
}
