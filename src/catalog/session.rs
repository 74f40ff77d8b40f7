//! Main-screen state: the cached catalog plus the current search text and
//! category chip. UI interactions arrive as [`CatalogEvent`] payloads and each
//! one returns the rows to display.

use crate::catalog::service::{filter_recipes, CatalogError, CatalogService, CatalogSnapshot};
use crate::models::{CategoryFilter, Recipe};
use flutter_rust_bridge::frb;
use std::collections::HashMap;
use std::sync::Arc;

/// A user interaction on the recipe list screen
#[derive(Debug, Clone, PartialEq, Eq)]
#[frb]
pub enum CatalogEvent {
    QueryChanged(String),
    CategorySelected(CategoryFilter),
    FavoriteToggled(i32),
    RecipeDeleted(i32),
}

/// Presentation-ready projection of a recipe for one list row
#[derive(Debug, Clone, PartialEq, Eq)]
#[frb]
pub struct RecipeRow {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub cooking_time: String,
    pub ingredient_count: String,
    pub difficulty: String,
    pub difficulty_color: String,
    pub is_favorite: bool,
    pub image_url: String,
    pub description: String,
}

impl RecipeRow {
    pub fn from_recipe(recipe: &Recipe, is_favorite: bool) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            cooking_time: recipe.cooking_time_str(),
            ingredient_count: recipe.ingredient_count_str(),
            difficulty: recipe.difficulty.clone(),
            difficulty_color: recipe.difficulty_level().color_hex(),
            is_favorite,
            image_url: recipe.image_url.clone(),
            description: recipe.description.clone(),
        }
    }
}

/// Everything the list screen needs after an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
#[frb]
pub struct CatalogView {
    pub rows: Vec<RecipeRow>,
    pub count_label: String,
    pub offline: bool,
}

pub struct CatalogSession {
    service: Arc<CatalogService>,
    snapshot: Option<CatalogSnapshot>,
    query: String,
    category: CategoryFilter,
}

impl CatalogSession {
    pub fn new(service: Arc<CatalogService>) -> Self {
        Self {
            service,
            snapshot: None,
            query: String::new(),
            category: CategoryFilter::All,
        }
    }

    /// Reload the base list. Returns whether the catalog is in offline mode.
    pub async fn reload(&mut self) -> Result<bool, CatalogError> {
        let snapshot = self.service.load().await?;
        let offline = snapshot.offline;
        self.set_snapshot(snapshot);
        Ok(offline)
    }

    /// Replace the cached base list with a snapshot loaded elsewhere.
    pub fn set_snapshot(&mut self, snapshot: CatalogSnapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn view(&self) -> CatalogView {
        let rows = self.visible();
        CatalogView {
            count_label: self.label_for(rows.len()),
            rows,
            offline: self.is_offline(),
        }
    }

    pub fn apply(&mut self, event: CatalogEvent) -> Vec<RecipeRow> {
        match event {
            CatalogEvent::QueryChanged(query) => self.query = query,
            CatalogEvent::CategorySelected(category) => self.category = category,
            CatalogEvent::FavoriteToggled(id) => {
                self.service.toggle_favorite(id);
            }
            CatalogEvent::RecipeDeleted(id) => {
                self.delete(id);
            }
        }
        self.visible()
    }

    /// Delete a local recipe and drop it from the cached list.
    /// Returns false when nothing was stored under `id`.
    pub fn delete(&mut self, id: i32) -> bool {
        let deleted = self.service.delete_recipe(id);
        if deleted {
            self.forget_local(id);
        }
        deleted
    }

    /// Rows matching the current query and category, in catalog order.
    /// Each favorite flag is read once per call.
    pub fn visible(&self) -> Vec<RecipeRow> {
        let mut flags: HashMap<i32, bool> = HashMap::new();
        for recipe in self.base() {
            flags
                .entry(recipe.id)
                .or_insert_with(|| self.service.is_favorite(recipe.id));
        }
        let is_favorite = |id: i32| flags.get(&id).copied().unwrap_or(false);

        filter_recipes(self.base(), &self.query, &self.category, is_favorite)
            .iter()
            .map(|recipe| RecipeRow::from_recipe(recipe, is_favorite(recipe.id)))
            .collect()
    }

    pub fn count_label(&self) -> String {
        self.label_for(self.visible().len())
    }

    fn label_for(&self, count: usize) -> String {
        match self.category {
            CategoryFilter::Favorites => format!("Favorite recipes: {}", count),
            _ => format!("Recipes found: {}", count),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.snapshot.as_ref().map(|s| s.offline).unwrap_or(false)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    fn base(&self) -> &[Recipe] {
        self.snapshot
            .as_ref()
            .map(|s| s.recipes.as_slice())
            .unwrap_or(&[])
    }

    /// Drop a deleted local recipe from the cached list without refetching.
    fn forget_local(&mut self, id: i32) {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return;
        };
        let start = snapshot.remote_count as usize;
        let end = (start + snapshot.local_count as usize).min(snapshot.recipes.len());
        if let Some(offset) = snapshot.recipes[start..end].iter().position(|r| r.id == id) {
            snapshot.recipes.remove(start + offset);
            snapshot.local_count -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::StaticRecipeSource;
    use crate::storage::{KeyValueStore, LocalRecipeStore, SqliteKeyValueStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads on top of an in-memory store
    struct CountingStore {
        inner: SqliteKeyValueStore,
        reads: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.inner.set(key, value)
        }
    }

    fn session_with(source: StaticRecipeSource) -> (CatalogSession, Arc<LocalRecipeStore>) {
        let store = Arc::new(LocalRecipeStore::new(Arc::new(
            SqliteKeyValueStore::in_memory().expect("store initializes"),
        )));
        let service = Arc::new(CatalogService::new(Arc::new(source), Arc::clone(&store)));
        (CatalogSession::new(service), store)
    }

    #[tokio::test]
    async fn events_narrow_the_visible_rows() {
        let (mut session, _) = session_with(StaticRecipeSource::failing("offline"));
        assert!(session.reload().await.unwrap());
        assert!(session.is_offline());
        assert_eq!(session.visible().len(), 4);
        assert_eq!(session.count_label(), "Recipes found: 4");

        let rows = session.apply(CatalogEvent::CategorySelected(CategoryFilter::Named(
            "Десерты".to_string(),
        )));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Наполеон");
        assert_eq!(rows[0].cooking_time, "180 min");
        assert_eq!(rows[0].difficulty_color, "#F44336");

        let rows = session.apply(CatalogEvent::QueryChanged("борщ".to_string()));
        assert!(rows.is_empty());
        assert_eq!(session.query(), "борщ");
    }

    #[tokio::test]
    async fn favorites_chip_tracks_toggles() {
        let (mut session, store) = session_with(StaticRecipeSource::with_recipes(vec![]));
        session.reload().await.unwrap();

        let rows = session.apply(CatalogEvent::CategorySelected(CategoryFilter::Favorites));
        assert!(rows.is_empty());
        assert_eq!(session.count_label(), "Favorite recipes: 0");

        let rows = session.apply(CatalogEvent::FavoriteToggled(3));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_favorite);
        assert!(store.is_favorite(3));
        assert_eq!(session.category(), &CategoryFilter::Favorites);
    }

    #[tokio::test]
    async fn deleting_local_recipe_updates_cached_list() {
        let (mut session, store) = session_with(StaticRecipeSource::with_recipes(vec![]));
        let recipe = store.create("Драники", "Вторые блюда", 40, "Средняя", vec!["картофель".into()], "", "");
        assert!(store.add(recipe.clone()));
        session.reload().await.unwrap();
        assert_eq!(session.visible().len(), 1);

        let rows = session.apply(CatalogEvent::RecipeDeleted(recipe.id));
        assert!(rows.is_empty());
        assert!(store.list_local().is_empty());

        // Deleting something that is not stored locally leaves the list alone.
        let rows = session.apply(CatalogEvent::RecipeDeleted(recipe.id));
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn view_bundles_rows_label_and_offline_flag() {
        let (mut session, _) = session_with(StaticRecipeSource::failing("offline"));
        session.reload().await.unwrap();
        session.apply(CatalogEvent::QueryChanged("цез".to_string()));

        let view = session.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.count_label, "Recipes found: 1");
        assert!(view.offline);
    }

    #[tokio::test]
    async fn view_reads_each_favorite_flag_once() {
        let kv = Arc::new(CountingStore {
            inner: SqliteKeyValueStore::in_memory().expect("store initializes"),
            reads: AtomicUsize::new(0),
        });
        let store = Arc::new(LocalRecipeStore::new(kv.clone()));
        let service = Arc::new(CatalogService::new(
            Arc::new(StaticRecipeSource::failing("offline")),
            store,
        ));
        let mut session = CatalogSession::new(service);
        session.reload().await.unwrap();
        session.apply(CatalogEvent::CategorySelected(CategoryFilter::Favorites));

        let before = kv.reads.load(Ordering::SeqCst);
        let view = session.view();
        assert_eq!(kv.reads.load(Ordering::SeqCst) - before, 4);
        assert!(view.rows.is_empty());
        assert_eq!(view.count_label, "Favorite recipes: 0");
    }

    #[test]
    fn rows_before_first_load_are_empty() {
        let (session, _) = session_with(StaticRecipeSource::with_recipes(vec![]));
        assert!(session.visible().is_empty());
        assert!(!session.is_offline());
    }
}
