use crate::catalog::samples::sample_recipes;
use crate::models::{CategoryFilter, Recipe, RecipeDraft, ValidationError};
use crate::remote::RecipeSource;
use crate::storage::LocalRecipeStore;
use flutter_rust_bridge::frb;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("a catalog load is already in progress")]
    LoadInProgress,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateRecipeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to save recipe")]
    Storage,
}

/// Result of one catalog load
#[derive(Debug, Clone)]
#[frb]
pub struct CatalogSnapshot {
    /// Remote entries, then local entries, then samples if both were empty
    pub recipes: Vec<Recipe>,
    /// The remote fetch failed; only local or sample data is shown
    pub offline: bool,
    pub used_samples: bool,
    pub remote_count: u32,
    pub local_count: u32,
}

/// Merges the remote feed with locally saved recipes and answers filter queries.
pub struct CatalogService {
    source: Arc<dyn RecipeSource>,
    store: Arc<LocalRecipeStore>,
    loading: AtomicBool,
}

/// Clears the in-flight flag when a load finishes or is dropped.
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CatalogService {
    pub fn new(source: Arc<dyn RecipeSource>, store: Arc<LocalRecipeStore>) -> Self {
        Self {
            source,
            store,
            loading: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &LocalRecipeStore {
        &self.store
    }

    /// Fetch, merge and fall back. Only one load runs at a time; an overlapping
    /// call is dropped with [`CatalogError::LoadInProgress`].
    pub async fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Catalog load already in progress; dropping request");
            return Err(CatalogError::LoadInProgress);
        }
        let _guard = LoadGuard(&self.loading);

        let mut recipes = Vec::new();
        let mut offline = false;
        match self.source.fetch_recipes().await {
            Ok(payload) => {
                let remote = payload.into_recipes();
                tracing::info!("Loaded {} recipes from remote feed", remote.len());
                recipes.extend(remote);
            }
            Err(e) => {
                tracing::warn!("Remote recipe fetch failed, showing saved recipes: {}", e);
                offline = true;
            }
        }
        let remote_count = recipes.len() as u32;

        let local = self.store.list_local();
        let local_count = local.len() as u32;
        if local_count > 0 {
            tracing::debug!("Loaded {} local recipes", local_count);
        }
        recipes.extend(local);

        let used_samples = recipes.is_empty();
        if used_samples {
            tracing::info!("No recipes available; adding built-in samples");
            recipes.extend(sample_recipes());
        }

        Ok(CatalogSnapshot {
            recipes,
            offline,
            used_samples,
            remote_count,
            local_count,
        })
    }

    /// Stable filter by name substring and category, using stored favorite flags.
    pub fn filter(&self, all: &[Recipe], query: &str, category: &CategoryFilter) -> Vec<Recipe> {
        filter_recipes(all, query, category, |id| self.store.is_favorite(id))
    }

    /// Validate a draft, then allocate an id and save it. Nothing is written if validation fails.
    pub fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, CreateRecipeError> {
        let valid = draft.validate()?;
        let recipe = self.store.create(
            &valid.name,
            &valid.category,
            valid.cooking_time,
            &valid.difficulty,
            valid.ingredients,
            &valid.description,
            &valid.image_url,
        );
        if !self.store.add(recipe.clone()) {
            return Err(CreateRecipeError::Storage);
        }
        tracing::info!("Saved local recipe {} ({})", recipe.id, recipe.name);
        Ok(recipe)
    }

    pub fn delete_recipe(&self, recipe_id: i32) -> bool {
        self.store.delete(recipe_id)
    }

    pub fn is_favorite(&self, recipe_id: i32) -> bool {
        self.store.is_favorite(recipe_id)
    }

    /// Flip the favorite flag and return the new state
    pub fn toggle_favorite(&self, recipe_id: i32) -> bool {
        self.store.toggle_favorite(recipe_id);
        self.store.is_favorite(recipe_id)
    }

    pub fn favorite_ids(&self) -> Vec<i32> {
        self.store.list_favorite_ids()
    }
}

/// Keep recipes whose name contains `query` (case-insensitive) and that match `category`.
/// Input order is preserved.
pub fn filter_recipes<F>(
    all: &[Recipe],
    query: &str,
    category: &CategoryFilter,
    is_favorite: F,
) -> Vec<Recipe>
where
    F: Fn(i32) -> bool,
{
    let needle = query.to_lowercase();
    all.iter()
        .filter(|recipe| needle.is_empty() || recipe.name.to_lowercase().contains(&needle))
        .filter(|recipe| match category {
            CategoryFilter::All => true,
            CategoryFilter::Favorites => is_favorite(recipe.id),
            CategoryFilter::Named(name) => recipe.category == *name,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{StaticRecipeSource, StaticResponse};
    use crate::storage::SqliteKeyValueStore;
    use std::time::Duration;

    fn local_store() -> Arc<LocalRecipeStore> {
        Arc::new(LocalRecipeStore::new(Arc::new(
            SqliteKeyValueStore::in_memory().expect("store initializes"),
        )))
    }

    fn service(source: StaticRecipeSource, store: Arc<LocalRecipeStore>) -> CatalogService {
        CatalogService::new(Arc::new(source), store)
    }

    fn remote_recipe(id: i32, name: &str, category: &str) -> Recipe {
        Recipe {
            id,
            name: name.to_string(),
            category: category.to_string(),
            cooking_time: 30,
            difficulty: "Средняя".to_string(),
            ingredients: vec!["вода".to_string()],
            description: String::new(),
            image_url: String::new(),
        }
    }

    fn draft(name: &str, cooking_time: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            category: "Закуски".to_string(),
            difficulty: "Легкая".to_string(),
            cooking_time: cooking_time.to_string(),
            ingredients: "хлеб\nсало".to_string(),
            description: String::new(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn empty_remote_with_one_local_recipe_skips_samples() {
        let store = local_store();
        let recipe = store.create("Test", "Салаты", 10, "Легкая", vec!["x".into()], "", "");
        assert_eq!(recipe.id, 1000);
        assert!(store.add(recipe.clone()));

        let catalog = service(StaticRecipeSource::with_recipes(vec![]), store);
        let snapshot = catalog.load().await.unwrap();

        assert_eq!(snapshot.recipes, vec![recipe]);
        assert!(!snapshot.offline);
        assert!(!snapshot.used_samples);
    }

    #[tokio::test]
    async fn failed_fetch_with_empty_store_shows_samples_offline() {
        let catalog = service(StaticRecipeSource::failing("no network"), local_store());
        let snapshot = catalog.load().await.unwrap();

        let ids: Vec<i32> = snapshot.recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(snapshot.offline);
        assert!(snapshot.used_samples);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_local_recipes() {
        let store = local_store();
        let recipe = store.create("Окрошка", "Первые блюда", 30, "Легкая", vec!["квас".into()], "", "");
        assert!(store.add(recipe.clone()));

        let catalog = service(StaticRecipeSource::failing("timeout"), store);
        let snapshot = catalog.load().await.unwrap();
        assert_eq!(snapshot.recipes, vec![recipe]);
        assert!(snapshot.offline);
        assert!(!snapshot.used_samples);
    }

    #[tokio::test]
    async fn missing_recipe_list_counts_as_empty() {
        let catalog = service(
            StaticRecipeSource::new(StaticResponse::MissingList),
            local_store(),
        );
        let snapshot = catalog.load().await.unwrap();
        assert!(!snapshot.offline);
        assert!(snapshot.used_samples);
        assert_eq!(snapshot.recipes.len(), 4);
    }

    #[tokio::test]
    async fn remote_entries_come_first_and_collisions_are_kept() {
        let store = local_store();
        let local = store.create("Местный", "Салаты", 5, "Легкая", vec!["y".into()], "", "");
        assert!(store.add(local.clone()));

        let remote = vec![
            remote_recipe(10, "Уха", "Первые блюда"),
            remote_recipe(1000, "Дубль", "Салаты"),
        ];
        let catalog = service(StaticRecipeSource::with_recipes(remote.clone()), store);
        let snapshot = catalog.load().await.unwrap();

        let ids: Vec<i32> = snapshot.recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 1000, 1000]);
        assert_eq!(snapshot.recipes[2], local);
        assert_eq!(snapshot.remote_count, 2);
        assert_eq!(snapshot.local_count, 1);
    }

    #[tokio::test]
    async fn samples_are_never_persisted() {
        let store = local_store();
        let catalog = service(StaticRecipeSource::failing("down"), Arc::clone(&store));
        catalog.load().await.unwrap();
        assert!(store.list_local().is_empty());
    }

    #[tokio::test]
    async fn overlapping_load_is_dropped() {
        let catalog = Arc::new(service(
            StaticRecipeSource::with_recipes(vec![remote_recipe(1, "Борщ", "Первые блюда")])
                .with_delay(Duration::from_millis(200)),
            local_store(),
        ));

        let first = {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.load().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(catalog.load().await.err(), Some(CatalogError::LoadInProgress));

        let snapshot = first.await.unwrap().unwrap();
        assert_eq!(snapshot.recipes.len(), 1);
        // The flag is released once the first load completes.
        assert!(catalog.load().await.is_ok());
    }

    #[test]
    fn empty_query_and_all_returns_input_unchanged() {
        let samples = sample_recipes();
        let out = filter_recipes(&samples, "", &CategoryFilter::All, |_| false);
        assert_eq!(out, samples);
    }

    #[test]
    fn query_is_case_insensitive_for_cyrillic() {
        let samples = sample_recipes();
        let out = filter_recipes(&samples, "цез", &CategoryFilter::All, |_| false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Салат Цезарь");

        let out = filter_recipes(&samples, "ПЛОВ", &CategoryFilter::All, |_| false);
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn category_and_query_are_anded_and_order_is_kept() {
        let recipes = vec![
            remote_recipe(1, "Суп гороховый", "Первые блюда"),
            remote_recipe(2, "Суп-салат", "Салаты"),
            remote_recipe(3, "Суп рыбный", "Первые блюда"),
        ];
        let out = filter_recipes(
            &recipes,
            "суп",
            &CategoryFilter::Named("Первые блюда".to_string()),
            |_| false,
        );
        let ids: Vec<i32> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(recipes.len(), 3);
    }

    #[test]
    fn favorites_filter_uses_stored_flags() {
        let store = local_store();
        store.toggle_favorite(2);
        store.toggle_favorite(4);
        let catalog = service(StaticRecipeSource::with_recipes(vec![]), store);

        let out = catalog.filter(&sample_recipes(), "", &CategoryFilter::Favorites);
        let ids: Vec<i32> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let out = catalog.filter(&sample_recipes(), "нап", &CategoryFilter::Favorites);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn filter_output_is_a_subsequence() {
        let samples = sample_recipes();
        for query in ["", "а", "о", "zzz"] {
            for category in [
                CategoryFilter::All,
                CategoryFilter::Favorites,
                CategoryFilter::Named("Салаты".to_string()),
            ] {
                let out = filter_recipes(&samples, query, &category, |id| id % 2 == 0);
                let mut cursor = samples.iter();
                for recipe in &out {
                    assert!(cursor.any(|r| r == recipe), "{query:?} {category:?}");
                }
            }
        }
    }

    #[test]
    fn create_recipe_rejects_negative_time_without_writing() {
        let store = local_store();
        let catalog = service(StaticRecipeSource::with_recipes(vec![]), Arc::clone(&store));

        let err = catalog.create_recipe(&draft("Бутерброд", "-5")).unwrap_err();
        assert_eq!(
            err,
            CreateRecipeError::Invalid(ValidationError::InvalidCookingTime)
        );
        assert!(store.list_local().is_empty());

        // The failed attempt must not have consumed an id either.
        let recipe = catalog.create_recipe(&draft("Бутерброд", "5")).unwrap();
        assert_eq!(recipe.id, 1000);
    }

    #[test]
    fn create_recipe_persists_valid_draft() {
        let store = local_store();
        let catalog = service(StaticRecipeSource::with_recipes(vec![]), Arc::clone(&store));
        let first = catalog.create_recipe(&draft("Гренки", "10")).unwrap();
        let second = catalog.create_recipe(&draft("Канапе", "15")).unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.ingredients, vec!["хлеб", "сало"]);
        assert_eq!(store.list_local(), vec![first, second]);
    }

    #[test]
    fn toggle_favorite_reports_new_state() {
        let catalog = service(StaticRecipeSource::with_recipes(vec![]), local_store());
        assert!(catalog.toggle_favorite(1));
        assert_eq!(catalog.favorite_ids(), vec![1]);
        assert!(!catalog.toggle_favorite(1));
        assert!(catalog.favorite_ids().is_empty());
    }
}
