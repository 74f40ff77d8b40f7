use crate::models::Recipe;
use crate::storage::kv::KeyValueStore;
use anyhow::Context;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

const KEY_RECIPES: &str = "local_recipes";
const KEY_NEXT_ID: &str = "next_recipe_id";
const KEY_FAVORITE_IDS: &str = "favorite_ids";

/// First id handed out to a locally created recipe
pub const FIRST_LOCAL_ID: i32 = 1000;

fn favorite_key(recipe_id: i32) -> String {
    format!("favorite_{}", recipe_id)
}

/// User-created recipes, the local id counter and favorite flags.
///
/// Every read or write failure is absorbed here: reads degrade to "empty",
/// writes report `false` or are logged.
pub struct LocalRecipeStore {
    kv: Arc<dyn KeyValueStore>,
    /// Highest id issued by this instance
    last_issued_id: AtomicI32,
}

impl LocalRecipeStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            last_issued_id: AtomicI32::new(FIRST_LOCAL_ID - 1),
        }
    }

    /// All locally saved recipes in storage order
    pub fn list_local(&self) -> Vec<Recipe> {
        match self.load_recipes() {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!("Treating local recipes as empty: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Build a recipe with a freshly allocated id. The recipe is not persisted.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        name: &str,
        category: &str,
        cooking_time: i32,
        difficulty: &str,
        ingredients: Vec<String>,
        description: &str,
        image_url: &str,
    ) -> Recipe {
        Recipe {
            id: self.next_id(),
            name: name.to_string(),
            category: category.to_string(),
            cooking_time,
            difficulty: difficulty.to_string(),
            ingredients,
            description: description.to_string(),
            image_url: image_url.to_string(),
        }
    }

    /// Append a recipe and persist the whole list
    pub fn add(&self, recipe: Recipe) -> bool {
        let result = self.load_recipes().and_then(|mut recipes| {
            recipes.push(recipe);
            self.save_recipes(&recipes)
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save local recipe: {:#}", e);
                false
            }
        }
    }

    /// Remove the first recipe with the given id. Returns whether anything was removed.
    pub fn delete(&self, recipe_id: i32) -> bool {
        let result = self.load_recipes().and_then(|mut recipes| {
            match recipes.iter().position(|r| r.id == recipe_id) {
                Some(index) => {
                    recipes.remove(index);
                    self.save_recipes(&recipes).map(|_| true)
                }
                None => Ok(false),
            }
        });
        match result {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!("Failed to delete local recipe {}: {:#}", recipe_id, e);
                false
            }
        }
    }

    pub fn is_favorite(&self, recipe_id: i32) -> bool {
        match self.kv.get(&favorite_key(recipe_id)) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!("Failed to read favorite flag for {}: {:#}", recipe_id, e);
                false
            }
        }
    }

    /// Flip the favorite flag; calling twice restores the original state.
    ///
    /// The index is written before the per-id flag and rolled back if the flag
    /// write fails, so `is_favorite` and `list_favorite_ids` always agree.
    pub fn toggle_favorite(&self, recipe_id: i32) {
        let favorite = !self.is_favorite(recipe_id);
        let previous = self.load_favorite_ids();
        let mut ids = previous.clone();
        if favorite {
            ids.insert(recipe_id);
        } else {
            ids.remove(&recipe_id);
        }
        if let Err(e) = self.save_favorite_ids(&ids) {
            tracing::error!("Failed to persist favorite index: {:#}", e);
            return;
        }

        if let Err(e) = self.kv.set(&favorite_key(recipe_id), bool_str(favorite)) {
            tracing::error!("Failed to persist favorite flag for {}: {:#}", recipe_id, e);
            if let Err(e) = self.save_favorite_ids(&previous) {
                tracing::error!("Failed to roll back favorite index: {:#}", e);
            }
        }
    }

    /// Ids whose favorite flag is set, ascending
    pub fn list_favorite_ids(&self) -> Vec<i32> {
        self.load_favorite_ids().into_iter().collect()
    }

    /// Allocate the next local id and persist the advanced counter.
    fn next_id(&self) -> i32 {
        let persisted = match self.kv.get(KEY_NEXT_ID) {
            Ok(Some(raw)) => raw.trim().parse::<i32>().unwrap_or_else(|_| {
                tracing::warn!("Ignoring corrupt id counter {:?}", raw);
                self.first_unused_id()
            }),
            Ok(None) => FIRST_LOCAL_ID,
            Err(e) => {
                tracing::warn!("Failed to read id counter: {:#}", e);
                self.first_unused_id()
            }
        };
        // Never hand out an id twice from this instance, even if the counter write was lost.
        let floor = self
            .last_issued_id
            .load(Ordering::SeqCst)
            .saturating_add(1);
        let id = persisted.max(floor);
        self.last_issued_id.store(id, Ordering::SeqCst);

        match id.checked_add(1) {
            Some(next) => {
                if let Err(e) = self.kv.set(KEY_NEXT_ID, &next.to_string()) {
                    tracing::error!("Failed to persist id counter: {:#}", e);
                }
            }
            None => tracing::error!("Local id space exhausted; counter left at {}", id),
        }
        id
    }

    /// One past the highest stored local id, never below [`FIRST_LOCAL_ID`].
    fn first_unused_id(&self) -> i32 {
        self.list_local()
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(FIRST_LOCAL_ID, |max| max.saturating_add(1).max(FIRST_LOCAL_ID))
    }

    fn load_recipes(&self) -> anyhow::Result<Vec<Recipe>> {
        match self.kv.get(KEY_RECIPES)? {
            Some(json) => serde_json::from_str(&json).context("decoding local recipes"),
            None => Ok(Vec::new()),
        }
    }

    fn save_recipes(&self, recipes: &[Recipe]) -> anyhow::Result<()> {
        let json = serde_json::to_string(recipes).context("encoding local recipes")?;
        self.kv.set(KEY_RECIPES, &json)
    }

    fn load_favorite_ids(&self) -> BTreeSet<i32> {
        let raw = match self.kv.get(KEY_FAVORITE_IDS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorite index: {:#}", e);
                return BTreeSet::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt favorite index: {}", e);
            BTreeSet::new()
        })
    }

    fn save_favorite_ids(&self, ids: &BTreeSet<i32>) -> anyhow::Result<()> {
        let json = serde_json::to_string(ids)?;
        self.kv.set(KEY_FAVORITE_IDS, &json)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
