//! Recipe model
//!
//! A single dish entry, either fetched from the remote feed or created on device.

use flutter_rust_bridge::frb;
use serde::{Deserialize, Deserializer, Serialize};

/// Image used when a locally created recipe has no image URL.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=Рецепт";

/// Categories offered when creating a recipe. Locally added recipes may use any string.
pub const RECIPE_CATEGORIES: [&str; 5] = [
    "Первые блюда",
    "Вторые блюда",
    "Салаты",
    "Десерты",
    "Закуски",
];

/// Difficulty labels offered when creating a recipe.
pub const DIFFICULTY_LABELS: [&str; 3] = ["Легкая", "Средняя", "Сложная"];

/// Category chip that matches every recipe
pub const CATEGORY_ALL: &str = "Все";
/// Category chip that matches favorited recipes
pub const CATEGORY_FAVORITES: &str = "Избранное";

/// Difficulty of a recipe, parsed from its free-form label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[frb]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Label we don't recognize; rendered neutrally
    Unknown,
}

impl Difficulty {
    /// Parse a difficulty label (lossy, defaults to Unknown)
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "легкая" | "лёгкая" | "easy" => Difficulty::Easy,
            "средняя" | "medium" => Difficulty::Medium,
            "сложная" | "hard" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }

    /// Chip color for this difficulty
    #[frb(sync)]
    pub fn color_hex(&self) -> String {
        match self {
            Difficulty::Easy => "#4CAF50",
            Difficulty::Medium => "#FF9800",
            Difficulty::Hard => "#F44336",
            Difficulty::Unknown => "#9E9E9E",
        }
        .to_string()
    }
}

/// Category selection used when filtering the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[frb]
pub enum CategoryFilter {
    /// Every recipe, regardless of category
    #[default]
    All,
    /// Only recipes whose favorite flag is set
    Favorites,
    /// Exact category match
    Named(String),
}

impl CategoryFilter {
    /// Map a category chip label to a filter, honoring the two reserved labels.
    /// A blank label means no chip is selected.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "" | CATEGORY_ALL => CategoryFilter::All,
            CATEGORY_FAVORITES => CategoryFilter::Favorites,
            _ => CategoryFilter::Named(label.to_string()),
        }
    }

    #[frb(sync)]
    pub fn label(&self) -> String {
        match self {
            CategoryFilter::All => CATEGORY_ALL.to_string(),
            CategoryFilter::Favorites => CATEGORY_FAVORITES.to_string(),
            CategoryFilter::Named(name) => name.clone(),
        }
    }
}

/// A recipe as stored locally and as served by the remote feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[frb]
pub struct Recipe {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Minutes
    #[serde(default, deserialize_with = "null_as_default")]
    pub cooking_time: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

/// Body of `GET /recipes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[frb]
pub struct RecipeResponse {
    #[serde(default)]
    pub recipes: Option<Vec<Recipe>>,
}

impl RecipeResponse {
    /// Recipes carried by the payload; an absent list is empty
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.recipes.unwrap_or_default()
    }
}

impl Recipe {
    /// Cooking time as formatted string
    #[frb(sync)]
    pub fn cooking_time_str(&self) -> String {
        format!("{} min", self.cooking_time)
    }

    #[frb(sync)]
    pub fn ingredient_count(&self) -> u32 {
        self.ingredients.len() as u32
    }

    /// Ingredient count as formatted string
    #[frb(sync)]
    pub fn ingredient_count_str(&self) -> String {
        format!("{} ingredients", self.ingredient_count())
    }

    #[frb(sync)]
    pub fn difficulty_level(&self) -> Difficulty {
        Difficulty::from_label(&self.difficulty)
    }

    /// Plain-text body used when sharing a recipe
    #[frb(sync)]
    pub fn share_text(&self) -> String {
        let mut out = format!("Recipe: {}\n\n", self.name);
        if !self.description.is_empty() {
            out.push_str(&self.description);
            out.push_str("\n\n");
        }
        out.push_str(&format!("Cooking time: {}\n", self.cooking_time_str()));
        out.push_str(&format!("Difficulty: {}\n\n", self.difficulty));
        out.push_str("Ingredients:\n");
        for ingredient in &self.ingredients {
            out.push_str(&format!("• {}\n", ingredient));
        }
        out
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
