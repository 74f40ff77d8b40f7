//! Recipe creation input and its validation.

use flutter_rust_bridge::frb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::recipe::PLACEHOLDER_IMAGE_URL;

/// Raw form input for a new recipe, exactly as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[frb]
pub struct RecipeDraft {
    pub name: String,
    pub category: String,
    pub difficulty: String,
    /// Minutes, still unparsed
    pub cooking_time: String,
    /// One ingredient per line
    pub ingredients: String,
    pub description: String,
    pub image_url: String,
}

/// Field-level rejection of a draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("category required")]
    CategoryRequired,
    #[error("difficulty required")]
    DifficultyRequired,
    #[error("invalid cooking time")]
    InvalidCookingTime,
    #[error("at least one ingredient required")]
    IngredientsRequired,
}

/// A draft that passed validation; every field is trimmed and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub name: String,
    pub category: String,
    pub difficulty: String,
    pub cooking_time: i32,
    pub ingredients: Vec<String>,
    pub description: String,
    pub image_url: String,
}

impl RecipeDraft {
    /// Check the draft field by field, reporting the first failure.
    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::CategoryRequired);
        }
        let difficulty = self.difficulty.trim();
        if difficulty.is_empty() {
            return Err(ValidationError::DifficultyRequired);
        }
        let cooking_time = parse_cooking_time(&self.cooking_time)?;
        let ingredients = split_ingredients(&self.ingredients);
        if ingredients.is_empty() {
            return Err(ValidationError::IngredientsRequired);
        }
        let image_url = match self.image_url.trim() {
            "" => PLACEHOLDER_IMAGE_URL.to_string(),
            url => url.to_string(),
        };

        Ok(ValidatedDraft {
            name: name.to_string(),
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            cooking_time,
            ingredients,
            description: self.description.trim().to_string(),
            image_url,
        })
    }
}

fn parse_cooking_time(raw: &str) -> Result<i32, ValidationError> {
    match raw.trim().parse::<i32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ValidationError::InvalidCookingTime),
    }
}

/// Split multiline ingredient input, dropping blank lines.
pub fn split_ingredients(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
