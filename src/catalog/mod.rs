//! Recipe catalog: remote + local merge, fallback samples, filtering and
//! the list-screen session built on top of them.

mod samples;
mod service;
mod session;

pub use samples::sample_recipes;
pub use service::{
    filter_recipes, CatalogError, CatalogService, CatalogSnapshot, CreateRecipeError,
};
pub use session::{CatalogEvent, CatalogSession, CatalogView, RecipeRow};
