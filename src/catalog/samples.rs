//! Built-in recipes shown when neither the feed nor local storage has anything.
//! They are display-only and never written to storage.

use crate::models::Recipe;

#[allow(clippy::too_many_arguments)]
fn sample(
    id: i32,
    name: &str,
    category: &str,
    cooking_time: i32,
    difficulty: &str,
    description: &str,
    image_url: &str,
    ingredients: &[&str],
) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        category: category.to_string(),
        cooking_time,
        difficulty: difficulty.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
        image_url: image_url.to_string(),
    }
}

/// The four fallback recipes, in display order
pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        sample(
            1,
            "Борщ",
            "Первые блюда",
            90,
            "Средняя",
            "Традиционный украинский суп",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQMrgJV3_FEv9K_up8x-hDo2v4ivUuf3eKJrA&s",
            &["свекла", "капуста", "картофель", "морковь", "лук", "мясо"],
        ),
        sample(
            2,
            "Плов",
            "Вторые блюда",
            120,
            "Сложная",
            "Восточное блюдо из риса и мяса",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQpk9wGpdXHiFxm_Za9lKih-g9es3zFdTFukw&s",
            &["рис", "мясо", "морковь", "лук", "чеснок", "специи"],
        ),
        sample(
            3,
            "Салат Цезарь",
            "Салаты",
            20,
            "Легкая",
            "Классический итальянский салат",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRc6jneChVyyJ2SHKCy22bDgeqpELk4VgqiCA&s",
            &["салат", "курица", "сыр пармезан", "гренки", "соус"],
        ),
        sample(
            4,
            "Наполеон",
            "Десерты",
            180,
            "Сложная",
            "Слоеный торт с кремом",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQ5J1tLxxxcOiyCh3ehG5a4zlLGrSzxFxc8Bw&s",
            &["мука", "масло", "яйца", "сахар", "молоко"],
        ),
    ]
}
