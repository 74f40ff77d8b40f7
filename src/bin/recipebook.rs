//! Command-line front end for the recipe catalog.
//!
//! Usage:
//! ```
//! cargo run --bin recipebook -- --storage-path ./recipebook_data list
//! cargo run --bin recipebook -- search борщ --category "Первые блюда"
//! ```

use rust_lib_recipebook::api::recipes_api::{
    apply_catalog_event, create_default_config, create_recipe, delete_recipe, filter_recipes,
    init_catalog, list_favorite_ids, load_recipes, toggle_favorite, CatalogConfig,
};
use rust_lib_recipebook::catalog::{CatalogEvent, CatalogView};
use rust_lib_recipebook::models::{CategoryFilter, RecipeDraft};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

enum Command {
    List,
    Search { query: String, category: String },
    Add(RecipeDraft),
    Delete(i32),
    Favorite(i32),
    Favorites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let (config, command) = parse_args()?;

    init_catalog(config).map_err(anyhow::Error::msg)?;

    match command {
        Command::List => {
            let view = load_recipes().await.map_err(anyhow::Error::msg)?;
            print_view(&view);
        }
        Command::Search { query, category } => {
            load_recipes().await.map_err(anyhow::Error::msg)?;
            let view = filter_recipes(query, category).map_err(anyhow::Error::msg)?;
            print_view(&view);
        }
        Command::Add(draft) => {
            let recipe = create_recipe(draft).map_err(anyhow::Error::msg)?;
            println!("Added recipe #{} {}", recipe.id, recipe.name);
        }
        Command::Delete(id) => {
            if delete_recipe(id).map_err(anyhow::Error::msg)? {
                println!("Deleted recipe #{id}");
            } else {
                println!("No local recipe #{id}");
            }
        }
        Command::Favorite(id) => {
            let favorite = toggle_favorite(id).map_err(anyhow::Error::msg)?;
            println!(
                "Recipe #{id} {}",
                if favorite { "added to favorites" } else { "removed from favorites" }
            );
        }
        Command::Favorites => {
            load_recipes().await.map_err(anyhow::Error::msg)?;
            let view = apply_catalog_event(CatalogEvent::CategorySelected(
                CategoryFilter::Favorites,
            ))
            .map_err(anyhow::Error::msg)?;
            print_view(&view);
            tracing::debug!("favorite ids: {:?}", list_favorite_ids());
        }
    }

    Ok(())
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn print_view(view: &CatalogView) {
    if view.offline {
        println!("(offline mode)");
    }
    for row in &view.rows {
        println!(
            "{:>5}  {}{}  [{}]  {}  {}  {}",
            row.id,
            if row.is_favorite { "★ " } else { "" },
            row.name,
            row.category,
            row.cooking_time,
            row.difficulty,
            row.ingredient_count
        );
    }
    println!("{}", view.count_label);
}

fn parse_args() -> anyhow::Result<(CatalogConfig, Command)> {
    let mut args = std::env::args().skip(1);
    let mut config = create_default_config();
    let mut positional = Vec::new();
    let mut category = String::new();
    let mut draft = RecipeDraft::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--storage-path" => {
                if let Some(path) = args.next() {
                    config.storage_path = path;
                }
            }
            "--base-url" => {
                if let Some(url) = args.next() {
                    config.base_url = url;
                }
            }
            "--category" => {
                if let Some(value) = args.next() {
                    category = value.clone();
                    draft.category = value;
                }
            }
            "--difficulty" => draft.difficulty = args.next().unwrap_or_default(),
            "--time" => draft.cooking_time = args.next().unwrap_or_default(),
            "--ingredients" => {
                // Comma-separated on the command line, one per line in the draft
                draft.ingredients = args.next().unwrap_or_default().replace(',', "\n");
            }
            "--description" => draft.description = args.next().unwrap_or_default(),
            "--image-url" => draft.image_url = args.next().unwrap_or_default(),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ if arg.starts_with("--") => {
                eprintln!("Unknown argument: {arg}");
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("list") => Command::List,
        Some("search") => Command::Search {
            query: positional.next().unwrap_or_default(),
            category,
        },
        Some("add") => {
            draft.name = positional.next().unwrap_or_default();
            Command::Add(draft)
        }
        Some("delete") => Command::Delete(parse_id(positional.next())?),
        Some("favorite") => Command::Favorite(parse_id(positional.next())?),
        Some("favorites") => Command::Favorites,
        Some(other) => anyhow::bail!("Unknown command: {other} (see --help)"),
    };

    Ok((config, command))
}

fn parse_id(value: Option<String>) -> anyhow::Result<i32> {
    let value = value.ok_or_else(|| anyhow::anyhow!("recipe id required"))?;
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid recipe id: {value}"))
}

fn print_help() {
    eprintln!("Recipebook catalog");
    eprintln!();
    eprintln!("Usage: recipebook [OPTIONS] [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                    Show the catalog (default)");
    eprintln!("  search <TEXT>           Search by name, narrowed by --category");
    eprintln!("  add <NAME>              Create a local recipe from the draft options");
    eprintln!("  delete <ID>             Delete a local recipe");
    eprintln!("  favorite <ID>           Toggle the favorite flag");
    eprintln!("  favorites               Show favorite recipes");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --storage-path <PATH>   Directory for the preferences database (default: ./)");
    eprintln!("  --base-url <URL>        Remote feed base URL (env: RECIPES_BASE_URL)");
    eprintln!("  --category <NAME>       Category chip or draft category");
    eprintln!("  --difficulty <LABEL>    Draft difficulty (Легкая, Средняя, Сложная)");
    eprintln!("  --time <MINUTES>        Draft cooking time");
    eprintln!("  --ingredients <A,B,..>  Draft ingredients, comma-separated");
    eprintln!("  --description <TEXT>    Draft description");
    eprintln!("  --image-url <URL>       Draft image URL");
    eprintln!("  --help, -h              Show this help");
}
