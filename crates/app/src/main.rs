//! `brewup` - manage the drink catalog from the terminal.
//!
//! ```bash
//! brewup list --shelf explore
//! brewup new --tag CreatedByUser
//! brewup share <id>
//! brewup open 'brewup://drink?data=...'
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use brewup_app::{AppConfig, CatalogService};
use brewup_catalog::{CancelSignal, Drink, DrinkImage, HttpImageFetcher, ImageSource};
use brewup_core::{AggregateRoot, DrinkId};
use brewup_store::{DrinkStore, JsonFileDrinkStore};

#[derive(Parser, Debug)]
#[command(name = "brewup", version, about = "Drink recipe catalog", long_about = None)]
struct Cli {
    /// JSON store file (overrides BREWUP_DATA_PATH)
    #[arg(long, value_name = "PATH", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List drinks on a shelf
    List {
        #[arg(long, value_enum, default_value = "all")]
        shelf: Shelf,
    },
    /// Show one drink and mark it viewed
    Show { id: DrinkId },
    /// Create a new drink
    New {
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print a shareable brewup:// link
    Share { id: DrinkId },
    /// Import a drink from a brewup:// link
    Open { url: String },
    /// Toggle the Favorite tag
    Favorite { id: DrinkId },
    Delete { id: DrinkId },
    /// Attach, clear or export a drink's image
    Image {
        id: DrinkId,
        /// Image file to attach (re-encoded as JPEG)
        #[arg(long, value_name = "PATH", conflicts_with_all = ["clear", "out"])]
        file: Option<PathBuf>,
        /// Remove the stored image
        #[arg(long, conflicts_with = "out")]
        clear: bool,
        /// Write the resolved image bytes to a file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Remove every drink
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Shelf {
    All,
    Explore,
    Favorites,
    Mine,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to read configuration")?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    brewup_observability::init(config.log_format);

    let store = JsonFileDrinkStore::open(&config.data_path)
        .with_context(|| format!("failed to open {}", config.data_path.display()))?;
    let service = CatalogService::new(store, config.image_quality);

    if config.seed_defaults {
        service.bootstrap_defaults().context("failed to seed default drinks")?;
    }

    run(&service, cli.command).await
}

async fn run<S: DrinkStore>(service: &CatalogService<S>, command: Command) -> Result<()> {
    match command {
        Command::List { shelf } => {
            let drinks = match shelf {
                Shelf::All => service.all()?,
                Shelf::Explore => service.explore()?,
                Shelf::Favorites => service.favorites()?,
                Shelf::Mine => service.my_recipes()?,
            };
            for drink in &drinks {
                println!("{}  {}  [{}]", drink.id(), drink.name, drink.tags.join(", "));
            }
        }
        Command::Show { id } => {
            let drink = service.mark_viewed(id)?;
            print_drink(&drink);
        }
        Command::New { tags } => {
            let drink = service.create_drink(tags)?;
            println!("{}", drink.id());
        }
        Command::Share { id } => {
            println!("{}", service.share_link(id)?);
        }
        Command::Open { url } => match service.open_deep_link(&url)? {
            Some(id) => println!("{id}"),
            None => anyhow::bail!("not a drink link: {url}"),
        },
        Command::Favorite { id } => {
            let favorite = service.toggle_favorite(id)?;
            println!("{}", if favorite { "favorite" } else { "not favorite" });
        }
        Command::Delete { id } => {
            let drink = service.delete(id)?;
            println!("deleted {}", drink.name);
        }
        Command::Image { id, file, clear, out } => {
            if let Some(path) = file {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                service.attach_image(id, Some(&bytes))?;
            } else if clear {
                service.attach_image(id, None)?;
            } else if let Some(path) = out {
                let fetcher = HttpImageFetcher::new();
                match service.load_image(id, &fetcher, &CancelSignal::never()).await? {
                    Some(DrinkImage::Bytes(bytes)) => std::fs::write(&path, bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?,
                    Some(DrinkImage::Asset(name)) => println!("bundled asset: {name}"),
                    None => anyhow::bail!("image could not be loaded"),
                }
            } else {
                let drink = service.get(id)?;
                match drink.image_source() {
                    ImageSource::Data(bytes) => println!("stored image ({} bytes)", bytes.len()),
                    ImageSource::Remote(url) => println!("remote image: {url}"),
                    ImageSource::Asset(name) => println!("bundled asset: {name}"),
                }
            }
        }
        Command::Clear => {
            let removed = service.clear_all()?;
            println!("removed {removed} drinks");
        }
    }
    Ok(())
}

fn print_drink(drink: &Drink) {
    println!("{}", drink.name);
    println!("  {}", drink.description);
    println!("  id:          {}", drink.id());
    println!("  tags:        {}", drink.tags.join(", "));
    println!("  prep time:   {} min", drink.prep_time);
    println!("  difficulty:  {}", drink.difficulty);
    println!("  category:    {}", drink.category);
    println!("  temperature: {}", drink.temperature);
    println!("  caffeine:    {}", drink.caffeine_level);
    println!("  time of day: {}", drink.time_of_day);
    if !drink.ingredients.is_empty() {
        println!("  ingredients: {}", drink.ingredient_names().join(", "));
    }
    if !drink.equipment.is_empty() {
        println!("  equipment:   {}", drink.equipment_names().join(", "));
    }
    if !drink.instructions.is_empty() {
        println!();
        println!("{}", drink.instructions);
    }
}
