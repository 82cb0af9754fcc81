use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use brewup_core::{AggregateRoot, DrinkId, EntityId, entity::position_of};

use crate::classification::{CaffeineLevel, Category, Difficulty, Season, Temperature, TimeOfDay};
use crate::tagged::{self, Equipment, Ingredient};

/// Reserved tag values with app-wide meaning.
pub mod tags {
    /// Shipped with the app.
    pub const DEFAULT: &str = "Default";
    /// Starred by the user.
    pub const FAVORITE: &str = "Favorite";
    /// Authored by the user.
    pub const CREATED_BY_USER: &str = "CreatedByUser";
    /// Arrived through a deep link.
    pub const NEWLY_CREATED: &str = "NewlyCreated";
}

pub const DEFAULT_NAME: &str = "Drink";
pub const DEFAULT_DESCRIPTION: &str = "A tasty drink!";
pub const DEFAULT_IMAGE_NAME: &str = "DefaultCoffeePicture";
pub const DEFAULT_PREP_TIME: i64 = 5;

/// Command: create a drink. Every field has a default.
///
/// Ingredients and equipment are given as names and become owned entities in
/// the order given.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDrink {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub rating: f64,

    pub image_name: String,
    pub image_data: Option<Vec<u8>>,
    pub image_url: Option<Url>,

    pub prep_time: i64,
    pub ingredients: Vec<String>,
    pub equipment: Vec<String>,
    pub instructions: String,

    pub difficulty: Difficulty,
    pub category: Category,
    pub temperature: Temperature,
    pub caffeine_level: CaffeineLevel,
    pub time_of_day: TimeOfDay,
    pub season: Season,

    pub notes: String,

    /// Creation instant; `None` means "now".
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for CreateDrink {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            tags: Vec::new(),
            rating: 0.0,
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            image_data: None,
            image_url: None,
            prep_time: DEFAULT_PREP_TIME,
            ingredients: Vec::new(),
            equipment: Vec::new(),
            instructions: String::new(),
            difficulty: Difficulty::default(),
            category: Category::default(),
            temperature: Temperature::default(),
            caffeine_level: CaffeineLevel::default(),
            time_of_day: TimeOfDay::default(),
            season: Season::default(),
            notes: String::new(),
            created_at: None,
        }
    }
}

/// Aggregate root: a drink recipe.
///
/// The drink owns its ingredient and equipment lists by value; they are never
/// shared with another drink and go away with it. `Clone` is an exact copy
/// (same id); use [`Drink::duplicate`] for a new drink with the same content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drink {
    id: DrinkId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub rating: f64,

    pub image_name: String,
    #[serde(default, with = "crate::media::stored_bytes")]
    pub(crate) image_data: Option<Vec<u8>>,
    pub image_url: Option<Url>,

    /// Minutes. Front ends offer 0..=30; the model accepts any value.
    pub prep_time: i64,
    pub ingredients: Vec<Ingredient>,
    pub equipment: Vec<Equipment>,
    pub instructions: String,

    pub difficulty: Difficulty,
    pub category: Category,
    pub temperature: Temperature,
    pub caffeine_level: CaffeineLevel,
    pub time_of_day: TimeOfDay,
    pub season: Season,

    pub notes: String,

    created_at: DateTime<Utc>,
    last_checked_at: DateTime<Utc>,
}

impl Drink {
    pub fn create(cmd: CreateDrink) -> Self {
        let created_at = cmd.created_at.unwrap_or_else(Utc::now);
        Self {
            id: DrinkId::new(),
            name: cmd.name,
            description: cmd.description,
            tags: cmd.tags,
            rating: cmd.rating,
            image_name: cmd.image_name,
            image_data: cmd.image_data,
            image_url: cmd.image_url,
            prep_time: cmd.prep_time,
            ingredients: tagged::from_names(cmd.ingredients),
            equipment: tagged::from_names(cmd.equipment),
            instructions: cmd.instructions,
            difficulty: cmd.difficulty,
            category: cmd.category,
            temperature: cmd.temperature,
            caffeine_level: cmd.caffeine_level,
            time_of_day: cmd.time_of_day,
            season: cmd.season,
            notes: cmd.notes,
            created_at,
            last_checked_at: created_at,
        }
    }

    /// A new drink with the same content.
    ///
    /// Gets a fresh id and timestamps, and ingredient/equipment entities rebuilt
    /// from their names. `season` is not carried over and resets to
    /// [`Season::Any`]; stored data and shared links depend on this.
    pub fn duplicate(&self) -> Self {
        Self::create(CreateDrink {
            name: self.name.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            rating: self.rating,
            image_name: self.image_name.clone(),
            image_data: self.image_data.clone(),
            image_url: self.image_url.clone(),
            prep_time: self.prep_time,
            ingredients: self.ingredient_names(),
            equipment: self.equipment_names(),
            instructions: self.instructions.clone(),
            difficulty: self.difficulty,
            category: self.category,
            temperature: self.temperature,
            caffeine_level: self.caffeine_level,
            time_of_day: self.time_of_day,
            season: Season::default(),
            notes: self.notes.clone(),
            created_at: None,
        })
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_checked_at(&self) -> DateTime<Utc> {
        self.last_checked_at
    }

    /// Record that the drink's detail view was opened.
    pub fn mark_checked(&mut self) {
        self.mark_checked_at(Utc::now());
    }

    pub fn mark_checked_at(&mut self, at: DateTime<Utc>) {
        self.last_checked_at = at;
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_favorite(&self) -> bool {
        self.has_tag(tags::FAVORITE)
    }

    /// Remove every `"Favorite"` tag if present, otherwise append one.
    pub fn toggle_favorite_tag(&mut self) {
        if self.is_favorite() {
            self.tags.retain(|t| t != tags::FAVORITE);
        } else {
            self.tags.push(tags::FAVORITE.to_string());
        }
    }

    pub fn ingredient_names(&self) -> Vec<String> {
        tagged::names(&self.ingredients)
    }

    pub fn equipment_names(&self) -> Vec<String> {
        tagged::names(&self.equipment)
    }

    pub fn add_ingredient(&mut self, display_name: impl Into<String>) -> EntityId {
        let ingredient = Ingredient::create(display_name);
        let id = *brewup_core::Entity::id(&ingredient);
        self.ingredients.push(ingredient);
        id
    }

    /// Remove an ingredient by id; returns it if it was present.
    pub fn remove_ingredient(&mut self, id: &EntityId) -> Option<Ingredient> {
        position_of(&self.ingredients, id).map(|idx| self.ingredients.remove(idx))
    }

    pub fn add_equipment(&mut self, display_name: impl Into<String>) -> EntityId {
        let equipment = Equipment::create(display_name);
        let id = *brewup_core::Entity::id(&equipment);
        self.equipment.push(equipment);
        id
    }

    pub fn remove_equipment(&mut self, id: &EntityId) -> Option<Equipment> {
        position_of(&self.equipment, id).map(|idx| self.equipment.remove(idx))
    }
}

impl Default for Drink {
    fn default() -> Self {
        Self::create(CreateDrink::default())
    }
}

impl AggregateRoot for Drink {
    type Id = DrinkId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
