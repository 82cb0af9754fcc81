//! Shareable drink records and the legacy pipe-delimited list encoding.
//!
//! A record is the small, string-keyed form of a drink that travels inside deep
//! links. It deliberately leaves out images, ids, timestamps, rating and notes.

use serde_json::{Map, Value};

use crate::classification::{CaffeineLevel, Category, Difficulty, Season, Temperature, TimeOfDay};
use crate::drink::{CreateDrink, DEFAULT_IMAGE_NAME, Drink, tags};
use crate::tagged::Tagged;

/// Ordered mapping of record keys to JSON primitives.
pub type DrinkRecord = Map<String, Value>;

/// Wire keys. Changing any of these breaks links that were already shared.
pub mod keys {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "drinkDescription";
    pub const TAGS: &str = "tags";
    pub const PREP_TIME: &str = "prepTime";
    pub const INGREDIENTS: &str = "ingredients";
    pub const EQUIPMENT: &str = "equipment";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const DIFFICULTY: &str = "difficulty";
    pub const CATEGORY: &str = "category";
    pub const TEMPERATURE: &str = "temperature";
    pub const CAFFEINE_LEVEL: &str = "caffeineLevel";
    pub const TIME_OF_DAY: &str = "timeOfDay";
    /// Read when present; never written.
    pub const SEASON: &str = "season";
}

const PIPE: char = '|';

pub fn drink_to_record(drink: &Drink) -> DrinkRecord {
    let mut record = Map::new();
    record.insert(keys::NAME.into(), Value::from(drink.name.as_str()));
    record.insert(keys::DESCRIPTION.into(), Value::from(drink.description.as_str()));
    record.insert(keys::TAGS.into(), Value::from(drink.tags.clone()));
    record.insert(keys::PREP_TIME.into(), Value::from(drink.prep_time));
    record.insert(keys::INGREDIENTS.into(), Value::from(entities_to_pipe_string(&drink.ingredients)));
    record.insert(keys::EQUIPMENT.into(), Value::from(entities_to_pipe_string(&drink.equipment)));
    record.insert(keys::INSTRUCTIONS.into(), Value::from(drink.instructions.as_str()));
    record.insert(keys::DIFFICULTY.into(), Value::from(drink.difficulty.as_str()));
    record.insert(keys::CATEGORY.into(), Value::from(drink.category.as_str()));
    record.insert(keys::TEMPERATURE.into(), Value::from(drink.temperature.as_str()));
    record.insert(keys::CAFFEINE_LEVEL.into(), Value::from(drink.caffeine_level.as_str()));
    record.insert(keys::TIME_OF_DAY.into(), Value::from(drink.time_of_day.as_str()));
    record
}

/// Build a new drink from a record. Never fails.
///
/// Missing or mistyped fields fall back to:
///
/// | key | fallback |
/// |---|---|
/// | name, drinkDescription, instructions | `""` |
/// | tags | `[]` (also when any element is not a string) |
/// | prepTime | `0` (integral floats such as `5.0` are accepted) |
/// | ingredients, equipment | no entities |
/// | difficulty | Beginner |
/// | category | Other |
/// | temperature | Hot |
/// | caffeineLevel | Caffeinated |
/// | timeOfDay | Anytime |
/// | season | Any Season |
///
/// Rating, notes and images always start at their defaults, and
/// `"NewlyCreated"` is appended to the decoded tags.
pub fn record_to_drink(record: &DrinkRecord) -> Drink {
    let mut decoded_tags = string_list(record, keys::TAGS);
    decoded_tags.push(tags::NEWLY_CREATED.to_string());

    let mut drink = Drink::create(CreateDrink {
        name: string(record, keys::NAME),
        description: string(record, keys::DESCRIPTION),
        tags: decoded_tags,
        rating: 0.0,
        image_name: DEFAULT_IMAGE_NAME.to_string(),
        image_data: None,
        image_url: None,
        prep_time: whole_number(record, keys::PREP_TIME).unwrap_or(0),
        ingredients: Vec::new(),
        equipment: Vec::new(),
        instructions: string(record, keys::INSTRUCTIONS),
        difficulty: enum_field(record, keys::DIFFICULTY, Difficulty::from_raw, Difficulty::Easy),
        category: enum_field(record, keys::CATEGORY, Category::from_raw, Category::Other),
        temperature: enum_field(record, keys::TEMPERATURE, Temperature::from_raw, Temperature::Hot),
        caffeine_level: enum_field(
            record,
            keys::CAFFEINE_LEVEL,
            CaffeineLevel::from_raw,
            CaffeineLevel::Caffeinated,
        ),
        time_of_day: enum_field(record, keys::TIME_OF_DAY, TimeOfDay::from_raw, TimeOfDay::Anytime),
        season: enum_field(record, keys::SEASON, Season::from_raw, Season::Any),
        notes: String::new(),
        created_at: None,
    });
    drink.ingredients = pipe_string_to_entities(&string(record, keys::INGREDIENTS));
    drink.equipment = pipe_string_to_entities(&string(record, keys::EQUIPMENT));
    drink
}

/// Every display name followed by `|`, including the last one.
pub fn entities_to_pipe_string<K>(entities: &[Tagged<K>]) -> String {
    let mut out = String::new();
    for entity in entities {
        out.push_str(entity.display_name());
        out.push(PIPE);
    }
    out
}

/// Split on `|`, dropping empty segments. Entities get fresh ids.
pub fn pipe_string_to_entities<K>(input: &str) -> Vec<Tagged<K>> {
    input
        .split(PIPE)
        .filter(|piece| !piece.is_empty())
        .map(Tagged::create)
        .collect()
}

fn string(record: &DrinkRecord, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn whole_number(record: &DrinkRecord, key: &str) -> Option<i64> {
    let value = record.get(key)?;
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // Casting saturates, so out-of-range values are rejected explicitly.
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn string_list(record: &DrinkRecord, key: &str) -> Vec<String> {
    let Some(items) = record.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

fn enum_field<T>(record: &DrinkRecord, key: &str, parse: fn(&str) -> Option<T>, fallback: T) -> T {
    match record.get(key).and_then(Value::as_str) {
        Some(raw) => parse(raw).unwrap_or_else(|| {
            tracing::debug!(key, raw, "unrecognized raw value in drink record; using default");
            fallback
        }),
        None => fallback,
    }
}
