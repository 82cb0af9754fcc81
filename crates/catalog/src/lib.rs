//! Drink catalog domain module.
//!
//! Business rules for drinks: the aggregate and its owned ingredient/equipment
//! lists, tag queries, the shareable record codec and the `brewup://` deep-link
//! codec. Everything here is deterministic and IO-free except image
//! resolution, which goes through the [`media::ImageFetcher`] collaborator.

pub mod classification;
pub mod deep_link;
pub mod drink;
pub mod media;
pub mod query;
pub mod record;
pub mod seed;
pub mod tagged;

pub use classification::{CaffeineLevel, Category, Difficulty, Season, Temperature, TimeOfDay};
pub use deep_link::DeepLink;
pub use drink::{CreateDrink, Drink, tags};
pub use media::{
    CancelHandle, CancelSignal, DEFAULT_IMAGE_QUALITY, DrinkImage, HttpImageFetcher,
    ImageFetchError, ImageFetcher, ImageSource, cancel_pair,
};
pub use record::{DrinkRecord, drink_to_record, record_to_drink};
pub use tagged::{Equipment, EquipmentKind, Ingredient, IngredientKind, Tagged};
