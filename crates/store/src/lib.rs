//! Drink persistence boundary.
//!
//! The catalog treats storage as an external, single-writer collaborator. This
//! crate defines that boundary ([`DrinkStore`]) with an in-memory
//! implementation for tests/dev and a JSON-file implementation for local use.
//! Drinks are stored whole, so deleting a drink drops its ingredients and
//! equipment with it.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::JsonFileDrinkStore;
pub use in_memory::InMemoryDrinkStore;
pub use r#trait::{DrinkStore, StoreError};
