use std::sync::Arc;

use thiserror::Error;

use brewup_catalog::Drink;
use brewup_core::DrinkId;

/// Drink store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors; callers
/// decide whether to surface them or log and continue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink {0} already exists")]
    Duplicate(DrinkId),

    #[error("drink {0} not found")]
    NotFound(DrinkId),

    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Persistence collaborator for drink aggregates.
///
/// ## Semantics
///
/// - `insert` adds a new aggregate; ids are unique for the life of the store.
/// - `update` replaces a stored aggregate with the same id (edits are made on
///   a copy and written back).
/// - `delete` removes an aggregate together with everything it owns.
/// - `all` returns drinks in insertion order.
/// - `save` makes pending changes durable; in-memory stores treat it as a no-op.
///
/// Reads return copies that keep the stored id, so identity holds across reads.
pub trait DrinkStore: Send + Sync {
    fn insert(&self, drink: Drink) -> Result<(), StoreError>;

    fn update(&self, drink: Drink) -> Result<(), StoreError>;

    fn delete(&self, id: DrinkId) -> Result<Drink, StoreError>;

    fn get(&self, id: DrinkId) -> Result<Option<Drink>, StoreError>;

    fn all(&self) -> Result<Vec<Drink>, StoreError>;

    /// Remove every drink.
    fn clear(&self) -> Result<(), StoreError>;

    fn save(&self) -> Result<(), StoreError>;
}

impl<S> DrinkStore for Arc<S>
where
    S: DrinkStore + ?Sized,
{
    fn insert(&self, drink: Drink) -> Result<(), StoreError> {
        (**self).insert(drink)
    }

    fn update(&self, drink: Drink) -> Result<(), StoreError> {
        (**self).update(drink)
    }

    fn delete(&self, id: DrinkId) -> Result<Drink, StoreError> {
        (**self).delete(id)
    }

    fn get(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        (**self).get(id)
    }

    fn all(&self) -> Result<Vec<Drink>, StoreError> {
        (**self).all()
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn save(&self) -> Result<(), StoreError> {
        (**self).save()
    }
}
