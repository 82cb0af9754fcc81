use std::sync::RwLock;

use brewup_catalog::Drink;
use brewup_core::{AggregateRoot, DrinkId, aggregate::find_index};

use super::r#trait::{DrinkStore, StoreError};

/// In-memory drink store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryDrinkStore {
    drinks: RwLock<Vec<Drink>>,
}

impl InMemoryDrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drinks(drinks: Vec<Drink>) -> Self {
        Self {
            drinks: RwLock::new(drinks),
        }
    }
}

impl DrinkStore for InMemoryDrinkStore {
    fn insert(&self, drink: Drink) -> Result<(), StoreError> {
        let mut drinks = self.drinks.write().map_err(|_| StoreError::LockPoisoned)?;
        insert_into(&mut drinks, drink)
    }

    fn update(&self, drink: Drink) -> Result<(), StoreError> {
        let mut drinks = self.drinks.write().map_err(|_| StoreError::LockPoisoned)?;
        update_in(&mut drinks, drink)
    }

    fn delete(&self, id: DrinkId) -> Result<Drink, StoreError> {
        let mut drinks = self.drinks.write().map_err(|_| StoreError::LockPoisoned)?;
        delete_from(&mut drinks, id)
    }

    fn get(&self, id: DrinkId) -> Result<Option<Drink>, StoreError> {
        let drinks = self.drinks.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(find_index(drinks.as_slice(), &id).map(|idx| drinks[idx].clone()))
    }

    fn all(&self) -> Result<Vec<Drink>, StoreError> {
        let drinks = self.drinks.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(drinks.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut drinks = self.drinks.write().map_err(|_| StoreError::LockPoisoned)?;
        drinks.clear();
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(crate) fn insert_into(drinks: &mut Vec<Drink>, drink: Drink) -> Result<(), StoreError> {
    let id = *drink.id();
    if find_index(drinks.as_slice(), &id).is_some() {
        return Err(StoreError::Duplicate(id));
    }
    drinks.push(drink);
    Ok(())
}

pub(crate) fn update_in(drinks: &mut [Drink], drink: Drink) -> Result<(), StoreError> {
    let id = *drink.id();
    let idx = find_index(drinks, &id).ok_or(StoreError::NotFound(id))?;
    drinks[idx] = drink;
    Ok(())
}

pub(crate) fn delete_from(drinks: &mut Vec<Drink>, id: DrinkId) -> Result<Drink, StoreError> {
    let idx = find_index(drinks.as_slice(), &id).ok_or(StoreError::NotFound(id))?;
    Ok(drinks.remove(idx))
}
