use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use brewup_catalog::{
    CancelSignal, CreateDrink, Drink, DrinkImage, ImageFetcher, deep_link, query, record_to_drink,
    seed,
};
use brewup_core::{AggregateRoot, DomainError, DrinkId};
use brewup_store::{DrinkStore, StoreError};

/// Name given to drinks created from the "new" action.
pub const NEW_DRINK_NAME: &str = "newDrink";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("drink {0} not found")]
    NotFound(DrinkId),

    #[error("drink {0} cannot be shared as a link")]
    Unshareable(DrinkId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every user action the catalog screens perform, over one store.
///
/// Each mutating call saves before returning. A failed save is logged and
/// returned; the in-store change is kept.
pub struct CatalogService<S> {
    store: S,
    image_quality: f32,
}

impl<S> CatalogService<S>
where
    S: DrinkStore,
{
    pub fn new(store: S, image_quality: f32) -> Self {
        Self {
            store,
            image_quality,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert the starter drinks that are missing by name.
    ///
    /// Returns how many were inserted.
    pub fn bootstrap_defaults(&self) -> ServiceResult<usize> {
        let existing: HashSet<String> = self.store.all()?.into_iter().map(|d| d.name).collect();

        let mut inserted = 0;
        for drink in seed::default_drinks() {
            if existing.contains(&drink.name) {
                continue;
            }
            self.store.insert(drink.duplicate())?;
            inserted += 1;
        }

        if inserted > 0 {
            self.persist()?;
            tracing::info!(inserted, "seeded default drinks");
        }
        Ok(inserted)
    }

    pub fn create_drink<I, T>(&self, drink_tags: I) -> ServiceResult<Drink>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let drink = Drink::create(CreateDrink {
            name: NEW_DRINK_NAME.to_string(),
            tags: drink_tags.into_iter().map(Into::into).collect(),
            ..CreateDrink::default()
        });
        self.store.insert(drink.clone())?;
        self.persist()?;
        tracing::info!(drink_id = %drink.id(), "created drink");
        Ok(drink)
    }

    /// Import the drink carried by a `brewup://drink?data=..` link.
    ///
    /// Links with another action or without a payload are ignored.
    pub fn open_deep_link(&self, link: &str) -> ServiceResult<Option<DrinkId>> {
        let decoded = deep_link::decode_str(link);
        if decoded.action.as_deref() != Some(deep_link::DRINK_ACTION) {
            tracing::debug!(action = ?decoded.action, "ignoring deep link");
            return Ok(None);
        }
        let Some(record) = decoded.drink_record() else {
            tracing::debug!("deep link has no drink payload");
            return Ok(None);
        };

        let drink = record_to_drink(record);
        let id = *drink.id();
        self.store.insert(drink)?;
        self.persist()?;
        tracing::info!(drink_id = %id, "imported drink from link");
        Ok(Some(id))
    }

    pub fn share_link(&self, id: DrinkId) -> ServiceResult<Url> {
        let drink = self.get(id)?;
        deep_link::share_link(&drink).ok_or(ServiceError::Unshareable(id))
    }

    /// Returns whether the drink is a favorite afterwards.
    pub fn toggle_favorite(&self, id: DrinkId) -> ServiceResult<bool> {
        let drink = self.edit(id, Drink::toggle_favorite_tag)?;
        Ok(drink.is_favorite())
    }

    /// Record that the drink was opened; it moves to the front of every shelf.
    pub fn mark_viewed(&self, id: DrinkId) -> ServiceResult<Drink> {
        self.edit(id, Drink::mark_checked)
    }

    pub fn delete(&self, id: DrinkId) -> ServiceResult<Drink> {
        let removed = self.store.delete(id).map_err(|err| match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => other.into(),
        })?;
        self.persist()?;
        Ok(removed)
    }

    /// Remove every drink. Returns how many were removed.
    pub fn clear_all(&self) -> ServiceResult<usize> {
        let count = self.store.all()?.len();
        self.store.clear()?;
        self.persist()?;
        tracing::info!(removed = count, "cleared catalog");
        Ok(count)
    }

    /// Attach (or with `None`, clear) the drink's stored image, re-encoded at
    /// the configured quality.
    pub fn attach_image(&self, id: DrinkId, bytes: Option<&[u8]>) -> ServiceResult<Drink> {
        let mut drink = self.get(id)?;
        drink.set_image(bytes, self.image_quality)?;
        self.store.update(drink.clone())?;
        self.persist()?;
        Ok(drink)
    }

    pub async fn load_image(
        &self,
        id: DrinkId,
        fetcher: &dyn ImageFetcher,
        cancel: &CancelSignal,
    ) -> ServiceResult<Option<DrinkImage>> {
        let drink = self.get(id)?;
        Ok(drink.resolve_image(fetcher, cancel).await)
    }

    pub fn get(&self, id: DrinkId) -> ServiceResult<Drink> {
        self.store.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    pub fn all(&self) -> ServiceResult<Vec<Drink>> {
        Ok(self.store.all()?)
    }

    /// Shipped drinks the user has not authored, most recently viewed first.
    pub fn explore(&self) -> ServiceResult<Vec<Drink>> {
        self.shelf(query::explore)
    }

    pub fn favorites(&self) -> ServiceResult<Vec<Drink>> {
        self.shelf(query::favorites)
    }

    pub fn my_recipes(&self) -> ServiceResult<Vec<Drink>> {
        self.shelf(query::my_recipes)
    }

    fn shelf(&self, select: fn(&[Drink]) -> Vec<&Drink>) -> ServiceResult<Vec<Drink>> {
        let drinks = self.store.all()?;
        Ok(select(&drinks).into_iter().cloned().collect())
    }

    fn edit<F>(&self, id: DrinkId, change: F) -> ServiceResult<Drink>
    where
        F: FnOnce(&mut Drink),
    {
        let mut drink = self.get(id)?;
        change(&mut drink);
        self.store.update(drink.clone())?;
        self.persist()?;
        Ok(drink)
    }

    fn persist(&self) -> ServiceResult<()> {
        self.store.save().map_err(|err| {
            tracing::warn!("failed to save drinks: {err}");
            ServiceError::Store(err)
        })
    }
}
