//! Ingredient and equipment records owned by a drink.

use core::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewup_core::{Entity, EntityId};

/// Marker for [`Ingredient`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientKind;

/// Marker for [`Equipment`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentKind;

/// A named record with a derived lookup key.
///
/// `normalized_key` is derived once from the display name at creation and is
/// **not** recomputed by [`Tagged::set_display_name`]. Equality compares the
/// normalized key only, never the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tagged<K> {
    id: EntityId,
    display_name: String,
    normalized_key: String,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type Ingredient = Tagged<IngredientKind>;
pub type Equipment = Tagged<EquipmentKind>;

impl<K> Tagged<K> {
    pub fn create(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let normalized_key = normalize(&display_name);
        Self {
            id: EntityId::new(),
            display_name,
            normalized_key,
            created_at: Utc::now(),
            kind: PhantomData,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn normalized_key(&self) -> &str {
        &self.normalized_key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Rename the entity. The normalized key keeps its creation-time value.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    pub fn matches(&self, other: &Self) -> bool {
        self.normalized_key == other.normalized_key
    }
}

impl<K> PartialEq for Tagged<K> {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl<K> Eq for Tagged<K> {}

impl<K> Entity for Tagged<K> {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize(display_name: &str) -> String {
    display_name.to_lowercase().replace(' ', "")
}

/// Build owned entities from names, preserving order.
pub fn from_names<K, I, S>(names: I) -> Vec<Tagged<K>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Tagged::create).collect()
}

/// Display names in list order.
pub fn names<K>(entities: &[Tagged<K>]) -> Vec<String> {
    entities.iter().map(|e| e.display_name.clone()).collect()
}
