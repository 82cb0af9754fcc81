use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use brewup_catalog::Drink;
use brewup_core::{DrinkId, aggregate::find_index};

use super::in_memory::{delete_from, insert_into, update_in};
use super::r#trait::{DrinkStore, StoreError};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    drinks: Vec<Drink>,
}

/// Drink store backed by a single JSON file.
///
/// Changes are held in memory until [`DrinkStore::save`], which rewrites the
/// whole file through a temporary sibling and a rename, so a crash mid-save
/// leaves the previous snapshot intact.
#[derive(Debug)]
pub struct JsonFileDrinkStore {
    path: PathBuf,
    drinks: RwLock<Vec<Drink>>,
}

impl JsonFileDrinkStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let drinks = if path.exists() {
            let bytes = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            if snapshot.version != FORMAT_VERSION {
                tracing::warn!(
                    path = %path.display(),
                    version = snapshot.version,
                    "unexpected drink store format version; loading anyway"
                );
            }
            tracing::debug!(path = %path.display(), count = snapshot.drinks.len(), "loaded drink store");
            snapshot.drinks
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            drinks: RwLock::new(drinks),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "drinks.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DrinkStore for JsonFileDrinkStore {
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
        let drinks = self.drinks.read().map_err(|_| StoreError::LockPoisoned)?;
        let snapshot = Snapshot {
            version: FORMAT_VERSION,
            drinks: drinks.clone(),
        };
        drop(drinks);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            serde_json::to_writer_pretty(&mut file, &snapshot)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = snapshot.drinks.len(), "saved drink store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewup_catalog::{CreateDrink, Season};
    use brewup_core::AggregateRoot;

    fn sample() -> Drink {
        Drink::create(CreateDrink {
            name: "Matcha Latte".to_string(),
            tags: vec!["CreatedByUser".to_string()],
            rating: 3.5,
            ingredients: vec!["Matcha".to_string(), "Oat Milk".to_string()],
            equipment: vec!["Whisk".to_string()],
            season: Season::Spring,
            notes: "less sugar".to_string(),
            image_data: Some(vec![0xFF, 0xD8, 0x00]),
            ..CreateDrink::default()
        })
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileDrinkStore::open(dir.path().join("drinks.json")).unwrap();
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn save_then_reopen_restores_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("drinks.json");
        let drink = sample();
        let id = *drink.id();

        let store = JsonFileDrinkStore::open(&path).unwrap();
        store.insert(drink.clone()).unwrap();
        store.save().unwrap();

        let reopened = JsonFileDrinkStore::open(&path).unwrap();
        let read = reopened.get(id).unwrap().unwrap();
        assert_eq!(read.name, "Matcha Latte");
        assert_eq!(read.rating, 3.5);
        assert_eq!(read.season, Season::Spring);
        assert_eq!(read.notes, "less sugar");
        assert_eq!(read.ingredient_names(), vec!["Matcha", "Oat Milk"]);
        assert_eq!(read.ingredients[1].normalized_key(), "oatmilk");
        assert_eq!(read.image_data(), Some(&[0xFF, 0xD8, 0x00][..]));
        assert_eq!(read.created_at(), drink.created_at());
        assert_eq!(read.last_checked_at(), drink.last_checked_at());
    }

    #[test]
    fn image_bytes_are_saved_as_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.json");
        let store = JsonFileDrinkStore::open(&path).unwrap();
        store.insert(sample()).unwrap();
        store.insert(Drink::default()).unwrap();
        store.save().unwrap();

        let saved: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(saved["drinks"][0]["image_data"], serde_json::json!("/9gA"));
        assert!(saved["drinks"][1]["image_data"].is_null());
    }

    #[test]
    fn unsaved_changes_are_not_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.json");

        let store = JsonFileDrinkStore::open(&path).unwrap();
        store.insert(sample()).unwrap();

        let reopened = JsonFileDrinkStore::open(&path).unwrap();
        assert!(reopened.all().unwrap().is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.json");
        let store = JsonFileDrinkStore::open(&path).unwrap();
        store.insert(sample()).unwrap();
        store.save().unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("drinks.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = JsonFileDrinkStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn delete_is_durable_after_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drinks.json");
        let drink = sample();
        let id = *drink.id();

        let store = JsonFileDrinkStore::open(&path).unwrap();
        store.insert(drink).unwrap();
        store.save().unwrap();
        store.delete(id).unwrap();
        store.save().unwrap();

        let reopened = JsonFileDrinkStore::open(&path).unwrap();
        assert!(reopened.get(id).unwrap().is_none());
    }
}
