//! Ingredient catalog document
//!
//! `{ name: { nutrition, reference_serving_size, custom_serving_size, image } }`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{write_document, StoreError, StoreResult};
use crate::models::{Catalog, CustomServingEdit};

/// Reads and rewrites the catalog JSON file
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> StoreResult<Catalog> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let catalog: Catalog =
            serde_json::from_str(&text).map_err(|e| StoreError::format(&self.path, e))?;
        debug!(path = %self.path.display(), ingredients = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Replace the whole document
    pub fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| StoreError::format(&self.path, e))?;
        write_document(&self.path, json.as_bytes())?;
        info!(path = %self.path.display(), ingredients = catalog.len(), "Catalog saved");
        Ok(())
    }

    /// Load, apply serving-size edits and save; unknown names are skipped
    pub fn apply_custom_serving_sizes(&self, edits: &[CustomServingEdit]) -> StoreResult<Catalog> {
        let mut catalog = self.load()?;
        let applied = catalog.apply_custom_serving_sizes(edits);
        debug!(requested = edits.len(), applied, "Applied custom serving sizes");
        self.save(&catalog)?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG_JSON: &str = r#"{
        "chicken_breast": {
            "nutrition": {"protein": 31, "carbohydrate": 0, "fat": 3.6, "calories": 165},
            "reference_serving_size": 100,
            "custom_serving_size": 150,
            "image": "images/chicken_breast.png"
        },
        "banana": {
            "nutrition": {"protein": 1.1, "carbohydrate": 23, "fat": 0.3, "calories": 89},
            "reference_serving_size": 118
        }
    }"#;

    fn store_with(dir: &TempDir, contents: &str) -> CatalogStore {
        let path = dir.path().join("ingredients.json");
        fs::write(&path, contents).unwrap();
        CatalogStore::new(path)
    }

    #[test]
    fn test_load_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = store_with(&dir, CATALOG_JSON).load().unwrap();
        assert_eq!(catalog.len(), 2);
        let chicken = catalog.get("chicken_breast").unwrap();
        assert_eq!(chicken.custom_serving_size, 150.0);
        assert_eq!(chicken.image.as_deref(), Some("images/chicken_breast.png"));
        assert_eq!(catalog.get("banana").unwrap().custom_serving_size, 118.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path().join("nope.json"));
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_malformed_document_is_format_error() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, r#"{"banana": [1, 2, 3]}"#);
        assert!(matches!(store.load(), Err(StoreError::Format { .. })));

        let store = store_with(&dir, "not json");
        assert!(matches!(store.load(), Err(StoreError::Format { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, CATALOG_JSON);
        let catalog = store.load().unwrap();
        store.save(&catalog).unwrap();
        assert_eq!(store.load().unwrap(), catalog);
    }

    #[test]
    fn test_apply_custom_serving_sizes_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, CATALOG_JSON);
        store
            .apply_custom_serving_sizes(&[
                CustomServingEdit { name: "banana".to_string(), custom_serving_size: 60.0 },
                CustomServingEdit { name: "kiwi".to_string(), custom_serving_size: 75.0 },
            ])
            .unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.get("banana").unwrap().custom_serving_size, 60.0);
        assert_eq!(reloaded.get("chicken_breast").unwrap().custom_serving_size, 150.0);
        assert!(!reloaded.contains("kiwi"));
    }
}
