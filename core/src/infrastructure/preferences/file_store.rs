use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::domain::{common::entities::app_errors::CoreError, preferences::ports::PreferenceStore};

/// Preferences kept as a flat JSON object in a single file. A missing file
/// is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };

        serde_json::from_str(&contents).map_err(|e| {
            CoreError::PreferenceStorage(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(values)
            .map_err(|e| CoreError::PreferenceStorage(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| storage_error(&self.path, e))?;

        debug!(path = %self.path.display(), "Preferences written");
        Ok(())
    }
}

fn storage_error(path: &Path, e: io::Error) -> CoreError {
    CoreError::PreferenceStorage(format!("{}: {}", path.display(), e))
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFilePreferenceStore::new(dir.path().join("preferences.json"));
        assert_eq!(store.get("userAllergies").unwrap(), None);
    }

    #[test]
    fn test_values_survive_a_new_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        JsonFilePreferenceStore::new(&path)
            .set("userAllergies", "peanuts, soy")
            .unwrap();

        let reopened = JsonFilePreferenceStore::new(&path);
        assert_eq!(
            reopened.get("userAllergies").unwrap(),
            Some("peanuts, soy".to_string())
        );

        reopened.remove("userAllergies").unwrap();
        assert_eq!(reopened.get("userAllergies").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFilePreferenceStore::new(&path)
            .get("userAllergies")
            .unwrap_err();
        assert!(matches!(err, CoreError::PreferenceStorage(_)));
    }
}
