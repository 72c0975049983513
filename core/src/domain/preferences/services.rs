use tracing::warn;

use crate::domain::preferences::{ALLERGIES_STORAGE_KEY, ports::PreferenceStore};

/// Saved allergy text, or an empty string on first use. A broken store is
/// logged and treated as empty.
pub fn load_allergies<P: PreferenceStore + ?Sized>(store: &P) -> String {
    match store.get(ALLERGIES_STORAGE_KEY) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!("Error reading preference key \"{}\": {}", ALLERGIES_STORAGE_KEY, e);
            String::new()
        }
    }
}

/// Persists the allergy text unless it is blank. Returns whether a write
/// happened.
pub fn remember_allergies<P: PreferenceStore + ?Sized>(store: &P, allergies: &str) -> bool {
    if allergies.trim().is_empty() {
        return false;
    }

    match store.set(ALLERGIES_STORAGE_KEY, allergies) {
        Ok(()) => true,
        Err(e) => {
            warn!("Error setting preference key \"{}\": {}", ALLERGIES_STORAGE_KEY, e);
            false
        }
    }
}
