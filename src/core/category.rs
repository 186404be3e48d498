use crate::storage::KeyValueStore;

/// Storage key holding the JSON-encoded category list.
pub const CATEGORIES_KEY: &str = "todo-categories";

pub fn default_categories() -> Vec<String> {
    vec!["Work".into(), "Personal".into(), "Hospital".into()]
}

/// Ordered, duplicate-free list of category names backed by a key-value store.
///
/// Every change rewrites the whole list under [`CATEGORIES_KEY`].
pub struct CategoryStore<S> {
    names: Vec<String>,
    store: S,
}

impl<S: KeyValueStore> CategoryStore<S> {
    /// Load the persisted list, or install and persist the defaults.
    pub fn initialize(store: S) -> Self {
        let stored = store.get(CATEGORIES_KEY);
        let mut categories = Self {
            names: Vec::new(),
            store,
        };

        match stored.map(|raw| serde_json::from_str::<Vec<String>>(&raw)) {
            Some(Ok(names)) => {
                log::debug!("Loaded {} categories", names.len());
                categories.names = names;
            }
            Some(Err(e)) => {
                log::warn!("Stored categories unreadable ({}), restoring defaults", e);
                categories.names = default_categories();
                categories.persist();
            }
            None => {
                log::info!("No stored categories, installing defaults");
                categories.names = default_categories();
                categories.persist();
            }
        }

        categories
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Append a trimmed name. Empty or already-present names are ignored.
    pub fn add(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.names.push(trimmed.to_string());
        self.persist();
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let Some(idx) = self.names.iter().position(|n| n == name) else {
            return false;
        };
        self.names.remove(idx);
        self.persist();
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.names) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize categories: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(CATEGORIES_KEY, &json) {
            log::error!("Failed to save categories: {}", e);
        }
    }
}
