use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

/// Lecture/écriture clé-valeur injectée dans les compteurs persistés.
/// L'implémentation SQLite vit dans laroulette-db ; le magasin en mémoire
/// ci-dessous sert aux tests déterministes.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Magasin en mémoire, sans persistance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pré-remplit une clé, utile pour simuler un état persisté corrompu.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
