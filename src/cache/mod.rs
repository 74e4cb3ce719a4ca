use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Memoised query responses keyed by their normalised parameters.
///
/// Entries belong to one snapshot; a new snapshot gets a new cache.
pub struct QueryCache {
    entries: Mutex<HashMap<String, Arc<Value>>>,
    capacity: usize,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Return the cached response for `key`, computing and storing it on a miss.
    /// Once full, new responses are computed but not stored.
    pub fn get_or_compute<T, F>(&self, key: &str, compute: F) -> Result<Arc<Value>>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        if let Some(hit) = self.load(key)? {
            debug!("Query cache hit: {}", key);
            return Ok(hit);
        }

        let value = serde_json::to_value(compute())
            .with_context(|| format!("Failed to serialize response for {}", key))?;
        let value = Arc::new(value);
        self.save(key, Arc::clone(&value))?;
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, key: &str) -> Result<Option<Arc<Value>>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("query cache lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: Arc<Value>) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("query cache lock poisoned"))?;
        if entries.len() < self.capacity {
            entries.insert(key.to_string(), value);
        }
        Ok(())
    }
}
