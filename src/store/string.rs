//! String operations

use super::{add_integer, DataStore};

impl DataStore {
    /// SET: Store a value, overwriting any previous one
    pub fn set(&self, key: &str, value: &str) {
        let mut ns = self.inner.write();
        ns.strings.insert(key.to_string(), value.to_string());
    }

    /// GET: Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        let ns = self.inner.read();
        ns.strings.get(key).cloned()
    }

    /// DEL: Delete a key, returning whether it existed
    pub fn delete(&self, key: &str) -> bool {
        let mut ns = self.inner.write();
        ns.strings.remove(key).is_some()
    }

    /// INCRBY: Add `amount` to the integer stored at `key`
    ///
    /// An unset key counts as `"0"`. Returns `None` and leaves the value
    /// untouched if it is not an integer or the sum overflows.
    pub fn incrby(&self, key: &str, amount: i64) -> Option<i64> {
        let mut ns = self.inner.write();
        let stored = ns
            .strings
            .entry(key.to_string())
            .or_insert_with(|| "0".to_string());

        match add_integer(stored, amount) {
            Ok(value) => {
                *stored = value.to_string();
                Some(value)
            }
            Err(e) => {
                tracing::debug!(key, error = %e, "INCRBY rejected");
                None
            }
        }
    }
}
