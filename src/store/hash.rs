//! Hash operations

use super::{add_integer, DataStore};

impl DataStore {
    /// HSET: Set fields, returning how many of them were new
    ///
    /// Overwriting an existing field does not count.
    pub fn hset<I, F, V>(&self, key: &str, pairs: I) -> i64
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<String>,
    {
        let mut ns = self.inner.write();
        let hash = ns.hashes.entry(key.to_string()).or_default();

        let mut added = 0;
        for (field, value) in pairs {
            if hash.insert(field.into(), value.into()).is_none() {
                added += 1;
            }
        }
        added
    }

    /// HGET: Get a field's value
    pub fn hget(&self, key: &str, field: &str) -> Option<String> {
        let ns = self.inner.read();
        ns.hashes.get(key)?.get(field).cloned()
    }

    /// HMGET: Values of the requested fields, in request order
    ///
    /// Missing fields and empty values are left out. Returns `None` if
    /// the hash does not exist.
    pub fn hmget<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> Option<Vec<String>> {
        let ns = self.inner.read();
        let hash = ns.hashes.get(key)?;

        Some(
            fields
                .iter()
                .filter_map(|field| hash.get(field.as_ref()))
                .filter(|value| !value.is_empty())
                .cloned()
                .collect(),
        )
    }

    /// HINCRBY: Add `increment` to the integer stored in a field
    ///
    /// Returns `None` if the hash does not exist, or if the field holds
    /// a non-integer or the sum overflows (the field is left untouched).
    /// A missing field counts as 0.
    pub fn hincrby(&self, key: &str, field: &str, increment: i64) -> Option<i64> {
        let mut ns = self.inner.write();
        let hash = ns.hashes.get_mut(key)?;

        let stored = hash.get(field).map_or("0", String::as_str);
        match add_integer(stored, increment) {
            Ok(value) => {
                hash.insert(field.to_string(), value.to_string());
                Some(value)
            }
            Err(e) => {
                tracing::debug!(key, field, error = %e, "HINCRBY rejected");
                None
            }
        }
    }
}
