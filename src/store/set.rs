//! Set operations

use std::collections::HashSet;

use super::DataStore;

impl DataStore {
    /// SADD: Add a member, returning 1 if it was new and 0 otherwise
    pub fn sadd(&self, key: &str, member: &str) -> i64 {
        let mut ns = self.inner.write();
        let set = ns.sets.entry(key.to_string()).or_default();
        i64::from(set.insert(member.to_string()))
    }

    /// SREM: Remove a member
    ///
    /// Returns `None` for an unknown key, otherwise 1 if removed and 0 if
    /// the member was not present.
    pub fn srem(&self, key: &str, member: &str) -> Option<i64> {
        let mut ns = self.inner.write();
        let set = ns.sets.get_mut(key)?;
        Some(i64::from(set.remove(member)))
    }

    /// SISMEMBER: 1 if `member` is in the set, 0 if not, `None` for an unknown key
    pub fn sismember(&self, key: &str, member: &str) -> Option<i64> {
        let ns = self.inner.read();
        let set = ns.sets.get(key)?;
        Some(i64::from(set.contains(member)))
    }

    /// SINTER: Members present in every one of the given sets
    ///
    /// Returns `None` if any key does not exist. Members come back sorted.
    pub fn sinter<S: AsRef<str>>(&self, keys: &[S]) -> Option<Vec<String>> {
        let ns = self.inner.read();

        let mut sets: Vec<&HashSet<String>> = Vec::with_capacity(keys.len());
        for key in keys {
            sets.push(ns.sets.get(key.as_ref())?);
        }
        sets.sort_by_key(|set| set.len());

        let Some((smallest, rest)) = sets.split_first() else {
            return Some(Vec::new());
        };

        let mut members: Vec<String> = smallest
            .iter()
            .filter(|member| rest.iter().all(|set| set.contains(*member)))
            .cloned()
            .collect();
        members.sort();
        Some(members)
    }

    /// SCARD: Number of members (0 for an unknown key)
    pub fn scard(&self, key: &str) -> usize {
        let ns = self.inner.read();
        ns.sets.get(key).map_or(0, HashSet::len)
    }
}
