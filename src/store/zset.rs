//! Sorted-set operations

use tracing::trace;

use super::DataStore;
use crate::index::{OrderedIndex, ScoredMember};

impl DataStore {
    /// ZADD: Insert a member or update its score
    ///
    /// Returns `true` if the member is new, `false` if its score was updated.
    /// A NaN score is refused with `false`; nothing is stored or created.
    pub fn zadd(&self, key: &str, score: f64, member: &str) -> bool {
        trace!(key, score, member, "ZADD");
        if score.is_nan() {
            tracing::debug!(key, member, "ZADD rejected: score is NaN");
            return false;
        }
        let mut ns = self.inner.write();
        ns.zsets
            .entry(key.to_string())
            .or_insert_with(OrderedIndex::new)
            .insert(member, score)
    }

    /// ZREM: Remove a member
    pub fn zrem(&self, key: &str, member: &str) -> bool {
        trace!(key, member, "ZREM");
        let mut ns = self.inner.write();
        match ns.zsets.get_mut(key) {
            Some(index) => index.remove(member),
            None => false,
        }
    }

    /// ZSCORE: Get the score of a member
    pub fn zscore(&self, key: &str, member: &str) -> Option<f64> {
        trace!(key, member, "ZSCORE");
        let ns = self.inner.read();
        ns.zsets.get(key)?.score(member)
    }

    /// ZRANGE: Members with `min_score <= score <= max_score`
    pub fn zrange(
        &self,
        key: &str,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    ) -> Vec<ScoredMember> {
        trace!(key, min_score, max_score, offset, count, "ZRANGE");
        let ns = self.inner.read();
        ns.zsets
            .get(key)
            .map(|index| index.range(min_score, max_score, offset, count))
            .unwrap_or_default()
    }

    /// ZQUERY: Range scan with member tie-break on both bounds
    #[allow(clippy::too_many_arguments)]
    pub fn zquery(
        &self,
        key: &str,
        min_score: f64,
        min_member: &str,
        max_score: f64,
        max_member: &str,
        offset: usize,
        count: usize,
    ) -> Vec<ScoredMember> {
        trace!(
            key,
            min_score, min_member, max_score, max_member, offset, count, "ZQUERY"
        );
        let ns = self.inner.read();
        ns.zsets
            .get(key)
            .map(|index| index.query(min_score, min_member, max_score, max_member, offset, count))
            .unwrap_or_default()
    }

    /// ZRANGEDEL: Delete what `zrange` would return for the same arguments
    ///
    /// Returns the number of removed members (0 for an unknown key).
    pub fn zrange_del(
        &self,
        key: &str,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    ) -> usize {
        trace!(key, min_score, max_score, offset, count, "ZRANGEDEL");
        let mut ns = self.inner.write();
        match ns.zsets.get_mut(key) {
            Some(index) => index.range_delete(min_score, max_score, offset, count),
            None => 0,
        }
    }

    /// ZCARD: Number of members (0 for an unknown key)
    pub fn zcard(&self, key: &str) -> usize {
        trace!(key, "ZCARD");
        let ns = self.inner.read();
        ns.zsets.get(key).map_or(0, OrderedIndex::len)
    }
}
