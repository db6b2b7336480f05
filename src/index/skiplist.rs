//! Skip list implementation
//!
//! Arena-backed skip list ordered by `(score, member)`.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ScoredMember;

/// Maximum number of levels a node can participate in
pub const MAX_LEVEL: usize = 32;

/// Probability of promoting a node one more level
const P: f64 = 0.5;

/// Arena slot of the sentinel head node
const HEAD: usize = 0;

/// A node in the arena
///
/// `forward[i]` is the slot of the next node on level `i`.
#[derive(Debug, Clone)]
struct Node {
    member: String,
    score: f64,
    forward: Vec<Option<usize>>,
}

impl Node {
    fn new(member: &str, score: f64, level: usize) -> Self {
        Self {
            member: member.to_string(),
            score,
            forward: vec![None; level],
        }
    }

    fn head() -> Self {
        Self {
            member: String::new(),
            score: f64::NEG_INFINITY,
            forward: vec![None; MAX_LEVEL],
        }
    }

    /// Placeholder left behind in a freed slot
    fn vacant() -> Self {
        Self {
            member: String::new(),
            score: 0.0,
            forward: Vec::new(),
        }
    }

    /// `(self.score, self.member) < (score, member)`
    fn precedes(&self, score: f64, member: &str) -> bool {
        self.score < score || (self.score == score && self.member.as_str() < member)
    }

    /// `(score, member) < (self.score, self.member)`
    fn follows(&self, score: f64, member: &str) -> bool {
        score < self.score || (score == self.score && member < self.member.as_str())
    }
}

/// Ordered index for one sorted-set key
///
/// Members are unique; iteration order is `(score, member)` ascending.
/// NaN scores are never stored.
pub struct OrderedIndex {
    /// Node arena; slot 0 is the sentinel head
    nodes: Vec<Node>,

    /// Freed arena slots available for reuse
    free: Vec<usize>,

    /// Number of levels currently in use (always >= 1)
    level: usize,

    /// member -> score, for locating a member's node
    scores: HashMap<String, f64>,

    /// Level generator
    rng: StdRng,
}

impl OrderedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty index with a deterministic level generator
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: vec![Node::head()],
            free: Vec::new(),
            level: 1,
            scores: HashMap::new(),
            rng,
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Insert a member, or update its score if it is already present
    ///
    /// Returns `true` if a new member was added, `false` if an existing
    /// member's score was overwritten. A NaN score has no place in the
    /// order and is refused: the index is left unchanged and `false` is
    /// returned.
    pub fn insert(&mut self, member: &str, score: f64) -> bool {
        if score.is_nan() {
            return false;
        }

        if let Some(old_score) = self.scores.get(member).copied() {
            if old_score != score {
                self.rescore(member, old_score, score);
            }
            return false;
        }

        let update = self.seek(|node| node.precedes(score, member));

        // Levels above the old top start from the head (seek fills them with HEAD)
        let level = self.random_level();
        self.level = self.level.max(level);

        let idx = self.alloc(Node::new(member, score, level));
        self.link(idx, &update);
        self.scores.insert(member.to_string(), score);
        true
    }

    /// Remove a member
    ///
    /// Returns `false` if the member was not present.
    pub fn remove(&mut self, member: &str) -> bool {
        let Some(score) = self.scores.remove(member) else {
            return false;
        };

        let update = self.seek(|node| node.precedes(score, member));
        let Some(idx) = self.nodes[update[0]].forward[0] else {
            debug_assert!(false, "member {member:?} missing from level 0");
            return false;
        };
        debug_assert_eq!(self.nodes[idx].member, member);

        self.unlink(idx, &update);
        self.release(idx);
        self.shrink();
        true
    }

    /// Get the score of a member
    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    // =========================================================================
    // Range Operations
    // =========================================================================

    /// Members with `min_score <= score <= max_score`, after skipping
    /// `offset` entries from the lower bound, at most `count` of them
    pub fn range(
        &self,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    ) -> Vec<ScoredMember> {
        let update = self.seek(|node| node.score < min_score);

        self.iter_from(self.nodes[update[0]].forward[0])
            .skip(offset)
            .take_while(|&(_, score)| score <= max_score)
            .take(count)
            .map(|(member, score)| (member.to_string(), score))
            .collect()
    }

    /// Range scan with a member tie-break on both bounds
    ///
    /// The lower bound is the first entry with
    /// `(score, member) >= (min_score, min_member)`. Entries are emitted
    /// while `score < max_score`, or `score == max_score` and
    /// `member <= max_member`.
    pub fn query(
        &self,
        min_score: f64,
        min_member: &str,
        max_score: f64,
        max_member: &str,
        offset: usize,
        count: usize,
    ) -> Vec<ScoredMember> {
        let update = self.seek(|node| node.precedes(min_score, min_member));

        self.iter_from(self.nodes[update[0]].forward[0])
            .skip(offset)
            .take_while(|&(member, score)| {
                score < max_score || (score == max_score && member <= max_member)
            })
            .take(count)
            .map(|(member, score)| (member.to_string(), score))
            .collect()
    }

    /// Delete the entries `range` would return for the same arguments
    ///
    /// Returns the number of removed entries.
    pub fn range_delete(
        &mut self,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    ) -> usize {
        let mut update = self.seek(|node| node.score < min_score);
        let mut cursor = self.nodes[update[0]].forward[0];

        // Skipped nodes become the predecessors of everything after them
        for _ in 0..offset {
            let Some(idx) = cursor else { break };
            let height = self.nodes[idx].forward.len();
            for slot in update.iter_mut().take(height) {
                *slot = idx;
            }
            cursor = self.nodes[idx].forward[0];
        }

        let mut removed = 0;
        while removed < count {
            let idx = match cursor {
                Some(idx) if self.nodes[idx].score <= max_score => idx,
                _ => break,
            };
            cursor = self.nodes[idx].forward[0];

            self.unlink(idx, &update);
            let node = self.release(idx);
            self.scores.remove(&node.member);
            self.shrink();
            removed += 1;
        }

        removed
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of members
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if the index has no members
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of levels currently in use
    pub fn level(&self) -> usize {
        self.level
    }

    /// Iterate over all `(member, score)` pairs in ascending order
    pub fn iter(&self) -> Iter<'_> {
        self.iter_from(self.nodes[HEAD].forward[0])
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Descend from the top level, recording on each level the last node
    /// for which `before_target` holds (the head if none does)
    fn seek<F>(&self, before_target: F) -> [usize; MAX_LEVEL]
    where
        F: Fn(&Node) -> bool,
    {
        let mut update = [HEAD; MAX_LEVEL];
        let mut x = HEAD;

        for i in (0..self.level).rev() {
            while let Some(next) = self.nodes[x].forward[i] {
                if !before_target(&self.nodes[next]) {
                    break;
                }
                x = next;
            }
            update[i] = x;
        }

        update
    }

    /// Move an existing member to its new position
    fn rescore(&mut self, member: &str, old_score: f64, new_score: f64) {
        let update = self.seek(|node| node.precedes(old_score, member));
        let Some(idx) = self.nodes[update[0]].forward[0] else {
            debug_assert!(false, "member {member:?} missing from level 0");
            return;
        };

        let prev = update[0];
        let fits_after_prev = prev == HEAD || self.nodes[prev].precedes(new_score, member);
        let fits_before_next = self.nodes[idx].forward[0]
            .map_or(true, |next| self.nodes[next].follows(new_score, member));

        if fits_after_prev && fits_before_next {
            self.nodes[idx].score = new_score;
        } else {
            // Relink the same slot at the same height; the level cannot shrink
            self.unlink(idx, &update);
            self.nodes[idx].score = new_score;
            let update = self.seek(|node| node.precedes(new_score, member));
            self.link(idx, &update);
        }

        if let Some(score) = self.scores.get_mut(member) {
            *score = new_score;
        }
    }

    /// Splice `idx` in after `update[i]` on every level it participates in
    fn link(&mut self, idx: usize, update: &[usize; MAX_LEVEL]) {
        for i in 0..self.nodes[idx].forward.len() {
            let prev = update[i];
            self.nodes[idx].forward[i] = self.nodes[prev].forward[i];
            self.nodes[prev].forward[i] = Some(idx);
        }
    }

    /// Unlink `idx` wherever it is the immediate successor of `update[i]`
    fn unlink(&mut self, idx: usize, update: &[usize; MAX_LEVEL]) {
        for i in 0..self.level {
            let prev = update[i];
            if self.nodes[prev].forward[i] != Some(idx) {
                break;
            }
            self.nodes[prev].forward[i] = self.nodes[idx].forward[i];
        }
    }

    /// Lower the active level while the topmost level is empty
    fn shrink(&mut self) {
        while self.level > 1 && self.nodes[HEAD].forward[self.level - 1].is_none() {
            self.level -= 1;
        }
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.gen_bool(P) {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Node {
        self.free.push(idx);
        std::mem::replace(&mut self.nodes[idx], Node::vacant())
    }

    fn iter_from(&self, start: Option<usize>) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            next: start,
        }
    }
}

impl Default for OrderedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderedIndex")
            .field("len", &self.len())
            .field("level", &self.level)
            .finish()
    }
}

/// Ascending iterator over `(member, score)` pairs
pub struct Iter<'a> {
    nodes: &'a [Node],
    next: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.forward[0];
        Some((node.member.as_str(), node.score))
    }
}
