//! List operations

use std::collections::VecDeque;
use std::str::FromStr;

use super::DataStore;
use crate::error::Error;

/// End of a list, as named by `LMOVE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn pop(self, list: &mut VecDeque<String>) -> Option<String> {
        match self {
            Direction::Left => list.pop_front(),
            Direction::Right => list.pop_back(),
        }
    }

    fn push(self, list: &mut VecDeque<String>, value: String) {
        match self {
            Direction::Left => list.push_front(value),
            Direction::Right => list.push_back(value),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEFT" => Ok(Direction::Left),
            "RIGHT" => Ok(Direction::Right),
            other => Err(Error::InvalidArgument(format!(
                "direction must be LEFT or RIGHT, got {:?}",
                other
            ))),
        }
    }
}

/// Resolve `start`/`stop` against a list of `len` elements
///
/// Negative indices count from the end. Returns the inclusive bounds, or
/// `None` when the range selects nothing.
fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let size = len as i64;
    let start = if start < 0 { (size + start).max(0) } else { start };
    let stop = if stop < 0 { (size + stop).max(0) } else { stop };

    let start = start.min(size);
    let stop = stop.min(size - 1);

    if start > stop || start >= size {
        return None;
    }
    Some((start as usize, stop as usize))
}

impl DataStore {
    /// LPUSH: Push a value onto the front, returning the new length
    pub fn lpush(&self, key: &str, value: &str) -> usize {
        let mut ns = self.inner.write();
        let list = ns.lists.entry(key.to_string()).or_default();
        list.push_front(value.to_string());
        list.len()
    }

    /// RPUSH: Push a value onto the back, returning the new length
    pub fn rpush(&self, key: &str, value: &str) -> usize {
        let mut ns = self.inner.write();
        let list = ns.lists.entry(key.to_string()).or_default();
        list.push_back(value.to_string());
        list.len()
    }

    /// LPOP: Remove and return the front element
    pub fn lpop(&self, key: &str) -> Option<String> {
        let mut ns = self.inner.write();
        ns.lists.entry(key.to_string()).or_default().pop_front()
    }

    /// RPOP: Remove and return the back element
    pub fn rpop(&self, key: &str) -> Option<String> {
        let mut ns = self.inner.write();
        ns.lists.entry(key.to_string()).or_default().pop_back()
    }

    /// LLEN: Length of the list (0 if absent)
    ///
    /// Materializes the list, so it takes the write lock.
    pub fn llen(&self, key: &str) -> usize {
        let mut ns = self.inner.write();
        ns.lists.entry(key.to_string()).or_default().len()
    }

    /// LMOVE: Pop from one end of `source` and push onto one end of `destination`
    ///
    /// Returns `None` without moving anything if `source` is empty or
    /// `from` is not a direction. If `to` is not a direction the element
    /// goes back where it came from and `None` is returned.
    pub fn lmove(&self, source: &str, destination: &str, from: &str, to: &str) -> Option<String> {
        let mut ns = self.inner.write();
        let src = ns.lists.entry(source.to_string()).or_default();
        if src.is_empty() {
            return None;
        }

        let from: Direction = match from.parse() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!(source, error = %e, "LMOVE rejected");
                return None;
            }
        };
        let value = from.pop(src)?;

        match to.parse::<Direction>() {
            Ok(to) => {
                let dst = ns.lists.entry(destination.to_string()).or_default();
                to.push(dst, value.clone());
                Some(value)
            }
            Err(e) => {
                tracing::debug!(destination, error = %e, "LMOVE rolled back");
                from.push(src, value);
                None
            }
        }
    }

    /// LRANGE: Elements in the inclusive range `[start, stop]`
    ///
    /// Returns `None` if the list was never created.
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Option<Vec<String>> {
        let ns = self.inner.read();
        let list = ns.lists.get(key)?;

        Some(match normalize_range(start, stop, list.len()) {
            Some((start, stop)) => list.range(start..=stop).cloned().collect(),
            None => Vec::new(),
        })
    }

    /// LTRIM: Keep only the inclusive range `[start, stop]`
    ///
    /// Returns `false` if the list does not exist. An empty range clears it.
    pub fn ltrim(&self, key: &str, start: i64, stop: i64) -> bool {
        let mut ns = self.inner.write();
        let Some(list) = ns.lists.get_mut(key) else {
            return false;
        };

        match normalize_range(start, stop, list.len()) {
            Some((start, stop)) => {
                list.truncate(stop + 1);
                list.drain(..start);
            }
            None => list.clear(),
        }
        true
    }
}
