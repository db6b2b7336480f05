//! Data Store Module
//!
//! Owns the five typed namespaces and arbitrates concurrent access.
//!
//! ## Namespaces
//! - Sorted set: one `OrderedIndex` per key
//! - String: one value per key
//! - List: `VecDeque` per key
//! - Set: `HashSet` per key
//! - Hash: field -> value map per key
//!
//! A key name is looked up independently in each namespace; the same
//! name may hold a value of every type at once.
//!
//! ## Concurrency Model
//! A single `RwLock` guards all namespaces jointly and is held for the
//! whole of one operation:
//! - Reads (scores, ranges, membership, cardinality, `get`) take the shared lock
//! - Writes, and reads that materialize a container, take the exclusive lock
//!
//! Every operation is atomic on its own; there is no multi-operation
//! atomicity.
//!
//! ## Materialization
//! `lpush`, `rpush`, `lpop`, `rpop`, `llen`, `lmove`, `sadd`, `hset` and
//! `zadd` create an empty container for an unseen key. A list touched by
//! `lpop` or `llen` is therefore visible to `lrange`/`ltrim` afterwards.

mod hash;
mod list;
mod set;
mod string;
mod zset;

pub use list::Direction;

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::index::OrderedIndex;

/// All per-key containers, guarded together by `DataStore::inner`
#[derive(Default)]
struct Namespaces {
    zsets: HashMap<String, OrderedIndex>,
    strings: HashMap<String, String>,
    lists: HashMap<String, VecDeque<String>>,
    sets: HashMap<String, HashSet<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
}

/// In-memory multi-type data store
///
/// Share it between threads as `Arc<DataStore>`; every method takes
/// `&self`.
#[derive(Default)]
pub struct DataStore {
    inner: RwLock<Namespaces>,
}

impl DataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parse `stored` as a base-10 `i64` and add `amount` to it
///
/// Fails without side effects on non-numeric text or overflow.
fn add_integer(stored: &str, amount: i64) -> Result<i64> {
    let current: i64 = stored
        .parse()
        .map_err(|_| Error::ParseFailure(format!("value is not an integer: {:?}", stored)))?;

    current
        .checked_add(amount)
        .ok_or_else(|| Error::ParseFailure(format!("{} + {} overflows", current, amount)))
}
