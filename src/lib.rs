//! # multikv
//!
//! An in-memory, multi-type key-value engine with:
//! - Five independent namespaces: strings, lists, sets, hashes, sorted sets
//! - A skip-list ordered index behind every sorted set
//! - One readers-writer lock per store, held for exactly one operation
//! - A line-oriented TCP protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │               (one thread per client)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  request lines
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Protocol + Engine                            │
//! │          (parse, dispatch, format replies)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one call per command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      DataStore                               │
//! │                  (single RwLock)                             │
//! └──┬──────────┬──────────┬──────────┬──────────┬──────────────┘
//!    ▼          ▼          ▼          ▼          ▼
//!  String     List       Set        Hash    OrderedIndex
//!                                           (skip list)
//! ```
//!
//! ## Example
//!
//! ```
//! use multikv::DataStore;
//!
//! let store = DataStore::new();
//! store.zadd("scores", 1.0, "a");
//! store.zadd("scores", 2.0, "b");
//! assert_eq!(store.zrange("scores", 0.0, 10.0, 0, 10).len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod index;
pub mod store;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Error, Result};
pub use config::Config;
pub use engine::Engine;
pub use index::{OrderedIndex, ScoredMember};
pub use store::{DataStore, Direction};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of multikv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
