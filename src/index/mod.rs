//! Ordered Index Module
//!
//! Skip list backing the sorted-set namespace.
//!
//! ## Responsibilities
//! - Keep members unique, ordered by `(score, member)` ascending
//! - Point lookup, insert/upsert and removal by member
//! - Score-range scans with offset/count, with and without a member tie-break
//! - Range deletion
//!
//! ## Data Structure Choice
//! Nodes live in an arena (`Vec`) and link to each other by slot index:
//! ```text
//! level 3: HEAD ─────────────────────────────▶ [c 3.0]
//! level 2: HEAD ──────────▶ [b 2.0] ─────────▶ [c 3.0]
//! level 1: HEAD ▶ [a 1.0] ▶ [b 2.0] ─────────▶ [c 3.0] ▶ [d 4.0]
//! ```
//! A member→score map sits beside the list so point operations can
//! descend straight to a member's `(score, member)` position.

mod skiplist;

pub use skiplist::{Iter, OrderedIndex, MAX_LEVEL};

/// A `(member, score)` pair as returned by range queries
pub type ScoredMember = (String, f64);
