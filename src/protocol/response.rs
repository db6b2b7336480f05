//! Response definitions
//!
//! Represents replies to clients.

use crate::index::ScoredMember;

/// A reply to send to a client
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// `OK`
    Ok,

    /// `PONG`
    Pong,

    /// A decimal integer
    Integer(i64),

    /// A sorted-set score
    Score(f64),

    /// A single string value
    Value(String),

    /// `(nil)`: no such key, field or element
    Nil,

    /// A count line followed by one value per line
    List(Vec<String>),

    /// A count line followed by one `member score` pair per line
    Pairs(Vec<ScoredMember>),

    /// `error: <message>`
    Error(String),
}

impl Response {
    /// Wrap an optional value, mapping `None` to `(nil)`
    pub fn value_or_nil(value: Option<String>) -> Self {
        value.map_or(Response::Nil, Response::Value)
    }

    /// Wrap an optional integer, mapping `None` to `(nil)`
    pub fn integer_or_nil(value: Option<i64>) -> Self {
        value.map_or(Response::Nil, Response::Integer)
    }

    /// Wrap a boolean as `1`/`0`
    pub fn flag(value: bool) -> Self {
        Response::Integer(i64::from(value))
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Response::Error(message.to_string())
    }
}
