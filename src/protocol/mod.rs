//! Protocol Module
//!
//! Defines the line protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! One request per line; the first token names the command, the rest are
//! its arguments:
//! ```text
//! ZQUERY scores 1.5 a 3.5 d 0 10\n
//! ```
//!
//! ### Commands
//! - Sorted sets: ZADD, ZREM, ZSCORE, ZRANGE, ZQUERY, ZRANGEDEL, ZCARD
//! - Strings:     SET, GET, DEL, INCRBY
//! - Lists:       LPUSH, RPUSH, LPOP, RPOP, LLEN, LMOVE, LRANGE, LTRIM
//! - Sets:        SADD, SREM, SISMEMBER, SINTER, SCARD
//! - Hashes:      HSET, HGET, HMGET, HINCRBY
//! - PING
//!
//! ### Replies
//! - `OK` / `PONG`
//! - an integer, a score or a value on one line
//! - `(nil)` for an absent result
//! - a count line followed by that many lines for ranges and multi-gets
//! - `error: <message>` for malformed or unknown commands

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{
    encode_command, decode_command, encode_response,
    read_request, read_command, write_command, read_response, write_response,
    LineReader, ERROR_PREFIX, NIL,
};
