//! Command definitions
//!
//! Represents commands from clients.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Ping,
    // Sorted sets
    ZAdd,
    ZRem,
    ZScore,
    ZRange,
    ZQuery,
    ZRangeDel,
    ZCard,
    // Strings
    Set,
    Get,
    Del,
    IncrBy,
    // Lists
    LPush,
    RPush,
    LPop,
    RPop,
    LLen,
    LMove,
    LRange,
    LTrim,
    // Sets
    SAdd,
    SRem,
    SIsMember,
    SInter,
    SCard,
    // Hashes
    HSet,
    HGet,
    HMGet,
    HIncrBy,
}

impl CommandType {
    /// Every command type, in protocol documentation order
    pub const ALL: [CommandType; 29] = [
        CommandType::Ping,
        CommandType::ZAdd,
        CommandType::ZRem,
        CommandType::ZScore,
        CommandType::ZRange,
        CommandType::ZQuery,
        CommandType::ZRangeDel,
        CommandType::ZCard,
        CommandType::Set,
        CommandType::Get,
        CommandType::Del,
        CommandType::IncrBy,
        CommandType::LPush,
        CommandType::RPush,
        CommandType::LPop,
        CommandType::RPop,
        CommandType::LLen,
        CommandType::LMove,
        CommandType::LRange,
        CommandType::LTrim,
        CommandType::SAdd,
        CommandType::SRem,
        CommandType::SIsMember,
        CommandType::SInter,
        CommandType::SCard,
        CommandType::HSet,
        CommandType::HGet,
        CommandType::HMGet,
        CommandType::HIncrBy,
    ];

    /// Wire name of the command
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::Ping => "PING",
            CommandType::ZAdd => "ZADD",
            CommandType::ZRem => "ZREM",
            CommandType::ZScore => "ZSCORE",
            CommandType::ZRange => "ZRANGE",
            CommandType::ZQuery => "ZQUERY",
            CommandType::ZRangeDel => "ZRANGEDEL",
            CommandType::ZCard => "ZCARD",
            CommandType::Set => "SET",
            CommandType::Get => "GET",
            CommandType::Del => "DEL",
            CommandType::IncrBy => "INCRBY",
            CommandType::LPush => "LPUSH",
            CommandType::RPush => "RPUSH",
            CommandType::LPop => "LPOP",
            CommandType::RPop => "RPOP",
            CommandType::LLen => "LLEN",
            CommandType::LMove => "LMOVE",
            CommandType::LRange => "LRANGE",
            CommandType::LTrim => "LTRIM",
            CommandType::SAdd => "SADD",
            CommandType::SRem => "SREM",
            CommandType::SIsMember => "SISMEMBER",
            CommandType::SInter => "SINTER",
            CommandType::SCard => "SCARD",
            CommandType::HSet => "HSET",
            CommandType::HGet => "HGET",
            CommandType::HMGet => "HMGET",
            CommandType::HIncrBy => "HINCRBY",
        }
    }

    /// Whether a successful reply is a count line followed by that many lines
    pub fn has_multiline_reply(self) -> bool {
        matches!(
            self,
            CommandType::ZRange
                | CommandType::ZQuery
                | CommandType::LRange
                | CommandType::SInter
                | CommandType::HMGet
        )
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = Error;

    /// Case-insensitive lookup by wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ping (health check)
    Ping,

    // -------------------------------------------------------------------------
    // Sorted Sets
    // -------------------------------------------------------------------------
    ZAdd { key: String, score: f64, member: String },
    ZRem { key: String, member: String },
    ZScore { key: String, member: String },
    ZRange {
        key: String,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    },
    ZQuery {
        key: String,
        min_score: f64,
        min_member: String,
        max_score: f64,
        max_member: String,
        offset: usize,
        count: usize,
    },
    ZRangeDel {
        key: String,
        min_score: f64,
        max_score: f64,
        offset: usize,
        count: usize,
    },
    ZCard { key: String },

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------
    Set { key: String, value: String },
    Get { key: String },
    Del { key: String },
    IncrBy { key: String, amount: i64 },

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------
    LPush { key: String, value: String },
    RPush { key: String, value: String },
    LPop { key: String },
    RPop { key: String },
    LLen { key: String },
    /// Directions stay textual; the store validates them and rolls back
    LMove {
        source: String,
        destination: String,
        from: String,
        to: String,
    },
    LRange { key: String, start: i64, stop: i64 },
    LTrim { key: String, start: i64, stop: i64 },

    // -------------------------------------------------------------------------
    // Sets
    // -------------------------------------------------------------------------
    SAdd { key: String, member: String },
    SRem { key: String, member: String },
    SIsMember { key: String, member: String },
    SInter { keys: Vec<String> },
    SCard { key: String },

    // -------------------------------------------------------------------------
    // Hashes
    // -------------------------------------------------------------------------
    HSet { key: String, pairs: Vec<(String, String)> },
    HGet { key: String, field: String },
    HMGet { key: String, fields: Vec<String> },
    HIncrBy { key: String, field: String, increment: i64 },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Ping => CommandType::Ping,
            Command::ZAdd { .. } => CommandType::ZAdd,
            Command::ZRem { .. } => CommandType::ZRem,
            Command::ZScore { .. } => CommandType::ZScore,
            Command::ZRange { .. } => CommandType::ZRange,
            Command::ZQuery { .. } => CommandType::ZQuery,
            Command::ZRangeDel { .. } => CommandType::ZRangeDel,
            Command::ZCard { .. } => CommandType::ZCard,
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Del { .. } => CommandType::Del,
            Command::IncrBy { .. } => CommandType::IncrBy,
            Command::LPush { .. } => CommandType::LPush,
            Command::RPush { .. } => CommandType::RPush,
            Command::LPop { .. } => CommandType::LPop,
            Command::RPop { .. } => CommandType::RPop,
            Command::LLen { .. } => CommandType::LLen,
            Command::LMove { .. } => CommandType::LMove,
            Command::LRange { .. } => CommandType::LRange,
            Command::LTrim { .. } => CommandType::LTrim,
            Command::SAdd { .. } => CommandType::SAdd,
            Command::SRem { .. } => CommandType::SRem,
            Command::SIsMember { .. } => CommandType::SIsMember,
            Command::SInter { .. } => CommandType::SInter,
            Command::SCard { .. } => CommandType::SCard,
            Command::HSet { .. } => CommandType::HSet,
            Command::HGet { .. } => CommandType::HGet,
            Command::HMGet { .. } => CommandType::HMGet,
            Command::HIncrBy { .. } => CommandType::HIncrBy,
        }
    }
}
