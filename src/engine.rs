//! Engine Module
//!
//! Routes parsed commands to the data store.
//!
//! ## Responsibilities
//! - Map each `Command` to exactly one `DataStore` operation
//! - Turn the store's typed results into protocol `Response`s
//!
//! Locking lives entirely in the `DataStore`; the engine holds no state
//! of its own beyond the store.

use crate::protocol::{Command, Response};
use crate::store::DataStore;

/// Command dispatcher over a shared data store
///
/// ## Concurrency Model
/// `execute` takes `&self`; share the engine between connection threads
/// as `Arc<Engine>`. Each command acquires the store lock once, so every
/// command is atomic and no two commands are atomic together.
#[derive(Default)]
pub struct Engine {
    store: DataStore,
}

impl Engine {
    /// Create an engine over an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Response {
        let store = &self.store;

        match command {
            Command::Ping => Response::Pong,

            // -----------------------------------------------------------------
            // Sorted Sets
            // -----------------------------------------------------------------
            Command::ZAdd { key, score, member } => Response::flag(store.zadd(&key, score, &member)),
            Command::ZRem { key, member } => Response::flag(store.zrem(&key, &member)),
            Command::ZScore { key, member } => {
                store.zscore(&key, &member).map_or(Response::Nil, Response::Score)
            }
            Command::ZRange { key, min_score, max_score, offset, count } => {
                Response::Pairs(store.zrange(&key, min_score, max_score, offset, count))
            }
            Command::ZQuery {
                key,
                min_score,
                min_member,
                max_score,
                max_member,
                offset,
                count,
            } => Response::Pairs(store.zquery(
                &key,
                min_score,
                &min_member,
                max_score,
                &max_member,
                offset,
                count,
            )),
            Command::ZRangeDel { key, min_score, max_score, offset, count } => {
                Response::Integer(store.zrange_del(&key, min_score, max_score, offset, count) as i64)
            }
            Command::ZCard { key } => Response::Integer(store.zcard(&key) as i64),

            // -----------------------------------------------------------------
            // Strings
            // -----------------------------------------------------------------
            Command::Set { key, value } => {
                store.set(&key, &value);
                Response::Ok
            }
            Command::Get { key } => Response::value_or_nil(store.get(&key)),
            Command::Del { key } => Response::flag(store.delete(&key)),
            Command::IncrBy { key, amount } => Response::integer_or_nil(store.incrby(&key, amount)),

            // -----------------------------------------------------------------
            // Lists
            // -----------------------------------------------------------------
            Command::LPush { key, value } => Response::Integer(store.lpush(&key, &value) as i64),
            Command::RPush { key, value } => Response::Integer(store.rpush(&key, &value) as i64),
            Command::LPop { key } => Response::value_or_nil(store.lpop(&key)),
            Command::RPop { key } => Response::value_or_nil(store.rpop(&key)),
            Command::LLen { key } => Response::Integer(store.llen(&key) as i64),
            Command::LMove { source, destination, from, to } => {
                Response::value_or_nil(store.lmove(&source, &destination, &from, &to))
            }
            Command::LRange { key, start, stop } => {
                store.lrange(&key, start, stop).map_or(Response::Nil, Response::List)
            }
            Command::LTrim { key, start, stop } => {
                if store.ltrim(&key, start, stop) {
                    Response::Ok
                } else {
                    Response::Nil
                }
            }

            // -----------------------------------------------------------------
            // Sets
            // -----------------------------------------------------------------
            Command::SAdd { key, member } => Response::Integer(store.sadd(&key, &member)),
            Command::SRem { key, member } => Response::integer_or_nil(store.srem(&key, &member)),
            Command::SIsMember { key, member } => {
                Response::integer_or_nil(store.sismember(&key, &member))
            }
            Command::SInter { keys } => store.sinter(&keys).map_or(Response::Nil, Response::List),
            Command::SCard { key } => Response::Integer(store.scard(&key) as i64),

            // -----------------------------------------------------------------
            // Hashes
            // -----------------------------------------------------------------
            Command::HSet { key, pairs } => Response::Integer(store.hset(&key, pairs)),
            Command::HGet { key, field } => Response::value_or_nil(store.hget(&key, &field)),
            Command::HMGet { key, fields } => {
                store.hmget(&key, &fields).map_or(Response::Nil, Response::List)
            }
            Command::HIncrBy { key, field, increment } => {
                Response::integer_or_nil(store.hincrby(&key, &field, increment))
            }
        }
    }

    /// Parse and execute one request line
    ///
    /// Malformed requests produce an error response rather than a failure.
    pub fn execute_line(&self, line: &str) -> Response {
        match crate::protocol::decode_command(line) {
            Ok(command) => self.execute(command),
            Err(e) => Response::Error(e.to_string()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the underlying data store
    pub fn store(&self) -> &DataStore {
        &self.store
    }
}
