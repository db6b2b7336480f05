//! Tests for Engine
//!
//! These tests verify:
//! - Request lines dispatch to the right store operation
//! - Typed results map to the right replies
//! - Malformed requests become error replies
//! - Concurrent access through a shared engine

use std::sync::Arc;
use std::thread;

use multikv::engine::Engine;
use multikv::protocol::{encode_response, Command, Response};

// =============================================================================
// Helper Functions
// =============================================================================

/// Execute a line and return the encoded reply text
fn reply(engine: &Engine, line: &str) -> String {
    encode_response(&engine.execute_line(line))
}

// =============================================================================
// Sorted Set Tests
// =============================================================================

#[test]
fn test_zadd_zscore_zrange() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "ZADD z 1 a"), "1\n");
    assert_eq!(reply(&engine, "ZADD z 2 b"), "1\n");
    assert_eq!(reply(&engine, "ZADD z 3 c"), "1\n");
    assert_eq!(reply(&engine, "ZADD z 4 d"), "1\n");
    assert_eq!(reply(&engine, "ZADD z 2.5 b"), "0\n");

    assert_eq!(reply(&engine, "ZSCORE z b"), "2.5\n");
    assert_eq!(reply(&engine, "ZSCORE z nobody"), "(nil)\n");
    assert_eq!(reply(&engine, "ZRANGE z 1.5 3.5 0 10"), "2\nb 2.5\nc 3\n");
    assert_eq!(reply(&engine, "ZQUERY z 1.5 a 3.5 d 0 10"), "2\nb 2.5\nc 3\n");
    assert_eq!(reply(&engine, "ZCARD z"), "4\n");
}

#[test]
fn test_zrem_and_zrangedel() {
    let engine = Engine::new();
    for (score, member) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
        engine.execute_line(&format!("ZADD z {} {}", score, member));
    }

    assert_eq!(reply(&engine, "ZREM z a"), "1\n");
    assert_eq!(reply(&engine, "ZREM z a"), "0\n");
    assert_eq!(reply(&engine, "ZRANGEDEL z 0 10 1 1"), "1\n");
    assert_eq!(reply(&engine, "ZRANGE z -inf inf 0 10"), "2\nb 2\nd 4\n");
}

#[test]
fn test_zrange_missing_key_is_empty() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "ZRANGE nothing 0 10 0 10"), "0\n");
}

// =============================================================================
// String Tests
// =============================================================================

#[test]
fn test_string_commands() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "SET counter 10"), "OK\n");
    assert_eq!(reply(&engine, "INCRBY counter 5"), "15\n");
    assert_eq!(reply(&engine, "INCRBY missing 5"), "5\n");
    assert_eq!(reply(&engine, "GET counter"), "15\n");
    assert_eq!(reply(&engine, "DEL counter"), "1\n");
    assert_eq!(reply(&engine, "DEL counter"), "0\n");
    assert_eq!(reply(&engine, "GET counter"), "(nil)\n");

    assert_eq!(reply(&engine, "SET name bob"), "OK\n");
    assert_eq!(reply(&engine, "INCRBY name 1"), "(nil)\n");
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_commands() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "RPUSH l a"), "1\n");
    assert_eq!(reply(&engine, "RPUSH l b"), "2\n");
    assert_eq!(reply(&engine, "RPUSH l c"), "3\n");
    assert_eq!(reply(&engine, "RPUSH l d"), "4\n");
    assert_eq!(reply(&engine, "LTRIM l 1 2"), "OK\n");
    assert_eq!(reply(&engine, "LRANGE l 0 -1"), "2\nb\nc\n");
    assert_eq!(reply(&engine, "LPUSH l z"), "3\n");
    assert_eq!(reply(&engine, "LPOP l"), "z\n");
    assert_eq!(reply(&engine, "RPOP l"), "c\n");
    assert_eq!(reply(&engine, "LLEN l"), "1\n");

    assert_eq!(reply(&engine, "LRANGE never 0 -1"), "(nil)\n");
    assert_eq!(reply(&engine, "LTRIM never 0 -1"), "(nil)\n");
    assert_eq!(reply(&engine, "LPOP fresh"), "(nil)\n");
    assert_eq!(reply(&engine, "LRANGE fresh 0 -1"), "0\n");
}

#[test]
fn test_lmove_commands() {
    let engine = Engine::new();
    engine.execute_line("RPUSH src a");
    engine.execute_line("RPUSH src b");

    assert_eq!(reply(&engine, "LMOVE src dst RIGHT LEFT"), "b\n");
    assert_eq!(reply(&engine, "LMOVE src dst LEFT NOWHERE"), "(nil)\n");
    assert_eq!(reply(&engine, "LRANGE src 0 -1"), "1\na\n");
    assert_eq!(reply(&engine, "LRANGE dst 0 -1"), "1\nb\n");
}

// =============================================================================
// Set Tests
// =============================================================================

#[test]
fn test_set_commands() {
    let engine = Engine::new();
    for member in ["a", "b", "c"] {
        engine.execute_line(&format!("SADD s1 {}", member));
    }
    for member in ["b", "c", "d"] {
        engine.execute_line(&format!("SADD s2 {}", member));
    }

    assert_eq!(reply(&engine, "SADD s1 a"), "0\n");
    assert_eq!(reply(&engine, "SINTER s1 s2"), "2\nb\nc\n");
    assert_eq!(reply(&engine, "SINTER s1 nope"), "(nil)\n");
    assert_eq!(reply(&engine, "SISMEMBER s1 a"), "1\n");
    assert_eq!(reply(&engine, "SISMEMBER nope a"), "(nil)\n");
    assert_eq!(reply(&engine, "SREM s1 a"), "1\n");
    assert_eq!(reply(&engine, "SREM nope a"), "(nil)\n");
    assert_eq!(reply(&engine, "SCARD s1"), "2\n");
}

// =============================================================================
// Hash Tests
// =============================================================================

#[test]
fn test_hash_commands() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "HSET h a 1 b 2"), "2\n");
    assert_eq!(reply(&engine, "HSET h a 10 c 3"), "1\n");
    assert_eq!(reply(&engine, "HGET h a"), "10\n");
    assert_eq!(reply(&engine, "HGET h zz"), "(nil)\n");
    assert_eq!(reply(&engine, "HMGET h c zz a"), "2\n3\n10\n");
    assert_eq!(reply(&engine, "HMGET nope a"), "(nil)\n");
    assert_eq!(reply(&engine, "HINCRBY h a -4"), "6\n");
    assert_eq!(reply(&engine, "HINCRBY nope a 1"), "(nil)\n");
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_ping() {
    let engine = Engine::new();

    assert_eq!(engine.execute(Command::Ping), Response::Pong);
    assert_eq!(reply(&engine, "ping"), "PONG\n");
}

#[test]
fn test_execute_typed_command() {
    let engine = Engine::new();

    let response = engine.execute(Command::ZAdd {
        key: "z".to_string(),
        score: 1.0,
        member: "m".to_string(),
    });

    assert_eq!(response, Response::Integer(1));
    assert_eq!(engine.store().zscore("z", "m"), Some(1.0));
}

#[test]
fn test_malformed_requests_become_errors() {
    let engine = Engine::new();

    assert_eq!(reply(&engine, "FOO bar"), "error: Unknown command 'FOO'\n");
    assert_eq!(
        reply(&engine, "ZADD z 1"),
        "error: Invalid argument: ZADD requires 3 argument(s)\n"
    );
    assert!(reply(&engine, "ZADD z notanumber m").starts_with("error: "));

    // Nothing was stored by the failed requests
    assert_eq!(engine.store().zcard("z"), 0);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_clients_share_one_store() {
    let engine = Arc::new(Engine::new());

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..100 {
                    let n = t * 100 + i;
                    let line = format!("ZADD shared {} m{}", n, n);
                    assert_eq!(engine.execute_line(&line), Response::Integer(1));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(reply(&engine, "ZCARD shared"), "1000\n");
    match engine.execute_line("ZQUERY shared -inf a inf z 0 5000") {
        Response::Pairs(pairs) => assert_eq!(pairs.len(), 1000),
        other => panic!("Expected pairs, got {:?}", other),
    }
}
