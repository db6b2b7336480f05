//! Tests for the TCP server and client
//!
//! These tests verify:
//! - Request/reply round trips over a real socket
//! - Multi-line replies are read completely
//! - Several clients share one store
//! - The connection limit is enforced
//! - Shutdown closes open connections and stops the accept loop

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use multikv::network::{Client, Server, ShutdownHandle};
use multikv::protocol::Command;
use multikv::{Config, Engine};

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: JoinHandle<multikv::Result<()>>,
}

impl TestServer {
    fn start(max_connections: usize) -> Self {
        let config = Config::builder()
            .listen_addr("127.0.0.1:0")
            .max_connections(max_connections)
            .build();

        let mut server = Server::new(config, Arc::new(Engine::new()));
        let addr = server.bind().unwrap();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run());

        Self { addr, shutdown, thread }
    }

    fn client(&self) -> Client {
        Client::connect(self.addr).unwrap()
    }

    fn stop(self) {
        self.shutdown.shutdown();
        self.thread.join().unwrap().unwrap();
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_ping() {
    let server = TestServer::start(16);
    let mut client = server.client();

    assert_eq!(client.send("PING").unwrap(), "PONG");

    drop(client);
    server.stop();
}

#[test]
fn test_sorted_set_round_trip() {
    let server = TestServer::start(16);
    let mut client = server.client();

    assert_eq!(client.send("ZADD z 1 a").unwrap(), "1");
    assert_eq!(client.send("ZADD z 2 b").unwrap(), "1");
    assert_eq!(client.send("ZADD z 3 c").unwrap(), "1");
    assert_eq!(client.send("ZADD z 4 d").unwrap(), "1");

    assert_eq!(client.send("ZRANGE z 1.5 3.5 0 10").unwrap(), "2\nb 2\nc 3");
    assert_eq!(client.send("ZQUERY z 1.5 a 3.5 d 0 10").unwrap(), "2\nb 2\nc 3");
    assert_eq!(client.send("ZSCORE z d").unwrap(), "4");

    drop(client);
    server.stop();
}

#[test]
fn test_typed_command_round_trip() {
    let server = TestServer::start(16);
    let mut client = server.client();

    let hset = Command::HSet {
        key: "h".to_string(),
        pairs: vec![("a".into(), "1".into()), ("b".into(), "2".into())],
    };
    assert_eq!(client.execute(&hset).unwrap(), "2");

    let hmget = Command::HMGet {
        key: "h".to_string(),
        fields: vec!["b".into(), "a".into()],
    };
    assert_eq!(client.execute(&hmget).unwrap(), "2\n2\n1");

    drop(client);
    server.stop();
}

#[test]
fn test_error_replies_keep_connection_open() {
    let server = TestServer::start(16);
    let mut client = server.client();

    assert_eq!(client.send("BOGUS 1 2").unwrap(), "error: Unknown command 'BOGUS'");
    assert!(client.send("ZRANGE z a b 0 1").unwrap().starts_with("error: "));
    assert_eq!(client.send("LRANGE nothing 0 -1").unwrap(), "(nil)");
    assert_eq!(client.send("PING").unwrap(), "PONG");

    drop(client);
    server.stop();
}

#[test]
fn test_blank_lines_get_no_reply() {
    let server = TestServer::start(16);

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.write_all(b"\r\n   \n\nPING\n").unwrap();

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "PONG\n");

    drop(reader);
    server.stop();
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_clients() {
    let server = TestServer::start(64);
    let addr = server.addr;

    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                let mut client = Client::connect(addr).unwrap();
                for i in 0..50 {
                    let reply = client.send(&format!("SADD shared m{}-{}", t, i)).unwrap();
                    assert_eq!(reply, "1");
                    client.send("INCRBY hits 1").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut client = server.client();
    assert_eq!(client.send("SCARD shared").unwrap(), "400");
    assert_eq!(client.send("GET hits").unwrap(), "400");

    drop(client);
    server.stop();
}

#[test]
fn test_connection_limit() {
    let server = TestServer::start(1);

    // A completed round trip means the first connection is registered
    let mut first = server.client();
    assert_eq!(first.send("PING").unwrap(), "PONG");

    let second = TcpStream::connect(server.addr).unwrap();
    let mut reader = BufReader::new(second);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert_eq!(line, "error: too many connections\n");

    // The first client is unaffected
    assert_eq!(first.send("PING").unwrap(), "PONG");

    drop(first);
    server.stop();
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_shutdown_closes_open_connections() {
    let server = TestServer::start(16);
    let mut client = server.client();
    assert_eq!(client.send("SET k v").unwrap(), "OK");

    // Returns only once the connection thread has exited
    server.stop();

    assert!(client.send("GET k").is_err());
}

#[test]
fn test_shutdown_without_clients() {
    let server = TestServer::start(16);
    server.stop();
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(0)
        .build();
    assert!(matches!(config.validate(), Err(multikv::Error::Config(_))));

    let mut server = Server::new(config, Arc::new(Engine::new()));
    assert!(matches!(server.run(), Err(multikv::Error::Config(_))));

    let config = Config::builder().max_line_length(0).build();
    assert!(matches!(config.validate(), Err(multikv::Error::Config(_))));
    assert!(Config::default().validate().is_ok());
}
