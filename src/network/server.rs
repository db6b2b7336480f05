//! TCP Server
//!
//! Accepts connections and serves each one on its own thread.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;

use super::Connection;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::protocol::{write_response, Response};

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Live client streams, keyed by connection id
type Registry = Arc<Mutex<HashMap<u64, TcpStream>>>;

/// TCP server for multikv
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: Option<TcpListener>,
    connections: Registry,
    shutdown: Arc<AtomicBool>,
}

/// Handle for stopping a running server from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and close its connections
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        Self {
            config,
            engine,
            listener: None,
            connections: Arc::new(Mutex::new(HashMap::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listen address (idempotent), returning the bound address
    ///
    /// Binding before `run` lets callers learn the port chosen for
    /// `127.0.0.1:0`.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr)?;
        // Non-blocking so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Start the server (blocking)
    ///
    /// Returns after `shutdown` has been requested and every connection
    /// thread has finished.
    pub fn run(&mut self) -> Result<()> {
        self.config.validate()?;
        let addr = self.bind()?;
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| Error::Network("listener not bound".to_string()))?;

        tracing::info!("Listening on {}", addr);

        let wait_group = WaitGroup::new();
        let mut next_id: u64 = 0;

        while !self.shutdown.load(Ordering::Acquire) {
            match listener.accept() {
                Ok((stream, peer)) => {
                    next_id += 1;
                    if let Err(e) = self.spawn_connection(next_id, stream, wait_group.clone()) {
                        tracing::warn!("Failed to serve {}: {}", peer, e);
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        {
            let connections = self.connections.lock();
            tracing::info!("Shutting down, closing {} connection(s)", connections.len());
            for stream in connections.values() {
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
        wait_group.wait();

        self.listener = None;
        Ok(())
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Get a handle that can stop the server while `run` blocks
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.connections.lock().len()
    }

    /// Register a stream and serve it on a new thread
    fn spawn_connection(&self, id: u64, stream: TcpStream, wait_group: WaitGroup) -> Result<()> {
        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;

        {
            let mut connections = self.connections.lock();
            if connections.len() >= self.config.max_connections {
                drop(connections);
                tracing::warn!(
                    "Rejecting connection: limit of {} reached",
                    self.config.max_connections
                );
                let mut stream = stream;
                let _ = write_response(&mut stream, &Response::error("too many connections"));
                return Ok(());
            }
            connections.insert(id, stream.try_clone()?);
        }

        let engine = Arc::clone(&self.engine);
        let connections = Arc::clone(&self.connections);
        let config = self.config.clone();

        let spawned = thread::Builder::new()
            .name(format!("multikv-conn-{}", id))
            .spawn(move || {
                let _wait_group = wait_group;

                let served = Connection::new(stream, engine, config.max_line_length).and_then(
                    |mut connection| {
                        connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
                        connection.handle()
                    },
                );
                if let Err(e) = served {
                    tracing::warn!("Connection {} ended with error: {}", id, e);
                }

                connections.lock().remove(&id);
            });

        if let Err(e) = spawned {
            self.connections.lock().remove(&id);
            return Err(e.into());
        }
        Ok(())
    }
}
