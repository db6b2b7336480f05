//! TCP Client
//!
//! Blocking client for the line protocol, used by the CLI and tests.

use std::io::{BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::Result;
use crate::protocol::{read_response, write_command, Command, CommandType, LineReader};

/// Longest reply line the client accepts (16 MB)
const MAX_REPLY_LINE: usize = 16 * 1024 * 1024;

/// A connection to a multikv server
pub struct Client {
    reader: LineReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: LineReader::new(read_stream, MAX_REPLY_LINE),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a raw request line and return the full reply text
    ///
    /// Multi-line replies come back joined by `\n`.
    pub fn send(&mut self, line: &str) -> Result<String> {
        let command_type = line
            .split_ascii_whitespace()
            .next()
            .and_then(|name| name.parse::<CommandType>().ok());

        self.writer.write_all(line.trim_end().as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;

        read_response(&mut self.reader, command_type)
    }

    /// Send a typed command and return the full reply text
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader, Some(command.command_type()))
    }
}
