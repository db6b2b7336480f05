//! Protocol codec
//!
//! Encoding and decoding functions for the line protocol.
//!
//! ## Wire Format
//!
//! ### Request
//! ```text
//! ZADD leaderboard 12.5 alice\n
//! └──┘ └─────────────────────┘
//!  name   whitespace-separated arguments
//! ```
//!
//! ### Reply
//! ```text
//! 1\n                      integer
//! bob\n                    value
//! (nil)\n                  absent
//! 2\nalice 12.5\nbob 13\n  count line + pairs (or values)
//! error: <message>\n       failure
//! ```

use std::io::{ErrorKind, Read, Write};

use bytes::BytesMut;

use super::{Command, CommandType, Response};
use crate::error::{Error, Result};

/// Reply text for an absent result
pub const NIL: &str = "(nil)";

/// Prefix of every error reply
pub const ERROR_PREFIX: &str = "error: ";

/// Bytes requested from the stream per read
const READ_CHUNK: usize = 4096;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command as a request line (newline-terminated)
pub fn encode_command(command: &Command) -> String {
    let mut tokens: Vec<String> = vec![command.command_type().as_str().to_string()];

    match command {
        Command::Ping => {}
        Command::ZAdd { key, score, member } => {
            tokens.extend([key.clone(), score.to_string(), member.clone()]);
        }
        Command::ZRem { key, member }
        | Command::ZScore { key, member }
        | Command::SAdd { key, member }
        | Command::SRem { key, member }
        | Command::SIsMember { key, member } => {
            tokens.extend([key.clone(), member.clone()]);
        }
        Command::ZRange { key, min_score, max_score, offset, count }
        | Command::ZRangeDel { key, min_score, max_score, offset, count } => {
            tokens.extend([
                key.clone(),
                min_score.to_string(),
                max_score.to_string(),
                offset.to_string(),
                count.to_string(),
            ]);
        }
        Command::ZQuery {
            key,
            min_score,
            min_member,
            max_score,
            max_member,
            offset,
            count,
        } => {
            tokens.extend([
                key.clone(),
                min_score.to_string(),
                min_member.clone(),
                max_score.to_string(),
                max_member.clone(),
                offset.to_string(),
                count.to_string(),
            ]);
        }
        Command::ZCard { key }
        | Command::Get { key }
        | Command::Del { key }
        | Command::LPop { key }
        | Command::RPop { key }
        | Command::LLen { key }
        | Command::SCard { key } => tokens.push(key.clone()),
        Command::Set { key, value } | Command::LPush { key, value } | Command::RPush { key, value } => {
            tokens.extend([key.clone(), value.clone()]);
        }
        Command::IncrBy { key, amount } => tokens.extend([key.clone(), amount.to_string()]),
        Command::LMove { source, destination, from, to } => {
            tokens.extend([source.clone(), destination.clone(), from.clone(), to.clone()]);
        }
        Command::LRange { key, start, stop } | Command::LTrim { key, start, stop } => {
            tokens.extend([key.clone(), start.to_string(), stop.to_string()]);
        }
        Command::SInter { keys } => tokens.extend(keys.iter().cloned()),
        Command::HSet { key, pairs } => {
            tokens.push(key.clone());
            for (field, value) in pairs {
                tokens.extend([field.clone(), value.clone()]);
            }
        }
        Command::HGet { key, field } => tokens.extend([key.clone(), field.clone()]),
        Command::HMGet { key, fields } => {
            tokens.push(key.clone());
            tokens.extend(fields.iter().cloned());
        }
        Command::HIncrBy { key, field, increment } => {
            tokens.extend([key.clone(), field.clone(), increment.to_string()]);
        }
    }

    let mut line = tokens.join(" ");
    line.push('\n');
    line
}

/// Decode a command from one request line
///
/// The command name is case-insensitive; arguments are split on ASCII
/// whitespace.
pub fn decode_command(line: &str) -> Result<Command> {
    let mut tokens = line.split_ascii_whitespace();
    let name = tokens
        .next()
        .ok_or_else(|| Error::Protocol("empty command".to_string()))?;
    let command_type: CommandType = name.parse()?;
    let args: Vec<&str> = tokens.collect();

    let command = match command_type {
        CommandType::Ping => {
            expect_arity(command_type, &args, 0)?;
            Command::Ping
        }
        CommandType::ZAdd => {
            expect_arity(command_type, &args, 3)?;
            Command::ZAdd {
                key: args[0].to_string(),
                score: parse_score(args[1])?,
                member: args[2].to_string(),
            }
        }
        CommandType::ZRem => {
            expect_arity(command_type, &args, 2)?;
            Command::ZRem { key: args[0].to_string(), member: args[1].to_string() }
        }
        CommandType::ZScore => {
            expect_arity(command_type, &args, 2)?;
            Command::ZScore { key: args[0].to_string(), member: args[1].to_string() }
        }
        CommandType::ZRange | CommandType::ZRangeDel => {
            expect_arity(command_type, &args, 5)?;
            let key = args[0].to_string();
            let min_score = parse_score(args[1])?;
            let max_score = parse_score(args[2])?;
            let offset = parse_count(args[3])?;
            let count = parse_count(args[4])?;
            if command_type == CommandType::ZRange {
                Command::ZRange { key, min_score, max_score, offset, count }
            } else {
                Command::ZRangeDel { key, min_score, max_score, offset, count }
            }
        }
        CommandType::ZQuery => {
            expect_arity(command_type, &args, 7)?;
            Command::ZQuery {
                key: args[0].to_string(),
                min_score: parse_score(args[1])?,
                min_member: args[2].to_string(),
                max_score: parse_score(args[3])?,
                max_member: args[4].to_string(),
                offset: parse_count(args[5])?,
                count: parse_count(args[6])?,
            }
        }
        CommandType::ZCard => {
            expect_arity(command_type, &args, 1)?;
            Command::ZCard { key: args[0].to_string() }
        }
        CommandType::Set => {
            expect_arity(command_type, &args, 2)?;
            Command::Set { key: args[0].to_string(), value: args[1].to_string() }
        }
        CommandType::Get => {
            expect_arity(command_type, &args, 1)?;
            Command::Get { key: args[0].to_string() }
        }
        CommandType::Del => {
            expect_arity(command_type, &args, 1)?;
            Command::Del { key: args[0].to_string() }
        }
        CommandType::IncrBy => {
            expect_arity(command_type, &args, 2)?;
            Command::IncrBy { key: args[0].to_string(), amount: parse_integer(args[1])? }
        }
        CommandType::LPush => {
            expect_arity(command_type, &args, 2)?;
            Command::LPush { key: args[0].to_string(), value: args[1].to_string() }
        }
        CommandType::RPush => {
            expect_arity(command_type, &args, 2)?;
            Command::RPush { key: args[0].to_string(), value: args[1].to_string() }
        }
        CommandType::LPop => {
            expect_arity(command_type, &args, 1)?;
            Command::LPop { key: args[0].to_string() }
        }
        CommandType::RPop => {
            expect_arity(command_type, &args, 1)?;
            Command::RPop { key: args[0].to_string() }
        }
        CommandType::LLen => {
            expect_arity(command_type, &args, 1)?;
            Command::LLen { key: args[0].to_string() }
        }
        CommandType::LMove => {
            expect_arity(command_type, &args, 4)?;
            Command::LMove {
                source: args[0].to_string(),
                destination: args[1].to_string(),
                from: args[2].to_string(),
                to: args[3].to_string(),
            }
        }
        CommandType::LRange | CommandType::LTrim => {
            expect_arity(command_type, &args, 3)?;
            let key = args[0].to_string();
            let start = parse_integer(args[1])?;
            let stop = parse_integer(args[2])?;
            if command_type == CommandType::LRange {
                Command::LRange { key, start, stop }
            } else {
                Command::LTrim { key, start, stop }
            }
        }
        CommandType::SAdd => {
            expect_arity(command_type, &args, 2)?;
            Command::SAdd { key: args[0].to_string(), member: args[1].to_string() }
        }
        CommandType::SRem => {
            expect_arity(command_type, &args, 2)?;
            Command::SRem { key: args[0].to_string(), member: args[1].to_string() }
        }
        CommandType::SIsMember => {
            expect_arity(command_type, &args, 2)?;
            Command::SIsMember { key: args[0].to_string(), member: args[1].to_string() }
        }
        CommandType::SInter => {
            if args.is_empty() {
                return Err(arity_error(command_type, "at least 1"));
            }
            Command::SInter { keys: args.iter().map(|s| s.to_string()).collect() }
        }
        CommandType::SCard => {
            expect_arity(command_type, &args, 1)?;
            Command::SCard { key: args[0].to_string() }
        }
        CommandType::HSet => {
            if args.len() < 3 || args.len() % 2 == 0 {
                return Err(arity_error(command_type, "a key and field/value pairs"));
            }
            Command::HSet {
                key: args[0].to_string(),
                pairs: args[1..]
                    .chunks_exact(2)
                    .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                    .collect(),
            }
        }
        CommandType::HGet => {
            expect_arity(command_type, &args, 2)?;
            Command::HGet { key: args[0].to_string(), field: args[1].to_string() }
        }
        CommandType::HMGet => {
            if args.len() < 2 {
                return Err(arity_error(command_type, "a key and at least 1 field"));
            }
            Command::HMGet {
                key: args[0].to_string(),
                fields: args[1..].iter().map(|s| s.to_string()).collect(),
            }
        }
        CommandType::HIncrBy => {
            expect_arity(command_type, &args, 3)?;
            Command::HIncrBy {
                key: args[0].to_string(),
                field: args[1].to_string(),
                increment: parse_integer(args[2])?,
            }
        }
    };

    Ok(command)
}

fn expect_arity(command_type: CommandType, args: &[&str], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(arity_error(command_type, &expected.to_string()));
    }
    Ok(())
}

fn arity_error(command_type: CommandType, expected: &str) -> Error {
    Error::InvalidArgument(format!("{} requires {} argument(s)", command_type, expected))
}

/// Parse a score; `inf`/`-inf` are accepted, NaN is not
fn parse_score(token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(score) if !score.is_nan() => Ok(score),
        _ => Err(Error::ParseFailure(format!("score is not a number: {}", token))),
    }
}

fn parse_integer(token: &str) -> Result<i64> {
    token
        .parse()
        .map_err(|_| Error::ParseFailure(format!("not an integer: {}", token)))
}

/// Parse an offset or count; negative values count as 0
fn parse_count(token: &str) -> Result<usize> {
    let value = parse_integer(token)?;
    Ok(usize::try_from(value.max(0)).unwrap_or(usize::MAX))
}

// =============================================================================
// Response Encoding
// =============================================================================

/// Encode a response as newline-terminated reply text
pub fn encode_response(response: &Response) -> String {
    match response {
        Response::Ok => "OK\n".to_string(),
        Response::Pong => "PONG\n".to_string(),
        Response::Integer(value) => format!("{}\n", value),
        Response::Score(score) => format!("{}\n", score),
        Response::Value(value) => format!("{}\n", value),
        Response::Nil => format!("{}\n", NIL),
        Response::List(values) => {
            let mut out = format!("{}\n", values.len());
            for value in values {
                out.push_str(value);
                out.push('\n');
            }
            out
        }
        Response::Pairs(pairs) => {
            let mut out = format!("{}\n", pairs.len());
            for (member, score) in pairs {
                out.push_str(&format!("{} {}\n", member, score));
            }
            out
        }
        Response::Error(message) => format!("{}{}\n", ERROR_PREFIX, message),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Buffered reader that frames a byte stream into lines
pub struct LineReader<R> {
    reader: R,
    buffer: BytesMut,
    max_line_length: usize,
}

impl<R: Read> LineReader<R> {
    /// Wrap a stream, rejecting lines longer than `max_line_length` bytes
    pub fn new(reader: R, max_line_length: usize) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            max_line_length,
        }
    }

    /// Read the next line, without its `\n` or `\r\n` terminator
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A final line
    /// without a terminator is still returned.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line = self.buffer.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                if line.len() > self.max_line_length {
                    return Err(self.too_long());
                }
                return Self::into_string(line).map(Some);
            }

            if self.buffer.len() > self.max_line_length + 1 {
                return Err(self.too_long());
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = match self.reader.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.split();
                return Self::into_string(line).map(Some);
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    fn too_long(&self) -> Error {
        Error::Protocol(format!(
            "line exceeds {} bytes",
            self.max_line_length
        ))
    }

    fn into_string(line: BytesMut) -> Result<String> {
        String::from_utf8(line.to_vec())
            .map_err(|_| Error::Protocol("line is not valid UTF-8".to_string()))
    }
}

/// Read the next non-blank request line
///
/// Returns `Ok(None)` at end of stream.
pub fn read_request<R: Read>(reader: &mut LineReader<R>) -> Result<Option<String>> {
    loop {
        match reader.read_line()? {
            None => return Ok(None),
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => return Ok(Some(line)),
        }
    }
}

/// Read and decode the next command
///
/// Returns `Ok(None)` at end of stream and skips blank lines.
pub fn read_command<R: Read>(reader: &mut LineReader<R>) -> Result<Option<Command>> {
    match read_request(reader)? {
        None => Ok(None),
        Some(line) => decode_command(&line).map(Some),
    }
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(encode_command(command).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read one complete reply for a command of `command_type`
///
/// Multi-line replies are returned with their lines joined by `\n`
/// (without a trailing newline).
pub fn read_response<R: Read>(reader: &mut LineReader<R>, command_type: Option<CommandType>) -> Result<String> {
    let first = reader
        .read_line()?
        .ok_or_else(|| Error::Network("connection closed before reply".to_string()))?;

    let body_lines = match command_type {
        Some(ty) if ty.has_multiline_reply() => first.parse::<usize>().unwrap_or(0),
        _ => 0,
    };

    let mut reply = first;
    for _ in 0..body_lines {
        let line = reader
            .read_line()?
            .ok_or_else(|| Error::Network("connection closed mid-reply".to_string()))?;
        reply.push('\n');
        reply.push_str(&line);
    }
    Ok(reply)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(encode_response(response).as_bytes())?;
    writer.flush()?;
    Ok(())
}
