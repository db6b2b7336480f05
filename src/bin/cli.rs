//! multikv CLI Client
//!
//! Command-line interface for interacting with multikv.

use std::io::{self, BufRead, Write};

use clap::Parser;
use multikv::network::Client;

/// multikv CLI
#[derive(Parser, Debug)]
#[command(name = "multikv-cli")]
#[command(about = "CLI for the multikv key-value server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Command to run once, e.g. `ZADD scores 1.5 alice`.
    /// Without one the CLI starts an interactive prompt.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("connection to {} failed: {}", args.server, e);
            std::process::exit(1);
        }
    };

    if !args.command.is_empty() {
        match client.send(&args.command.join(" ")) {
            Ok(reply) => println!("{}", reply),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = repl(&mut client) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Read commands from stdin until `quit` or end of input
fn repl(client: &mut Client) -> multikv::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "multikv> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        let reply = client.send(line)?;
        writeln!(stdout, "{}", reply)?;
    }
}
