//! ACH Encoder CLI
//!
//! Reads a file header CSV and a payment entries CSV and writes the encoded
//! NACHA file to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- header.csv entries.csv > payments.ach
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use ach_encoder::{instructions, AchError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(AchError::MissingArgument);
    }

    let header = BufReader::new(File::open(&args[1])?);
    let entries = BufReader::new(File::open(&args[2])?);

    let file = instructions::load(header, entries)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    file.write_to(handle)?;

    Ok(())
}
