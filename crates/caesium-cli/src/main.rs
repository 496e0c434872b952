//! csview - lay out ii echoconference message bodies in the terminal
//!
//! Usage:
//!   csview [OPTIONS] [COMMAND] [-f FILE]
//!
//! Commands:
//!   render    Print the wrapped rows (default)
//!   tokens    Dump tokens with their rendered rows
//!   stats     Show body statistics
//!   links     List links and where they lead
//!   search    Find a pattern in the rendered rows
//!   quote     Quote the body for a reply

use std::io::{self, Write};
use std::process;

use anyhow::Result;
use clap::Parser;
use csview::Cli;

fn main() {
    let cli = Cli::parse();
    csview::init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = csview::read_input(cli.file.as_deref())?;
    let output = csview::execute(cli, &input)?;
    io::stdout().lock().write_all(output.as_bytes())?;
    Ok(())
}
