//! csview - lay out ii echoconference message bodies in the terminal
//!
//! Reads a message body, tokenizes it with `caesium-core`, wraps it for the
//! configured width and prints the result as rows, a token dump, statistics,
//! links, search hits or a reply quote.

pub mod cli;
pub mod config;
mod output;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use caesium_core::reply::{quote_author, quote_reply, reply_subject};
use caesium_core::lexer::BODY_OFFSET;
use caesium_core::{layout, message_body, split_lines, Tokenizer};
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command};
pub use config::{FileConfig, ViewConfig};

use crate::output::LaidOut;

const DEFAULT_FILTER: &str = "csview=info,caesium_core=warn";
const VERBOSE_FILTER: &str = "debug";

/// Subject line of a stored message, just before the blank separator.
const SUBJECT_LINE: usize = BODY_OFFSET - 2;

/// Install the stderr log subscriber. `RUST_LOG` wins when it parses.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_filter))
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Read the message from `path`, or from stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
        }
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

/// Run the selected command over `input` and return what it prints.
pub fn execute(cli: &Cli, input: &str) -> Result<String> {
    let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
    let view = ViewConfig::resolve(cli, file.as_ref());
    tracing::debug!(?view, "view settings");

    let lines = split_lines(input);
    let body = if cli.message {
        message_body(&lines)
    } else {
        lines.clone()
    };

    match cli.command() {
        Command::Render => output::render(&lay_out(input, &body, view)?, cli.json),
        Command::Tokens => output::tokens(&lay_out(input, &body, view)?, cli.json),
        Command::Stats => output::stats(&lay_out(input, &body, view)?, cli.json),
        Command::Links => output::links(&lay_out(input, &body, view)?, cli.json),
        Command::Search { query, from } => output::search(&lay_out(input, &body, view)?, &query, from, cli.json),
        Command::Quote { author, old_style } => {
            let author = quote_author(&author, old_style);
            let mut out = String::new();
            if let Some(subject) = cli.message.then(|| lines.get(SUBJECT_LINE)).flatten() {
                out.push_str(&reply_subject(subject));
                out.push_str("\n\n");
            }
            for line in quote_reply(&body, &author) {
                out.push_str(&line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn lay_out<'a>(input: &'a str, body: &[&str], view: ViewConfig) -> Result<LaidOut<'a>> {
    let mut tokens = Tokenizer::new(view.tokenize_options()).tokenize(body, 0);
    let rows = layout(&mut tokens, view.width, view.height)
        .with_context(|| format!("cannot lay out message at {} columns", view.width))?;
    tracing::debug!(tokens = tokens.len(), rows, "message laid out");
    Ok(LaidOut {
        input,
        source_lines: body.len(),
        tokens,
        rows,
        view,
    })
}
