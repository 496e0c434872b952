use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lay out ii echoconference message bodies for a terminal of a given size.
#[derive(Parser, Debug, Clone)]
#[command(name = "csview", version)]
pub struct Cli {
    /// Terminal width in columns.
    #[arg(long, short = 'W', env = "CSVIEW_WIDTH", value_name = "COLS")]
    pub width: Option<usize>,

    /// Terminal height in rows; content taller than this reserves a
    /// scrollbar column.
    #[arg(long, short = 'H', env = "CSVIEW_HEIGHT", value_name = "ROWS")]
    pub height: Option<usize>,

    /// Recognise inline styles, markdown/gemini links and embedded files.
    #[arg(long, short = 's')]
    pub styles: bool,

    /// Display rows to scroll past before the first shown row.
    #[arg(long, value_name = "ROWS")]
    pub skip: Option<usize>,

    /// The input is a stored message; drop its header lines.
    #[arg(long, short = 'm')]
    pub message: bool,

    /// Print JSON instead of text.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// TOML file with `[view]` defaults.
    #[arg(long, short = 'c', env = "CSVIEW_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Message file; standard input when absent or `-`.
    #[arg(long, short = 'f', global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// Print the wrapped rows (default).
    #[default]
    Render,
    /// Dump tokens with their rendered rows.
    Tokens,
    /// Show body statistics.
    Stats,
    /// List links and where they lead.
    Links,
    /// Find a case-insensitive regular expression in the rendered rows.
    Search {
        query: String,
        /// Select the first hit at or after this token.
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Quote the body for a reply. With `--message` the reply subject
    /// comes first.
    Quote {
        /// Author of the quoted message.
        #[arg(long, default_value = "")]
        author: String,
        /// Bare `>` quoting without initials.
        #[arg(long)]
        old_style: bool,
    },
}

impl Cli {
    /// The command to run; rendering when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}
