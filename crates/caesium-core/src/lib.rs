//! # Caesium Core
//!
//! Markup tokenizer and soft-wrap layout engine for ii echoconference
//! messages.
//!
//! A message body goes through two passes. [`tokenize`] turns its lines into
//! a flat list of typed [`Token`]s (headers, quotes, code, links, style
//! markers, embedded files). [`layout`] then wraps every token for a
//! terminal of a given size, filling in the rows it occupies. Layout can be
//! repeated on every resize; only changing [`TokenizeOptions`] requires
//! tokenizing again.
//!
//! ## Quick Start
//!
//! ```rust
//! use caesium_core::{layout, token_line_map, tokenize, TokenKind, TokenizeOptions};
//!
//! let body = ["== Greetings", "Read http://example.org first", "> quoted"];
//! let mut tokens = tokenize(&body, 0, &TokenizeOptions::default());
//! assert_eq!(tokens[0].kind, TokenKind::Header);
//!
//! let rows = layout(&mut tokens, 20, None).unwrap();
//! assert_eq!(rows, 4);
//!
//! let map = token_line_map(&tokens);
//! assert_eq!(map.last().map(|r| r.end), Some(3));
//! ```
//!
//! ## Inline styles
//!
//! With [`TokenizeOptions::inline_styles`] off only plain links are found
//! inside lines. With it on, `` `code` ``, `*italic*`, `**bold**`,
//! `[title](url)` and `=> url title` links are recognised, and embedded
//! files become attachment links:
//!
//! ```rust
//! use caesium_core::{tokenize, TokenKind, TokenizeOptions};
//!
//! let tokens = tokenize(&["**bold** text"], 0, &TokenizeOptions::styled());
//! assert_eq!(tokens[0].kind, TokenKind::BoldBegin);
//! ```

pub mod attach;
pub mod attrs;
pub mod error;
pub mod inline;
pub mod layout;
pub mod lexer;
pub mod linemap;
pub mod links;
pub mod parser;
mod patterns;
pub mod pgp;
pub mod reply;
pub mod scroll;
pub mod search;
pub mod span;
pub mod token;

pub use attrs::{attrs_before, TextAttrs};
pub use error::{LayoutError, PgpError};
pub use inline::scan_inline;
pub use layout::layout;
pub use lexer::{message_body, split_lines};
pub use linemap::{find_pos_by_anchor, find_visible_token, token_line_map};
pub use links::LinkTarget;
pub use parser::{tokenize, TokenizeOptions, Tokenizer};
pub use pgp::{KeyInfo, KeyInspector, SignatureInfo};
pub use scroll::ScrollCalc;
pub use search::{QuickSearch, SearchHit};
pub use span::RangeLines;
pub use token::{Attachment, Token, TokenKind};
