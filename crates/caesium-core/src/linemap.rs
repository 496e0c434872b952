//! Display-line bookkeeping over laid-out tokens.
//!
//! Rows are counted the same way layout counts them: a token on a later
//! source line than its predecessor opens a new row, and a token rendered
//! into `n` lines occupies `n - 1` further rows. Counting starts at the
//! first token's source line.

use crate::span::RangeLines;
use crate::token::{Token, TokenKind};

/// Walks tokens in order, yielding the first display row of each.
struct RowCounter {
    line: usize,
    row: usize,
}

impl RowCounter {
    fn new(tokens: &[Token]) -> Self {
        Self {
            line: tokens.first().map_or(0, |t| t.line),
            row: 0,
        }
    }

    /// First row of `token`; advances past its render.
    #[inline]
    fn start(&mut self, token: &Token) -> usize {
        if token.line > self.line {
            self.line = token.line;
            self.row += 1;
        }
        let start = self.row;
        self.row += token.extra_rows();
        start
    }
}

/// The display rows each token occupies, one entry per token.
pub fn token_line_map(tokens: &[Token]) -> Vec<RangeLines> {
    let mut rows = RowCounter::new(tokens);
    tokens
        .iter()
        .map(|token| {
            let start = rows.start(token);
            RangeLines::new(start, start + token.extra_rows())
        })
        .collect()
}

/// Token shown at display row `scroll`, and the offset of that row inside
/// the token's render.
///
/// Scrolling past the end yields the last row of the last token; an empty
/// token list yields `None`.
pub fn find_visible_token(tokens: &[Token], scroll: usize) -> Option<(usize, usize)> {
    let last = tokens.last()?;
    let mut rows = RowCounter::new(tokens);
    for (idx, token) in tokens.iter().enumerate() {
        let start = rows.start(token);
        if rows.row >= scroll {
            return Some((idx, scroll.saturating_sub(start)));
        }
    }
    Some((tokens.len() - 1, last.extra_rows()))
}

/// Display row of the header a same-document link points to.
///
/// A header matches when its text, lowercased with dots dropped and spaces
/// turned into hyphens, equals the link target after `#`, or when it equals
/// the link title ignoring case.
pub fn find_pos_by_anchor(tokens: &[Token], anchor: &Token) -> Option<usize> {
    let target = anchor.url.as_deref().map(|url| {
        let mut chars = url.chars();
        chars.next();
        chars.as_str()
    });
    let title = anchor
        .title
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut rows = RowCounter::new(tokens);
    for token in tokens {
        let start = rows.start(token);
        if token.kind != TokenKind::Header {
            continue;
        }
        let Some((_, heading)) = token.text.split_once(' ') else {
            continue;
        };
        let heading = heading.trim().to_lowercase();
        if heading.is_empty() {
            continue;
        }
        let slug = heading.replace('.', "").replace(' ', "-");
        if target == Some(slug.as_str()) || title.as_deref() == Some(heading.as_str()) {
            return Some(start);
        }
    }
    None
}
