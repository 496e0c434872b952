//! Soft-wrap layout.
//!
//! Fills each token's `render` with the exact rows it occupies at a given
//! terminal width. Tokens sharing a source line flow after one another on
//! the same row; a new source line always starts a new row. Plain runs wrap
//! at spaces, code wraps at the column boundary.
//!
//! Columns are counted in Unicode scalar values.
//!
//! When a height bound is given and the content turns out taller, the whole
//! pass is redone once at `width - 1` with no bound, leaving the last column
//! free for a scrollbar.

use crate::error::LayoutError;
use crate::token::{Token, TokenKind};

const TAB: &str = "    ";
const RULE: &str = "─";

/// Lay out `tokens` for a `width` x `height` viewport.
///
/// Returns the total number of display rows. Safe to call again with other
/// geometry: every token's render is recomputed from scratch.
///
/// # Errors
///
/// [`LayoutError::ZeroWidth`] for `width == 0` and
/// [`LayoutError::ZeroHeight`] for `height == Some(0)`.
///
/// # Example
///
/// ```rust
/// use caesium_core::{layout, tokenize, TokenizeOptions};
///
/// let mut tokens = tokenize(&["one two three"], 0, &TokenizeOptions::default());
/// let rows = layout(&mut tokens, 8, None).unwrap();
///
/// assert_eq!(rows, 2);
/// assert_eq!(tokens[0].rendered(), ["one two", "three"]);
/// ```
pub fn layout(tokens: &mut [Token], width: usize, height: Option<usize>) -> Result<usize, LayoutError> {
    if width == 0 {
        return Err(LayoutError::ZeroWidth);
    }
    if height == Some(0) {
        return Err(LayoutError::ZeroHeight);
    }
    Ok(layout_pass(tokens, width, height))
}

fn layout_pass(tokens: &mut [Token], width: usize, height: Option<usize>) -> usize {
    let Some(first) = tokens.first() else {
        return 1;
    };

    // a one-column viewport has nothing to spare for a scrollbar
    let overflows = |y: usize| width > 1 && height.is_some_and(|h| y + 1 > h);

    let mut line = first.line;
    let mut cursor = Cursor::default();
    let mut y = 0;

    for idx in 0..tokens.len() {
        if tokens[idx].line > line {
            line = tokens[idx].line;
            y += 1;
            cursor.new_row();
        }

        if tokens[idx].kind == TokenKind::LineBreak {
            y += 1;
            cursor.x = 0;
            tokens[idx].render = Some(vec![String::new(), String::new()]);
            continue;
        }

        if overflows(y) {
            tracing::trace!(width, rows = y + 1, "content overflows, reserving scrollbar column");
            return layout_pass(tokens, width - 1, None);
        }

        let render = cursor.render(&tokens[idx], width);
        y += render.len() - 1;
        tokens[idx].render = Some(render);
    }

    if overflows(y) {
        tracing::trace!(width, rows = y + 1, "content overflows, reserving scrollbar column");
        return layout_pass(tokens, width - 1, None);
    }
    y + 1
}

/// Position on the current row.
#[derive(Debug, Default)]
struct Cursor {
    x: usize,
    /// A quote token on this row already got its leading space.
    quote_spaced: bool,
}

impl Cursor {
    fn new_row(&mut self) {
        self.x = 0;
        self.quote_spaced = false;
    }

    /// Rows for one token; never empty.
    fn render(&mut self, token: &Token, width: usize) -> Vec<String> {
        let value = self.display_value(token, width);
        let len = char_len(&value);

        let mut render = Vec::with_capacity(1);
        if self.x + len <= width {
            self.x += len;
            render.push(value);
        } else if token.kind == TokenKind::Code {
            self.x = push_chunks(&mut render, "", self.x, width, &value);
        } else {
            self.wrap_words(&mut render, &value, width);
        }

        if render.is_empty() {
            render.push(String::new());
        }
        render
    }

    fn display_value(&mut self, token: &Token, width: usize) -> String {
        match token.kind {
            TokenKind::Url if token.title.is_some() || token.url.is_some() => token.display_text().to_string(),
            TokenKind::HorizontalRule => RULE.repeat(width),
            kind => {
                let mut value = token.text.replace('\t', TAB).trim_end_matches('\r').to_string();
                if kind.is_quote() {
                    if !self.quote_spaced && !value.is_empty() && !value.starts_with(' ') {
                        value.insert(0, ' ');
                    }
                    self.quote_spaced = true;
                }
                value
            }
        }
    }

    /// Greedy word packing for text wider than the space left on the row.
    fn wrap_words(&mut self, render: &mut Vec<String>, value: &str, width: usize) {
        let mut line = String::new();
        let mut space = "";
        let mut empty_new_line = false;

        for word in value.split(' ') {
            empty_new_line = false;
            let word = format!("{space}{word}");
            space = " ";

            let len = char_len(&word);
            if self.x + len <= width {
                line.push_str(&word);
                self.x += len;
                continue;
            }

            // room left on this row: spill the long word across rows
            if self.x + 1 < width && width < len {
                self.x = push_chunks(render, &line, self.x, width, &word);
                line = render.pop().unwrap_or_default();
                continue;
            }

            if self.x > 0 {
                render.push(std::mem::take(&mut line));
            }
            let word = word.strip_prefix(' ').unwrap_or(&word);
            let len = char_len(word);
            if len <= width {
                line = word.to_string();
                self.x = len;
                empty_new_line = len == 0;
                continue;
            }

            self.x = push_chunks(render, "", 0, width, word);
            line = render.pop().unwrap_or_default();
        }

        if !line.is_empty() || empty_new_line {
            render.push(line);
        }
    }
}

/// Hard-split `word`: the first piece fills the row after `prefix` from
/// column `x`, the rest take full rows. Returns the column after the last
/// piece.
fn push_chunks(render: &mut Vec<String>, prefix: &str, x: usize, width: usize, word: &str) -> usize {
    let mut prefix = prefix.to_string();
    let mut x = x;
    let (mut chunk, mut rest) = split_at_char(word, width.saturating_sub(x));

    // the row is already full
    if chunk.is_empty() && !rest.is_empty() {
        render.push(std::mem::take(&mut prefix));
        (chunk, rest) = split_at_char(rest, width);
    }

    while !chunk.is_empty() {
        prefix.push_str(chunk);
        x = char_len(&prefix);
        render.push(std::mem::take(&mut prefix));
        (chunk, rest) = split_at_char(rest, width);
    }
    x
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split after `n` chars, or keep everything on the left when shorter.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(tokens: &[Token]) -> Vec<Vec<String>> {
        tokens.iter().map(|t| t.rendered().to_vec()).collect()
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let mut tokens = vec![Token::text("x", 0)];
        assert_eq!(layout(&mut tokens, 0, None), Err(LayoutError::ZeroWidth));
        assert_eq!(layout(&mut tokens, 4, Some(0)), Err(LayoutError::ZeroHeight));
    }

    #[test]
    fn empty_document_is_one_row() {
        assert_eq!(layout(&mut [], 10, Some(1)), Ok(1));
    }

    #[test]
    fn split_counts_chars() {
        assert_eq!(split_at_char("привет", 2), ("пр", "ивет"));
        assert_eq!(split_at_char("ab", 5), ("ab", ""));
    }

    #[test]
    fn code_on_full_row_starts_below() {
        let mut tokens = vec![Token::text("abcd", 0), Token::code("efgh", 0)];
        assert_eq!(layout(&mut tokens, 4, None), Ok(2));
        assert_eq!(rows(&tokens)[1], vec!["", "efgh"]);
    }

    #[test]
    fn chunks_keep_unicode_intact() {
        let mut tokens = vec![Token::code("жжжжжж", 0)];
        assert_eq!(layout(&mut tokens, 4, None), Ok(2));
        assert_eq!(rows(&tokens)[0], vec!["жжжж", "жж"]);
    }

    #[test]
    fn line_break_adds_a_row() {
        let mut tokens = vec![
            Token::code("a", 0),
            Token::line_break(0),
            Token::code("b", 0),
        ];
        assert_eq!(layout(&mut tokens, 10, None), Ok(2));
        assert_eq!(rows(&tokens)[1], vec!["", ""]);
    }

    #[test]
    fn one_column_never_reserves() {
        let mut tokens = vec![Token::text("abc", 0)];
        assert_eq!(layout(&mut tokens, 1, Some(1)), Ok(3));
        assert_eq!(rows(&tokens)[0], vec!["a", "b", "c"]);
    }
}
