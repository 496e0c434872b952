//! Line classifier and top-level tokenizer.
//!
//! Walks a message body line by line. Each line is matched against the block
//! rules in a fixed order (header, postscript, quote, origin, rule, fenced
//! code, embedded files, PGP blocks) and the first rule that applies decides
//! the carrier kind for the inline scanner. Multi-line blocks only open when
//! their closing line exists further down; otherwise the opening line is read
//! as ordinary text.

use crate::attach::{tokenize_base64, tokenize_xpm, BASE64_MARKER, XPM_MARKER};
use crate::inline::{scan_inline, scan_with_prefix};
use crate::patterns::{HEADER, ORIGIN, POSTSCRIPT, QUOTE};
use crate::pgp::{
    KeyInspector, BEGIN_KEY, BEGIN_KEY_ESCAPED, BEGIN_SIGNED_MESSAGE, END_KEY, END_KEY_ESCAPED,
    END_SIGNATURE,
};
use crate::token::{Token, TokenKind};

/// Default cap on nested inline spans.
pub const DEFAULT_MAX_INLINE_DEPTH: usize = 8;

/// Options that change what the tokenizer recognises.
///
/// Toggling `inline_styles` changes the token list itself, so callers must
/// re-tokenize rather than only re-run layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Recognise bold, italic, inline code, titled links and attachments.
    pub inline_styles: bool,
    /// Deeper inline spans are kept as plain text.
    pub max_inline_depth: usize,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            inline_styles: false,
            max_inline_depth: DEFAULT_MAX_INLINE_DEPTH,
        }
    }
}

impl TokenizeOptions {
    /// Options with inline styles turned on.
    pub fn styled() -> Self {
        Self {
            inline_styles: true,
            ..Self::default()
        }
    }

    pub fn with_inline_styles(mut self, enabled: bool) -> Self {
        self.inline_styles = enabled;
        self
    }

    /// The same options with inline styles off.
    #[inline]
    fn plain(self) -> Self {
        self.with_inline_styles(false)
    }
}

/// Message body tokenizer.
///
/// # Example
///
/// ```rust
/// use caesium_core::{TokenKind, TokenizeOptions, Tokenizer};
///
/// let tokenizer = Tokenizer::new(TokenizeOptions::default());
/// let tokens = tokenizer.tokenize(&["== Title", "see http://example.org"], 0);
///
/// assert_eq!(tokens[0].kind, TokenKind::Header);
/// assert_eq!(tokens[2].kind, TokenKind::Url);
/// ```
#[derive(Clone, Copy, Default)]
pub struct Tokenizer<'k> {
    options: TokenizeOptions,
    inspector: Option<&'k dyn KeyInspector>,
}

impl<'k> Tokenizer<'k> {
    #[inline]
    pub fn new(options: TokenizeOptions) -> Self {
        Self {
            options,
            inspector: None,
        }
    }

    /// Use `inspector` to describe PGP keys and verify signed messages.
    pub fn with_inspector(mut self, inspector: &'k dyn KeyInspector) -> Self {
        self.inspector = Some(inspector);
        self
    }

    #[inline]
    pub fn options(&self) -> &TokenizeOptions {
        &self.options
    }

    #[inline]
    pub(crate) fn inspector(&self) -> Option<&'k dyn KeyInspector> {
        self.inspector
    }

    /// Tokenize `lines`, numbering them from `start_line`.
    ///
    /// Every line produces at least one token unless it is absorbed into a
    /// multi-line block, and tokens come out in non-decreasing line order.
    pub fn tokenize<S: AsRef<str>>(&self, lines: &[S], start_line: usize) -> Vec<Token> {
        let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        self.tokenize_lines(&lines, start_line, false)
    }

    pub(crate) fn tokenize_lines(&self, lines: &[&str], start_line: usize, in_code_block: bool) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(lines.len() * 2);
        let mut idx = 0;

        while idx < lines.len() {
            let rest = &lines[idx..];
            let line_no = start_line + idx;

            let mut consumed = None;
            if !in_code_block {
                consumed = self.markup_block(rest, line_no, &mut tokens);
            }
            if consumed.is_none() {
                consumed = self.pgp_block(rest, line_no, &mut tokens);
            }

            idx += match consumed {
                Some(count) => count,
                None if in_code_block => {
                    tokens.extend(scan_inline(rest[0], line_no, TokenKind::Code, &self.options.plain()));
                    1
                }
                None => {
                    tokens.extend(scan_inline(rest[0], line_no, TokenKind::Text, &self.options));
                    1
                }
            };
        }
        tokens
    }

    /// Block rules that do not apply inside code blocks.
    ///
    /// Returns the number of lines consumed when a rule matched.
    fn markup_block(&self, rest: &[&str], line_no: usize, tokens: &mut Vec<Token>) -> Option<usize> {
        let line = rest[0];

        let prefixed = [
            (HEADER.find(line), TokenKind::Header),
            (POSTSCRIPT.find(line), TokenKind::Comment),
            (QUOTE.find(line), TokenKind::Quote1),
            (ORIGIN.find(line), TokenKind::Origin),
        ];
        if let Some((m, kind)) = prefixed.into_iter().find_map(|(m, kind)| m.map(|m| (m, kind))) {
            let prefix = m.as_str();
            let kind = match kind {
                TokenKind::Quote1 => quote_kind(prefix),
                other => other,
            };
            let carrier = Token::new(kind, prefix, line_no);
            tokens.extend(scan_with_prefix(&line[m.end()..], carrier, &self.options));
            return Some(1);
        }

        let trimmed = line.trim_end();
        if trimmed == "----" {
            tokens.push(Token::new(TokenKind::HorizontalRule, line, line_no));
            return Some(1);
        }

        if let Some(closes) = fence_closer(line) {
            match rest[1..].iter().position(|l| closes(l)) {
                Some(close) => {
                    tokens.push(Token::code(line, line_no));
                    tokens.extend(self.tokenize_lines(&rest[1..=close + 1], line_no + 1, true));
                    return Some(close + 2);
                }
                None => tracing::debug!(line = line_no, "unterminated code fence"),
            }
        }

        let styled = self.options.inline_styles;
        let embedded = if trimmed == XPM_MARKER {
            tokenize_xpm(rest, line_no, styled)
        } else if trimmed.starts_with(BASE64_MARKER) {
            tokenize_base64(rest, line_no, styled)
        } else {
            None
        };
        embedded.map(|(block, count)| {
            tokens.extend(block);
            count
        })
    }

    /// PGP key and signed-message blocks, recognised even inside code blocks.
    fn pgp_block(&self, rest: &[&str], line_no: usize, tokens: &mut Vec<Token>) -> Option<usize> {
        let trimmed = rest[0].trim_end();
        let has_line = |marker: &str| rest.iter().any(|l| l.trim_end().starts_with(marker));

        let key_end = if trimmed.starts_with(BEGIN_KEY) {
            Some(END_KEY)
        } else if trimmed.starts_with(BEGIN_KEY_ESCAPED) {
            Some(END_KEY_ESCAPED)
        } else {
            None
        };
        if let Some(end) = key_end {
            if !has_line(end) {
                tracing::debug!(line = line_no, "unterminated PGP key block");
                return None;
            }
            let (block, count) = self.tokenize_key_block(rest, line_no, end);
            tokens.extend(block);
            return Some(count);
        }

        if trimmed.starts_with(BEGIN_SIGNED_MESSAGE) {
            if !has_line(END_SIGNATURE) {
                tracing::debug!(line = line_no, "unterminated PGP signed message");
                return None;
            }
            let (block, count) = self.tokenize_signed_message(rest, line_no)?;
            tokens.extend(block);
            return Some(count);
        }
        None
    }
}

/// Tokenize `lines` without a key inspector.
///
/// ```rust
/// use caesium_core::{tokenize, TokenKind, TokenizeOptions};
///
/// let tokens = tokenize(&["a> quoted", "a>> nested"], 0, &TokenizeOptions::default());
/// assert_eq!(tokens[0].kind, TokenKind::Quote1);
/// assert_eq!(tokens[1].kind, TokenKind::Quote2);
/// ```
pub fn tokenize<S: AsRef<str>>(lines: &[S], start_line: usize, options: &TokenizeOptions) -> Vec<Token> {
    Tokenizer::new(*options).tokenize(lines, start_line)
}

/// Odd `>` counts are `Quote1`, even counts `Quote2`.
fn quote_kind(prefix: &str) -> TokenKind {
    if prefix.matches('>').count() % 2 == 1 {
        TokenKind::Quote1
    } else {
        TokenKind::Quote2
    }
}

/// The close-line test for a fence opened by `line`, if it opens one.
fn fence_closer(line: &str) -> Option<fn(&str) -> bool> {
    fn equals_fence(line: &str) -> bool {
        line.trim_end() == "===="
    }
    fn backtick_fence(line: &str) -> bool {
        line.starts_with("```")
    }

    if equals_fence(line) {
        Some(equals_fence)
    } else if backtick_fence(line) {
        Some(backtick_fence)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[&str]) -> Vec<Token> {
        tokenize(lines, 0, &TokenizeOptions::default())
    }

    #[test]
    fn header_prefix_joins_first_run() {
        let tokens = plain(&["== Header text"]);
        assert_eq!(tokens, vec![Token::new(TokenKind::Header, "== Header text", 0)]);
    }

    #[test]
    fn postscript_covers_marker() {
        let tokens = plain(&["  PS: later"]);
        assert_eq!(tokens, vec![Token::new(TokenKind::Comment, "  PS: later", 0)]);
    }

    #[test]
    fn empty_quote_keeps_its_line() {
        let tokens = plain(&["a>", "b"]);
        assert_eq!(
            tokens,
            vec![Token::new(TokenKind::Quote1, "a>", 0), Token::text("b", 1)]
        );
    }

    #[test]
    fn origin_line() {
        let tokens = plain(&["+++ node 1.2"]);
        assert_eq!(tokens[0].kind, TokenKind::Origin);
    }

    #[test]
    fn rule_allows_trailing_space() {
        assert_eq!(plain(&["----  "])[0].kind, TokenKind::HorizontalRule);
        assert_eq!(plain(&["-----"])[0].kind, TokenKind::Text);
    }

    #[test]
    fn fenced_block_is_code() {
        let tokens = plain(&["```", "== not a header", "```", "after"]);
        assert_eq!(
            tokens,
            vec![
                Token::code("```", 0),
                Token::code("== not a header", 1),
                Token::code("```", 2),
                Token::text("after", 3),
            ]
        );
    }

    #[test]
    fn code_block_still_links() {
        let tokens = tokenize(&["====", "get http://x.org", "===="], 0, &TokenizeOptions::styled());
        assert_eq!(
            tokens,
            vec![
                Token::code("====", 0),
                Token::code("get ", 1),
                Token::url("http://x.org", 1),
                Token::code("====", 2),
            ]
        );
    }

    #[test]
    fn unterminated_fence_is_text() {
        let tokens = plain(&["====", "x"]);
        assert_eq!(tokens, vec![Token::text("====", 0), Token::text("x", 1)]);
    }

    #[test]
    fn start_line_offsets_every_token() {
        let tokens = plain(&["a", "", "b"]);
        let lines: Vec<usize> = tokenize(&["a", "", "b"], 10, &TokenizeOptions::default())
            .iter()
            .map(|t| t.line)
            .collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(lines, vec![10, 11, 12]);
    }

    #[test]
    fn key_block_without_styles_is_code() {
        let lines = [BEGIN_KEY, "", "mQENBF", END_KEY, "tail"];
        let tokens = plain(&lines);
        assert_eq!(tokens.len(), 5);
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Code));
        assert_eq!(tokens[4], Token::text("tail", 4));
    }

    #[test]
    fn key_block_with_styles_is_attachment() {
        let lines = [BEGIN_KEY, "mQENBF", END_KEY];
        let tokens = tokenize(&lines, 0, &TokenizeOptions::styled());
        assert_eq!(tokens.len(), 1);
        let attachment = tokens[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "pgp-public-key.asc");
        assert_eq!(attachment.data, lines.join("\n").into_bytes());
    }
}
