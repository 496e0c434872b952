//! Inline scanner for message lines.
//!
//! Splits the text of one line into a flat run of tokens: plain runs that
//! inherit the block's *carrier* kind, links, inline code, and zero-width
//! bold/italic markers around recursively scanned spans.
//!
//! Greedy, left-to-right: at each position the nearest construct wins, ties
//! go to the first candidate in the order code, italic, bold, gemini link,
//! markdown link, autolink.

use memchr::memchr;
use regex::Captures;

use crate::parser::TokenizeOptions;
use crate::patterns::{URL, URL_GEMINI, URL_MARKDOWN};
use crate::token::{Token, TokenKind};

/// Scan one line of text, producing tokens of the given carrier kind.
///
/// Always returns at least one token: an empty `text` yields a single empty
/// carrier token so every source line is represented.
pub fn scan_inline(
    text: &str,
    line: usize,
    carrier: TokenKind,
    options: &TokenizeOptions,
) -> Vec<Token> {
    scan_with_prefix(text, Token::new(carrier, "", line), options)
}

/// Scan `text` continuing the given carrier token.
///
/// The carrier may already hold a prefix (a header mark, a quote prefix);
/// the first plain run is appended to it.
pub(crate) fn scan_with_prefix(text: &str, carrier: Token, options: &TokenizeOptions) -> Vec<Token> {
    let mut scanner = InlineScanner {
        text,
        line: carrier.line,
        styled: options.inline_styles,
        depth: 0,
        max_depth: options.max_inline_depth,
    };
    scanner.scan(carrier)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Construct {
    Code,
    Italic,
    Bold,
    Gemini,
    Markdown,
    Autolink,
}

#[derive(Debug, Clone, Copy)]
struct Found {
    construct: Construct,
    start: usize,
    end: usize,
}

struct InlineScanner<'a> {
    text: &'a str,
    line: usize,
    styled: bool,
    depth: usize,
    max_depth: usize,
}

impl<'a> InlineScanner<'a> {
    fn nested(&self, text: &'a str) -> InlineScanner<'a> {
        let depth = self.depth + 1;
        if self.styled && depth > self.max_depth {
            tracing::trace!(line = self.line, depth, "inline nesting capped");
        }
        InlineScanner {
            text,
            line: self.line,
            styled: self.styled && depth <= self.max_depth,
            depth,
            max_depth: self.max_depth,
        }
    }

    fn scan(&mut self, mut carrier: Token) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(4);
        let mut pos = 0;

        while pos < self.text.len() {
            let found = self.find_next(pos);

            match found {
                Some(found) if found.start == pos => {
                    if !carrier.text.is_empty() {
                        let kind = carrier.kind;
                        tokens.push(std::mem::replace(&mut carrier, Token::new(kind, "", self.line)));
                    }
                    pos = self.emit(found, carrier.kind, &mut tokens);
                }
                _ => {
                    let run_end = found.map_or(self.text.len(), |f| f.start);
                    carrier.text.push_str(&self.text[pos..run_end]);
                    let kind = carrier.kind;
                    tokens.push(std::mem::replace(&mut carrier, Token::new(kind, "", self.line)));
                    pos = run_end;
                }
            }
        }

        if self.text.is_empty() {
            tokens.push(carrier);
        }
        tokens
    }

    /// Emit tokens for a construct starting at the scan position and return
    /// the position after it.
    fn emit(&self, found: Found, carrier: TokenKind, tokens: &mut Vec<Token>) -> usize {
        let matched = &self.text[found.start..found.end];
        match found.construct {
            Construct::Autolink => {
                // an unmatched closing paren belongs to the sentence
                if matched.ends_with(')') && matched.matches(')').count() > matched.matches('(').count() {
                    let url = &matched[..matched.len() - 1];
                    tokens.push(Token::url(url, self.line));
                    return found.end - 1;
                }
                tokens.push(Token::url(matched, self.line));
            }
            Construct::Gemini => {
                tokens.push(Token::text("=> ", self.line));
                if let Some(caps) = URL_GEMINI.captures(matched) {
                    tokens.push(self.titled(matched, &caps));
                }
            }
            Construct::Markdown => {
                if let Some(caps) = URL_MARKDOWN.captures(matched) {
                    tokens.push(self.titled(matched, &caps));
                }
            }
            Construct::Code => {
                let inner = &matched[1..matched.len() - 1];
                tokens.extend(self.nested(inner).scan(Token::code("", self.line)));
            }
            Construct::Italic => {
                let inner = &matched[1..matched.len() - 1];
                tokens.push(Token::new(TokenKind::ItalicBegin, "", self.line));
                tokens.extend(self.nested(inner).scan(Token::new(carrier, "", self.line)));
                tokens.push(Token::new(TokenKind::ItalicEnd, "", self.line));
            }
            Construct::Bold => {
                let inner = &matched[2..matched.len() - 2];
                tokens.push(Token::new(TokenKind::BoldBegin, "", self.line));
                tokens.extend(self.nested(inner).scan(Token::new(carrier, "", self.line)));
                tokens.push(Token::new(TokenKind::BoldEnd, "", self.line));
            }
        }
        found.end
    }

    fn titled(&self, matched: &str, caps: &Captures<'_>) -> Token {
        let url = caps.name("url").map_or("", |m| m.as_str()).trim();
        let title = caps.name("title").map(|m| m.as_str().trim().to_string());
        Token::titled_url(matched, self.line, url, title)
    }

    /// Find the nearest construct at or after `pos`.
    fn find_next(&self, pos: usize) -> Option<Found> {
        let autolink = URL
            .find_at(self.text, pos)
            .map(|m| (Construct::Autolink, m.start(), m.end()));
        if !self.styled {
            return autolink.map(|(construct, start, end)| Found { construct, start, end });
        }

        let candidates = [
            find_code_span(self.text, pos).map(|(s, e)| (Construct::Code, s, e)),
            earliest(
                find_delimited(self.text, pos, b'_', 1),
                find_delimited(self.text, pos, b'*', 1),
            )
            .map(|(s, e)| (Construct::Italic, s, e)),
            earliest(
                find_delimited(self.text, pos, b'_', 2),
                find_delimited(self.text, pos, b'*', 2),
            )
            .map(|(s, e)| (Construct::Bold, s, e)),
            URL_GEMINI
                .find_at(self.text, pos)
                .map(|m| (Construct::Gemini, m.start(), m.end())),
            URL_MARKDOWN
                .find_at(self.text, pos)
                .map(|m| (Construct::Markdown, m.start(), m.end())),
            autolink,
        ];

        let mut best: Option<Found> = None;
        for (construct, start, end) in candidates.into_iter().flatten() {
            if best.map_or(true, |b| start < b.start) {
                best = Some(Found { construct, start, end });
            }
        }
        best
    }
}

fn earliest(a: Option<(usize, usize)>, b: Option<(usize, usize)>) -> Option<(usize, usize)> {
    match (a, b) {
        (Some(a), Some(b)) if b.0 < a.0 => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}

/// Characters allowed right after a closing delimiter.
#[inline]
fn is_closing_follower(c: char) -> bool {
    c.is_whitespace() || ".,:;'{}@!~_*\\/-+=&%#()?".contains(c)
}

#[inline]
fn closes_at(text: &str, idx: usize) -> bool {
    text[idx..].chars().next().map_or(true, is_closing_follower)
}

#[inline]
fn opens_at(text: &str, idx: usize) -> bool {
    text[..idx].chars().next_back().map_or(true, char::is_whitespace)
}

/// `` `code` `` with no backticks inside.
fn find_code_span(text: &str, from: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut start = from;
    while let Some(offset) = memchr(b'`', &bytes[start..]) {
        let open = start + offset;
        let close = open + 1 + memchr(b'`', &bytes[open + 1..])?;
        if close > open + 1 && closes_at(text, close + 1) {
            return Some((open, close + 1));
        }
        start = close;
    }
    None
}

/// `_x_`, `*x*` (width 1) or `__x__`, `**x**` (width 2).
///
/// The opening delimiter must start the text or follow whitespace. The inner
/// text has at least three characters, contains no delimiter character, and
/// neither starts nor ends with whitespace.
fn find_delimited(text: &str, from: usize, delim: u8, width: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search = from;
    while let Some(offset) = memchr(delim, &bytes[search..]) {
        let open = search + offset;
        search = open + 1;

        if bytes.len() < open + width || !bytes[open..open + width].iter().all(|&b| b == delim) {
            continue;
        }
        if !opens_at(text, open) {
            continue;
        }

        let inner_start = open + width;
        let Some(close_offset) = memchr(delim, &bytes[inner_start..]) else {
            return None;
        };
        let close = inner_start + close_offset;
        let end = close + width;
        if end > bytes.len() || !bytes[close..end].iter().all(|&b| b == delim) {
            continue;
        }

        let inner = &text[inner_start..close];
        let mut chars = inner.chars();
        let first_ok = chars.next().is_some_and(|c| !c.is_whitespace());
        let last_ok = chars.next_back().is_some_and(|c| !c.is_whitespace());
        let long_enough = chars.next().is_some();
        if first_ok && last_ok && long_enough && closes_at(text, end) {
            return Some((open, end));
        }
    }
    None
}
