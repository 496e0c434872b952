//! Line splitting for raw message text.
//!
//! Stored messages and drafts arrive as one string. The tokenizer works on
//! a list of lines, so this module cuts the text at newlines using `memchr`
//! for the scan.
//!
//! A stored message carries a fixed header before its body: the tag line,
//! six header fields (echo, time, author, address, recipient, subject) and
//! a blank separator. [`message_body`] skips past it.

use memchr::memchr;

/// Number of lines preceding the body in a stored message.
pub const BODY_OFFSET: usize = 8;

/// A single line with its 0-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without the trailing newline or carriage return).
    pub text: &'a str,
    /// 0-based line number in the input.
    pub number: usize,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Line lexer over a message string.
///
/// Provides peek/consume access to lines without allocating.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    number: usize,
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            number: 0,
            peeked: None,
        }
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.peeked.is_none() && self.offset >= self.input.len()
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    /// Skip `count` lines, returning how many were actually skipped.
    pub fn skip_lines(&mut self, count: usize) -> usize {
        let mut skipped = 0;
        while skipped < count && self.next_line().is_some() {
            skipped += 1;
        }
        skipped
    }

    fn read_line(&mut self) -> Option<Line<'a>> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };

        // CRLF: drop the carriage return
        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < bytes.len() { end + 1 } else { end };

        let line = Line {
            // `\n` and `\r` are ASCII, so both ends sit on char boundaries
            text: self.input.get(start..text_end).unwrap_or_default(),
            number: self.number,
        };
        self.number += 1;
        Some(line)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

/// Split text into lines.
///
/// A trailing newline does not produce an extra empty line, and empty input
/// produces no lines at all.
///
/// ```rust
/// use caesium_core::lexer::split_lines;
///
/// assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b"]);
/// assert!(split_lines("").is_empty());
/// ```
pub fn split_lines(input: &str) -> Vec<&str> {
    Lexer::new(input).map(|line| line.text).collect()
}

/// The body part of a stored message, given all its lines.
///
/// Messages shorter than the header yield an empty body.
pub fn message_body<'a, S: AsRef<str>>(lines: &'a [S]) -> Vec<&'a str> {
    lines
        .iter()
        .skip(BODY_OFFSET)
        .map(|line| line.as_ref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_inner_empty_lines() {
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn numbers_lines() {
        let mut lexer = Lexer::new("x\ny");
        assert_eq!(lexer.peek_line().map(|l| l.number), Some(0));
        assert_eq!(lexer.skip_lines(1), 1);
        let line = lexer.next_line();
        assert_eq!(line, Some(Line { text: "y", number: 1 }));
        assert!(lexer.is_eof());
    }

    #[test]
    fn body_skips_header() {
        let message = "ii/ok\necho.local\n1700000000\nanon\nnode,1\nAll\nsubj\n\nhello\nworld";
        let lines = split_lines(message);
        assert_eq!(message_body(&lines), vec!["hello", "world"]);
        assert!(message_body(&lines[..3]).is_empty());
    }
}
