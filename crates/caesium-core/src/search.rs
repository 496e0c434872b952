//! Incremental search over laid-out tokens.
//!
//! Queries are regular expressions matched case-insensitively against each
//! render row, so hits line up with what is on screen. A query that does not
//! compile is not an error: the search is flagged and simply has no hits.

use std::ops::Range;

use regex::RegexBuilder;

use crate::span::RangeLines;
use crate::token::Token;

/// Marker shown in the status line for a query that does not compile.
pub const ERROR_MARKER: &str = "err ";

/// One match on one render row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Index of the token whose render holds the match.
    pub token: usize,
    /// Row inside that token's render.
    pub offset: usize,
    /// Matched columns on the row.
    pub columns: Range<usize>,
}

impl SearchHit {
    /// Display row of this hit.
    pub fn display_line(&self, map: &[RangeLines]) -> Option<usize> {
        map.get(self.token).map(|range| range.start + self.offset)
    }
}

/// Search state: the query, its hits and the selected hit.
#[derive(Debug, Clone, Default)]
pub struct QuickSearch {
    query: String,
    hits: Vec<SearchHit>,
    current: Option<usize>,
    invalid: bool,
}

impl QuickSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `query` over `tokens` and select the first hit at or after token
    /// `from_token`.
    pub fn search(&mut self, tokens: &[Token], query: &str, from_token: usize) {
        self.query = query.to_string();
        self.hits.clear();
        self.current = None;
        self.invalid = false;
        if query.is_empty() {
            return;
        }

        let pattern = match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!(query, %err, "search pattern rejected");
                self.invalid = true;
                return;
            }
        };

        for (token_idx, token) in tokens.iter().enumerate() {
            for (offset, row) in token.rendered().iter().enumerate() {
                for m in pattern.find_iter(row).filter(|m| !m.is_empty()) {
                    let start = row[..m.start()].chars().count();
                    let len = m.as_str().chars().count();
                    self.hits.push(SearchHit {
                        token: token_idx,
                        offset,
                        columns: start..start + len,
                    });
                }
            }
        }
        self.current = self.hits.iter().position(|hit| hit.token >= from_token);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    /// Whether the last query failed to compile.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Index of the selected hit.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&SearchHit> {
        self.current.and_then(|idx| self.hits.get(idx))
    }

    pub fn home(&mut self) {
        if !self.hits.is_empty() {
            self.current = Some(0);
        }
    }

    pub fn end(&mut self) {
        self.current = self.hits.len().checked_sub(1);
    }

    /// Select the next hit, wrapping to the first.
    pub fn next(&mut self) {
        if self.hits.is_empty() {
            return;
        }
        self.current = Some(match self.current {
            Some(idx) if idx + 1 < self.hits.len() => idx + 1,
            _ => 0,
        });
    }

    /// Select the previous hit, wrapping to the last.
    pub fn prev(&mut self) {
        if self.hits.is_empty() {
            return;
        }
        self.current = match self.current {
            Some(idx) if idx > 0 => Some(idx - 1),
            _ => self.hits.len().checked_sub(1),
        };
    }

    /// Move forward to the first hit in token `token` or later, stopping at
    /// the last hit.
    pub fn next_after(&mut self, token: usize) {
        let Some(mut idx) = self.current.or_else(|| (!self.hits.is_empty()).then_some(0)) else {
            return;
        };
        while self.hits[idx].token < token && idx + 1 < self.hits.len() {
            idx += 1;
        }
        self.current = Some(idx);
    }

    /// Move back to the last hit in token `token` or earlier, stopping at the
    /// first hit.
    pub fn prev_before(&mut self, token: usize) {
        let Some(mut idx) = self.current.or_else(|| self.hits.len().checked_sub(1)) else {
            return;
        };
        while self.hits[idx].token > token && idx > 0 {
            idx -= 1;
        }
        self.current = Some(idx);
    }

    /// `<query>  (<err ><n> / <total>)`, empty while there is no query.
    pub fn status(&self) -> String {
        if self.query.is_empty() {
            return String::new();
        }
        let marker = if self.invalid { ERROR_MARKER } else { "" };
        let selected = self.current.map_or(0, |idx| idx + 1);
        format!("{}  ({marker}{selected} / {})", self.query, self.hits.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::text("Foo bar", 0).with_render(["Foo bar"]),
            Token::text("x", 1).with_render(["fOO", "привет foo"]),
            Token::text("z", 2).with_render(["nothing"]),
            Token::text("y", 3).with_render(["foofoo"]),
        ]
    }

    #[test]
    fn finds_case_insensitive_hits_per_row() {
        let mut search = QuickSearch::new();
        search.search(&tokens(), "foo", 0);
        let hits: Vec<(usize, usize, Range<usize>)> = search
            .hits()
            .iter()
            .map(|h| (h.token, h.offset, h.columns.clone()))
            .collect();
        assert_eq!(
            hits,
            vec![
                (0, 0, 0..3),
                (1, 0, 0..3),
                (1, 1, 7..10),
                (3, 0, 0..3),
                (3, 0, 3..6),
            ]
        );
        assert_eq!(search.status(), "foo  (1 / 5)");
    }

    #[test]
    fn starts_from_token() {
        let mut search = QuickSearch::new();
        search.search(&tokens(), "foo", 2);
        assert_eq!(search.current_index(), Some(3));
        search.next();
        search.next();
        assert_eq!(search.current_index(), Some(0));
        search.prev();
        assert_eq!(search.current_index(), Some(4));
    }

    #[test]
    fn invalid_pattern_is_flagged() {
        let mut search = QuickSearch::new();
        search.search(&tokens(), "(", 0);
        assert!(search.is_invalid());
        assert!(search.hits().is_empty());
        assert_eq!(search.status(), "(  (err 0 / 0)");
    }

    #[test]
    fn page_jumps() {
        let mut search = QuickSearch::new();
        search.search(&tokens(), "foo", 0);
        search.next_after(2);
        assert_eq!(search.current().map(|h| h.token), Some(3));
        search.prev_before(1);
        assert_eq!(search.current_index(), Some(2));
        search.next_after(99);
        assert_eq!(search.current_index(), Some(4));
    }

    #[test]
    fn display_line_uses_map() {
        let hit = SearchHit {
            token: 1,
            offset: 1,
            columns: 0..1,
        };
        let map = [RangeLines::new(0, 0), RangeLines::new(1, 2)];
        assert_eq!(hit.display_line(&map), Some(2));
        assert_eq!(SearchHit { token: 5, ..hit }.display_line(&map), None);
    }
}
