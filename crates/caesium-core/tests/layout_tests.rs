//! Integration tests for soft-wrap layout

use caesium_core::{layout, split_lines, tokenize, Token, TokenizeOptions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const SOFT_WRAP: &str = "==     long-long-long-long-header
New line with many words.

Long http://url-with-many-words/and?query.
----
";

const SOFT_WRAP_TRAILING: &str = "http://url and text in one line.
http://url long-word in other line
";

fn tokens_of(input: &str) -> Vec<Token> {
    tokenize(&split_lines(input), 0, &TokenizeOptions::default())
}

fn renders(tokens: &[Token]) -> Vec<Vec<String>> {
    tokens.iter().map(|t| t.rendered().to_vec()).collect()
}

/// The screen as a renderer would paint it, one string per row.
fn screen(tokens: &[Token]) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    let mut line = None;
    for token in tokens {
        let render = token.rendered();
        let mut iter = render.iter();
        if line != Some(token.line) || rows.is_empty() {
            rows.push(String::new());
            line = Some(token.line);
        }
        if let (Some(first), Some(row)) = (iter.next(), rows.last_mut()) {
            row.push_str(first);
        }
        rows.extend(iter.cloned());
    }
    rows
}

// ============================================================================
// Word Wrapping Tests
// ============================================================================

#[test]
fn test_soft_wrap() {
    let mut tokens = tokens_of(SOFT_WRAP);
    assert_eq!(layout(&mut tokens, 10, None), Ok(14));
    assert_eq!(
        renders(&tokens),
        vec![
            vec!["==     lon", "g-long-lon", "g-long-hea", "der"],
            vec!["New line", "with many", "words."],
            vec![""],
            vec!["Long "],
            vec!["http:", "//url-with", "-many-word", "s/and?quer", "y"],
            vec!["."],
            vec!["──────────"],
        ]
    );
}

#[test]
fn test_soft_wrap_trailing() {
    let mut tokens = tokens_of(SOFT_WRAP_TRAILING);
    assert_eq!(layout(&mut tokens, 14, None), Ok(6));
    assert_eq!(
        renders(&tokens),
        vec![
            vec!["http://url"],
            vec![" and", "text in one", "line."],
            vec!["http://url"],
            vec!["", "long-word in", "other line"],
        ]
    );
}

#[test]
fn test_relayout_is_idempotent() {
    let mut tokens = tokens_of(SOFT_WRAP);
    layout(&mut tokens, 7, None).unwrap();
    assert_eq!(layout(&mut tokens, 10, None), Ok(14));
    let first = renders(&tokens);
    assert_eq!(layout(&mut tokens, 10, None), Ok(14));
    assert_eq!(renders(&tokens), first);
}

#[test]
fn test_rule_spans_width() {
    let lines = ["== Header", "Text http://url.com more", "> quoted line", "----"];
    let mut tokens = tokenize(&lines, 0, &TokenizeOptions::default());
    assert_eq!(layout(&mut tokens, 40, None), Ok(4));
    assert_eq!(tokens[5].rendered(), ["─".repeat(40)]);
}

// ============================================================================
// Scrollbar Reservation Tests
// ============================================================================

#[test]
fn test_scrollable_size() {
    let mut tokens = tokens_of("");
    assert_eq!(layout(&mut tokens, 10, None), Ok(1));

    let mut tokens = tokenize(&[""], 0, &TokenizeOptions::default());
    assert_eq!(layout(&mut tokens, 10, None), Ok(1));

    let mut tokens = tokenize(&["", ""], 0, &TokenizeOptions::default());
    assert_eq!(layout(&mut tokens, 10, None), Ok(2));

    let mut tokens = tokens_of(SOFT_WRAP);
    assert_eq!(layout(&mut tokens, 10, None), Ok(14));

    let mut tokens = tokens_of(SOFT_WRAP_TRAILING);
    assert_eq!(layout(&mut tokens, 14, None), Ok(6));
}

#[test]
fn test_scrollable_last_token() {
    let mut tokens = tokenize(&["1234 5678 9012 3456"], 0, &TokenizeOptions::default());
    layout(&mut tokens, 4, Some(2)).unwrap();
    let widest = screen(&tokens).iter().map(|r| r.chars().count()).max();
    assert_eq!(widest, Some(3));
}

#[test]
fn test_render_tabs() {
    let lines = ["====", "\tpublic {", "\t\tprint;", "\t}", "===="];
    let mut tokens = tokenize(&lines, 0, &TokenizeOptions::default());
    assert_eq!(layout(&mut tokens, 10, Some(1)), Ok(7));
    assert_eq!(
        renders(&tokens),
        vec![
            vec!["===="],
            vec!["    publi", "c {"],
            vec!["        p", "rint;"],
            vec!["    }"],
            vec!["===="],
        ]
    );
}

#[test]
fn test_fitting_content_keeps_width() {
    let mut tokens = tokens_of("short\nlines");
    assert_eq!(layout(&mut tokens, 10, Some(2)), Ok(2));
    assert_eq!(renders(&tokens), vec![vec!["short"], vec!["lines"]]);
}

// ============================================================================
// Quote and Link Rendering Tests
// ============================================================================

#[test]
fn test_quote_url() {
    let mut tokens = tokenize(&[">http://in-quote"], 0, &TokenizeOptions::default());
    assert_eq!(layout(&mut tokens, 20, None), Ok(1));
    assert_eq!(tokens[0].rendered(), [" >"]);
    assert_eq!(tokens[1].rendered(), ["http://in-quote"]);
}

#[test]
fn test_quote_space_added_once_per_line() {
    let mut tokens = tokenize(&[">a http://x.y>b"], 0, &TokenizeOptions::default());
    layout(&mut tokens, 40, None).unwrap();
    assert_eq!(tokens[0].rendered(), [" >a "]);
    assert_eq!(tokens[2].rendered(), [">b"]);
}

#[test]
fn test_titled_link_shows_title() {
    let mut tokens = tokenize(&["[Home page](http://h.org)"], 0, &TokenizeOptions::styled());
    layout(&mut tokens, 40, None).unwrap();
    assert_eq!(tokens[0].rendered(), ["Home page"]);
}

#[test]
fn test_render_token_grid() {
    let lines = [
        "aaaaaa> aaa-aa aaaaa aaa aaaaaaaaaa https://aaaa.aaaaaaaa.aa/. ",
        "aaaaaa> aaaaa aaaaaaaa aaaa https://aaaaaa.com/aaaaaaaaaa/aaaaaaaaaaaa-aaa",
        "",
    ];
    let mut tokens = tokenize(&lines, 0, &TokenizeOptions::default());
    let rows = layout(&mut tokens, 62, Some(30)).unwrap();
    let painted = screen(&tokens);
    assert_eq!(painted.len(), rows);
    assert!(painted.iter().all(|r| r.chars().count() <= 62));
}

#[test]
fn test_code_chunks_exactly() {
    let mut tokens = vec![Token::code("abcdefghijk", 0)];
    assert_eq!(layout(&mut tokens, 4, None), Ok(3));
    assert_eq!(tokens[0].rendered(), ["abcd", "efgh", "ijk"]);
}

// ============================================================================
// Layout Properties
// ============================================================================

fn body() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z>=#+`*_ ./:()\t-]{0,32}", 1..12)
}

proptest! {
    #[test]
    fn prop_rows_fit_width(
        lines in body(),
        width in 1usize..50,
        height in proptest::option::of(1usize..20),
        styled in any::<bool>(),
    ) {
        let options = TokenizeOptions::default().with_inline_styles(styled);
        let mut tokens = tokenize(&lines, 0, &options);
        layout(&mut tokens, width, height).unwrap();
        for token in &tokens {
            prop_assert!(!token.rendered().is_empty());
            for row in token.rendered() {
                prop_assert!(row.chars().count() <= width, "{row:?} wider than {width}");
            }
        }
    }

    #[test]
    fn prop_screen_matches_row_count(lines in body(), width in 1usize..50) {
        let mut tokens = tokenize(&lines, 0, &TokenizeOptions::default());
        let rows = layout(&mut tokens, width, None).unwrap();
        prop_assert_eq!(screen(&tokens).len(), rows);
    }

    #[test]
    fn prop_reservation_matches_narrower_layout(
        lines in body(),
        width in 2usize..50,
        height in 1usize..20,
    ) {
        let mut free = tokenize(&lines, 0, &TokenizeOptions::default());
        let natural = layout(&mut free, width, None).unwrap();

        let mut bounded = free.clone();
        let rows = layout(&mut bounded, width, Some(height)).unwrap();

        if natural > height {
            let mut narrow = free.clone();
            let expected = layout(&mut narrow, width - 1, None).unwrap();
            prop_assert_eq!(rows, expected);
            prop_assert_eq!(renders(&bounded), renders(&narrow));
        } else {
            prop_assert_eq!(rows, natural);
            prop_assert_eq!(renders(&bounded), renders(&free));
        }
    }
}
