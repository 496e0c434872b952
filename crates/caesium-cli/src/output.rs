use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use caesium_core::attach::format_size;
use caesium_core::lexer::Lexer;
use caesium_core::{
    find_pos_by_anchor, find_visible_token, token_line_map, LinkTarget, QuickSearch, ScrollCalc, TextAttrs, Token,
};
use serde::Serialize;

use crate::config::ViewConfig;

/// A tokenized and laid out body.
pub struct LaidOut<'a> {
    pub input: &'a str,
    pub source_lines: usize,
    pub tokens: Vec<Token>,
    pub rows: usize,
    pub view: ViewConfig,
}

const THUMB: char = '█';
const TRACK: char = '░';

// =============================================================================
// Render Command
// =============================================================================

#[derive(Serialize)]
struct JsonScreen<'a> {
    width: usize,
    height: Option<usize>,
    rows: usize,
    scroll: JsonScroll,
    lines: &'a [String],
}

#[derive(Serialize)]
struct JsonScroll {
    pos: usize,
    thumb_pos: usize,
    thumb_size: usize,
    scrollable: bool,
}

pub fn render(doc: &LaidOut<'_>, json: bool) -> Result<String> {
    let view_rows = doc.view.height.unwrap_or(doc.rows);
    let scroll = ScrollCalc::new(doc.rows, view_rows).at(doc.view.skip);
    let count = scroll.pos_bottom() + 1 - scroll.pos();
    let lines = match find_visible_token(&doc.tokens, scroll.pos()) {
        Some(top) => paint(&doc.tokens, top, count),
        None => Vec::new(),
    };

    if json {
        let screen = JsonScreen {
            width: doc.view.width,
            height: doc.view.height,
            rows: doc.rows,
            scroll: JsonScroll {
                pos: scroll.pos(),
                thumb_pos: scroll.thumb_pos(),
                thumb_size: scroll.thumb_size(),
                scrollable: scroll.is_scrollable(),
            },
            lines: &lines,
        };
        return Ok(serde_json::to_string_pretty(&screen)? + "\n");
    }

    let mut out = String::new();
    let text_width = doc.view.width.saturating_sub(1);
    let thumb = scroll.thumb_pos()..scroll.thumb_pos() + scroll.thumb_size();
    let bar_column = scroll.is_scrollable() && doc.view.width > 1;
    for (idx, line) in lines.iter().enumerate() {
        if bar_column {
            let bar = if thumb.contains(&idx) { THUMB } else { TRACK };
            let pad = text_width.saturating_sub(line.chars().count());
            writeln!(out, "{line}{:pad$}{bar}", "")?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(out)
}

/// Rows as a renderer paints them, starting `top.1` rows into token
/// `top.0`.
fn paint(tokens: &[Token], top: (usize, usize), count: usize) -> Vec<String> {
    let (first, offset) = top;
    let mut rows: Vec<String> = Vec::with_capacity(count);
    let mut line = None;
    for (idx, token) in tokens.iter().enumerate().skip(first) {
        let skip = if idx == first { offset } else { 0 };
        let mut render = token.rendered().iter().skip(skip);
        if line != Some(token.line) {
            if rows.len() == count {
                break;
            }
            rows.push(String::new());
            line = Some(token.line);
        }
        if let (Some(head), Some(row)) = (render.next(), rows.last_mut()) {
            row.push_str(head);
        }
        rows.extend(render.cloned());
    }
    rows.truncate(count);
    rows
}

// =============================================================================
// Tokens Command
// =============================================================================

#[derive(Serialize)]
struct JsonToken<'a> {
    kind: &'static str,
    line: usize,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<JsonAttachment<'a>>,
    attrs: Vec<&'static str>,
    rows: (usize, usize),
    render: &'a [String],
}

#[derive(Serialize)]
struct JsonAttachment<'a> {
    filename: &'a str,
    size: usize,
}

pub fn tokens(doc: &LaidOut<'_>, json: bool) -> Result<String> {
    let map = token_line_map(&doc.tokens);
    let mut attrs = TextAttrs::empty();
    let mut line = None;
    let mut entries = Vec::with_capacity(doc.tokens.len());
    for (token, range) in doc.tokens.iter().zip(&map) {
        if line != Some(token.line) {
            attrs = TextAttrs::empty();
            line = Some(token.line);
        }
        attrs = attrs.apply(token);
        entries.push(JsonToken {
            kind: token.kind.as_str(),
            line: token.line,
            text: &token.text,
            url: token.url.as_deref(),
            title: token.title.as_deref(),
            attachment: token.attachment.as_ref().map(|a| JsonAttachment {
                filename: &a.filename,
                size: a.data.len(),
            }),
            attrs: attrs.iter_names().map(|(name, _)| name).collect(),
            rows: (range.start, range.end),
            render: token.rendered(),
        });
    }

    if json {
        return Ok(serde_json::to_string_pretty(&entries)? + "\n");
    }

    let mut out = String::new();
    for entry in &entries {
        write!(out, "{:>4} {:<11} {:?}", entry.line, entry.kind, entry.text)?;
        if let Some(url) = entry.url {
            write!(out, " -> {url}")?;
        }
        if !entry.attrs.is_empty() {
            write!(out, " [{}]", entry.attrs.join(","))?;
        }
        writeln!(out)?;
        writeln!(out, "     rows {}..={}: {:?}", entry.rows.0, entry.rows.1, entry.render)?;
    }
    Ok(out)
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Serialize)]
struct BodyStats {
    source_lines: usize,
    blank_lines: usize,
    chars: usize,
    words: usize,
    tokens: usize,
    display_rows: usize,
    links: usize,
    attachments: usize,
    style_markers: usize,
    kinds: BTreeMap<&'static str, usize>,
}

impl BodyStats {
    fn from_body(doc: &LaidOut<'_>) -> Self {
        let mut kinds = BTreeMap::new();
        for token in &doc.tokens {
            *kinds.entry(token.kind.as_str()).or_insert(0) += 1;
        }
        let links = doc.tokens.iter().filter(|t| LinkTarget::of(t).is_some()).count();
        Self {
            source_lines: doc.source_lines,
            blank_lines: Lexer::new(doc.input).filter(|line| line.is_blank()).count(),
            chars: doc.input.chars().count(),
            words: doc.input.split_whitespace().count(),
            tokens: doc.tokens.len(),
            display_rows: doc.rows,
            links,
            attachments: doc.tokens.iter().filter(|t| t.is_attachment()).count(),
            style_markers: doc.tokens.iter().filter(|t| t.kind.is_style_marker()).count(),
            kinds,
        }
    }
}

pub fn stats(doc: &LaidOut<'_>, json: bool) -> Result<String> {
    let stats = BodyStats::from_body(doc);
    if json {
        return Ok(serde_json::to_string_pretty(&stats)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "Message Statistics")?;
    writeln!(out, "------------------")?;
    writeln!(out, "Width:        {}", doc.view.width)?;
    writeln!(out, "Styles:       {}", doc.view.inline_styles)?;
    writeln!(out)?;
    writeln!(out, "Source:")?;
    writeln!(out, "  Lines:          {}", stats.source_lines)?;
    writeln!(out, "  Blank lines:    {}", stats.blank_lines)?;
    writeln!(out, "  Characters:     {}", stats.chars)?;
    writeln!(out, "  Words (est.):   {}", stats.words)?;
    writeln!(out)?;
    writeln!(out, "Layout:")?;
    writeln!(out, "  Tokens:         {}", stats.tokens)?;
    writeln!(out, "  Display rows:   {}", stats.display_rows)?;
    writeln!(out, "  Links:          {}", stats.links)?;
    writeln!(out, "  Attachments:    {}", stats.attachments)?;
    writeln!(out, "  Style markers:  {}", stats.style_markers)?;
    writeln!(out)?;
    writeln!(out, "Tokens by kind:")?;
    for (kind, count) in &stats.kinds {
        writeln!(out, "  {:<15} {count}", format!("{kind}:"))?;
    }
    Ok(out)
}

// =============================================================================
// Links Command
// =============================================================================

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsonLink<'a> {
    Attachment { filename: &'a str, size: usize },
    Anchor { slug: &'a str, row: Option<usize> },
    Echo { name: &'a str },
    Message { id: &'a str },
    External { url: &'a str },
}

#[derive(Serialize)]
struct JsonLinkEntry<'a> {
    line: usize,
    text: &'a str,
    #[serde(flatten)]
    target: JsonLink<'a>,
}

pub fn links(doc: &LaidOut<'_>, json: bool) -> Result<String> {
    let entries: Vec<JsonLinkEntry<'_>> = doc
        .tokens
        .iter()
        .filter_map(|token| {
            let target = match LinkTarget::of(token)? {
                LinkTarget::Attachment(a) => JsonLink::Attachment {
                    filename: &a.filename,
                    size: a.data.len(),
                },
                LinkTarget::Anchor(slug) => JsonLink::Anchor {
                    slug,
                    row: find_pos_by_anchor(&doc.tokens, token),
                },
                LinkTarget::Echo(name) => JsonLink::Echo { name },
                LinkTarget::Message(id) => JsonLink::Message { id },
                LinkTarget::External(url) => JsonLink::External { url },
            };
            Some(JsonLinkEntry {
                line: token.line,
                text: token.display_text(),
                target,
            })
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&entries)? + "\n");
    }

    let mut out = String::new();
    for entry in &entries {
        let target = match &entry.target {
            JsonLink::Attachment { filename, size } => format!("save {filename} ({})", format_size(*size)),
            JsonLink::Anchor { slug, row: Some(row) } => format!("jump #{slug} (row {row})"),
            JsonLink::Anchor { slug, row: None } => format!("jump #{slug} (not found)"),
            JsonLink::Echo { name } => format!("echo {name}"),
            JsonLink::Message { id } => format!("message {id}"),
            JsonLink::External { url } => format!("open {url}"),
        };
        writeln!(out, "{:>4} {target}", entry.line)?;
    }
    Ok(out)
}

// =============================================================================
// Search Command
// =============================================================================

#[derive(Serialize)]
struct JsonSearch<'a> {
    query: &'a str,
    status: String,
    invalid: bool,
    current: Option<usize>,
    hits: Vec<JsonHit>,
}

#[derive(Serialize)]
struct JsonHit {
    token: usize,
    row: Option<usize>,
    start: usize,
    end: usize,
}

pub fn search(doc: &LaidOut<'_>, query: &str, from: usize, json: bool) -> Result<String> {
    let map = token_line_map(&doc.tokens);
    let mut quick = QuickSearch::new();
    quick.search(&doc.tokens, query, from);

    let hits: Vec<JsonHit> = quick
        .hits()
        .iter()
        .map(|hit| JsonHit {
            token: hit.token,
            row: hit.display_line(&map),
            start: hit.columns.start,
            end: hit.columns.end,
        })
        .collect();

    if json {
        let result = JsonSearch {
            query,
            status: quick.status(),
            invalid: quick.is_invalid(),
            current: quick.current_index(),
            hits,
        };
        return Ok(serde_json::to_string_pretty(&result)? + "\n");
    }

    let mut out = String::new();
    for (idx, hit) in hits.iter().enumerate() {
        let marker = if quick.current_index() == Some(idx) { '>' } else { ' ' };
        let row = hit.row.map_or_else(|| "?".to_string(), |r| r.to_string());
        writeln!(out, "{marker} row {row}, cols {}..{}", hit.start, hit.end)?;
    }
    writeln!(out, "{}", quick.status())?;
    Ok(out)
}
