//! Token types produced by the tokenizer and filled in by layout.
//!
//! A message body becomes a flat, ordered list of [`Token`]s. Each token
//! remembers the source line it was carved from, so the layout engine can
//! tell where a logical line ends and the next one begins. Style changes
//! (bold, italic) are zero-width marker tokens rather than nested nodes:
//! a renderer walks the list once and toggles attributes as it goes.

use std::fmt;

/// The kind of a token.
///
/// Block kinds (`Text`, `Header`, `Comment`, `Quote1`, `Quote2`, `Origin`,
/// `Code`) also act as *carrier* kinds: plain runs found by the inline
/// scanner inherit the kind of the block they were found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Ordinary body text.
    Text,
    /// `= `, `== `, `# ` ... heading line.
    Header,
    /// Postscript line (`PS`, `P.S`, `//`, ...).
    Comment,
    /// Quote with an odd number of `>`.
    Quote1,
    /// Quote with an even number of `>`.
    Quote2,
    /// `+++` tear line.
    Origin,
    /// `----` horizontal rule.
    HorizontalRule,
    /// Code block line, inline code span, or opaque block content.
    Code,
    /// Link, titled link or attachment.
    Url,
    /// Start of a bold span (zero width).
    BoldBegin,
    /// End of a bold span (zero width).
    BoldEnd,
    /// Start of an italic span (zero width).
    ItalicBegin,
    /// End of an italic span (zero width).
    ItalicEnd,
    /// Synthetic forced line break inside one source line.
    LineBreak,
}

impl TokenKind {
    /// Whether this kind is a zero-width style boundary.
    #[inline]
    pub const fn is_style_marker(self) -> bool {
        matches!(
            self,
            TokenKind::BoldBegin | TokenKind::BoldEnd | TokenKind::ItalicBegin | TokenKind::ItalicEnd
        )
    }

    /// Whether this kind is one of the two quote styles.
    #[inline]
    pub const fn is_quote(self) -> bool {
        matches!(self, TokenKind::Quote1 | TokenKind::Quote2)
    }

    /// Short lowercase name, stable for serialisation.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::Header => "header",
            TokenKind::Comment => "comment",
            TokenKind::Quote1 => "quote1",
            TokenKind::Quote2 => "quote2",
            TokenKind::Origin => "origin",
            TokenKind::HorizontalRule => "hr",
            TokenKind::Code => "code",
            TokenKind::Url => "url",
            TokenKind::BoldBegin => "bold_begin",
            TokenKind::BoldEnd => "bold_end",
            TokenKind::ItalicBegin => "italic_begin",
            TokenKind::ItalicEnd => "italic_end",
            TokenKind::LineBreak => "line_break",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An embedded file carried by a `Url` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Suggested, sanitised file name.
    pub filename: String,
    /// Decoded file contents.
    pub data: Vec<u8>,
}

/// The atomic unit of rendered content.
///
/// Equality ignores [`render`](Token::render): two tokens are equal when they
/// describe the same content, whether or not either has been laid out.
#[derive(Debug, Clone)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text this token was carved from (empty for markers).
    pub text: String,
    /// 0-based source line, offset by the tokenizer's start line.
    pub line: usize,
    /// Wrapped display lines; `None` until laid out.
    pub render: Option<Vec<String>>,
    /// Link target (`Url` tokens only).
    pub url: Option<String>,
    /// Link title from `[title](url)` or `=> url title` syntax.
    pub title: Option<String>,
    /// Embedded file (attachment `Url` tokens only).
    pub attachment: Option<Attachment>,
}

impl Token {
    /// Create a plain token of the given kind.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            render: None,
            url: None,
            title: None,
            attachment: None,
        }
    }

    /// A plain link whose target equals its text.
    pub fn url(text: impl Into<String>, line: usize) -> Self {
        let text = text.into();
        Self {
            url: Some(text.clone()),
            ..Self::new(TokenKind::Url, text, line)
        }
    }

    /// A link with a separate target and optional display title.
    ///
    /// An empty title is treated as absent.
    pub fn titled_url(
        text: impl Into<String>,
        line: usize,
        url: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            title: title.filter(|t| !t.is_empty()),
            ..Self::new(TokenKind::Url, text, line)
        }
    }

    /// An attachment pseudo-link.
    pub fn attachment(
        text: impl Into<String>,
        line: usize,
        url: impl Into<String>,
        attachment: Attachment,
    ) -> Self {
        Self {
            url: Some(url.into()),
            attachment: Some(attachment),
            ..Self::new(TokenKind::Url, text, line)
        }
    }

    /// A code token.
    pub fn code(text: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Code, text, line)
    }

    /// A plain text token.
    pub fn text(text: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Text, text, line)
    }

    /// A synthetic line break.
    pub fn line_break(line: usize) -> Self {
        Self::new(TokenKind::LineBreak, "", line)
    }

    /// Builder-style render lines, mostly for tests.
    pub fn with_render<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.render = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Laid-out lines, empty before layout.
    #[inline]
    pub fn rendered(&self) -> &[String] {
        self.render.as_deref().unwrap_or(&[])
    }

    /// Number of display rows this token spans beyond its first one.
    #[inline]
    pub(crate) fn extra_rows(&self) -> usize {
        self.rendered().len().saturating_sub(1)
    }

    /// Text shown for this token: the title or target for links, the
    /// source text otherwise.
    pub fn display_text(&self) -> &str {
        if self.kind == TokenKind::Url {
            if let Some(shown) = self.title.as_deref().or(self.url.as_deref()) {
                return shown;
            }
        }
        &self.text
    }

    /// Whether this token carries an embedded file.
    #[inline]
    pub fn is_attachment(&self) -> bool {
        self.attachment.is_some()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.line == other.line
            && self.url == other.url
            && self.title == other.title
            && self.attachment == other.attachment
    }
}

impl Eq for Token {}
