//! Fixed line and inline patterns.
//!
//! All patterns are compiled once on first use. Patterns that need
//! look-around (inline code, bold, italic) are not here: the inline scanner
//! checks their boundaries by hand.

use std::sync::LazyLock;

use regex::Regex;

macro_rules! lazy_regex {
    ($pattern:expr, $what:literal $(,)?) => {
        LazyLock::new(|| Regex::new($pattern).expect(concat!($what, " regex should compile")))
    };
}

/// Plain autolink: `http`, `https`, `ftp`, `file`, `ii`, `magnet`, `gemini`.
pub(crate) static URL: LazyLock<Regex> = lazy_regex!(
    r"(?:https?|ftp|file|ii|magnet|gemini):/?[-A-Za-zА-Яа-яЁё0-9+&@#/%?=~_|!:,.;()]+[-A-Za-zА-Яа-яЁё0-9+&@#/%=~_|()]",
    "autolink",
);

/// Gemini link at the very start of the scanned text: `=> url [title]`.
pub(crate) static URL_GEMINI: LazyLock<Regex> =
    lazy_regex!(r"^=>\s*(?P<url>\S+)(?P<title>\s.+)?", "gemini link");

/// Markdown link: `[title](url)`.
pub(crate) static URL_MARKDOWN: LazyLock<Regex> =
    lazy_regex!(r"\[(?P<title>.*?)\]\((?P<url>.*?)\)", "markdown link");

/// `= `, `== `, `=== `, `# `, `## `, `### ` at line start.
pub(crate) static HEADER: LazyLock<Regex> = lazy_regex!(r"^(?:={1,3}|#{1,3})\s", "header");

/// Postscript marker, optionally indented.
pub(crate) static POSTSCRIPT: LazyLock<Regex> = lazy_regex!(
    r"^\s*(?:P+S|(?:P\.)+S|ps|З+Ы|(?:З\.)+Ы|//|#)",
    "postscript",
);

/// Optional quoter initials followed by one or more `>`.
pub(crate) static QUOTE: LazyLock<Regex> =
    lazy_regex!(r"^\s*[a-zA-Zа-яА-Я0-9_\-.()]{0,20}>{1,20}", "quote");

/// `+++` tear line.
pub(crate) static ORIGIN: LazyLock<Regex> = lazy_regex!(r"^\s*\+\+\+", "origin");

/// Echo area name, e.g. `ii.test.14`.
pub(crate) static ECHO_NAME: LazyLock<Regex> =
    lazy_regex!(r"^[a-z0-9_!.-]{1,60}\.[a-z0-9_!.-]{1,60}$", "echo name");

/// Pieces of a file name that are unsafe to write to disk.
pub(crate) static FILENAME_UNSAFE: LazyLock<Regex> =
    lazy_regex!(r#"\.{2}|^[ .]|[/<>:"\\|?*]+|[ .]$"#, "filename sanitiser");

/// One line of a base64 blob.
pub(crate) static BASE64_LINE: LazyLock<Regex> =
    lazy_regex!(r"^[-A-Za-z0-9+/]*={0,3}$", "base64 line");

/// C array name in the second line of an XPM literal.
pub(crate) static XPM_NAME: LazyLock<Regex> = lazy_regex!(r"\w+\[\]", "xpm array name");
