//! What activating a link token should do.

use crate::patterns::ECHO_NAME;
use crate::token::{Attachment, Token, TokenKind};

const II_SCHEME: &str = "ii://";

/// Destination of a link token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Embedded file to save.
    Attachment(&'a Attachment),
    /// Header in the same message, by slug.
    Anchor(&'a str),
    /// An echo area, `ii://<echo>`.
    Echo(&'a str),
    /// A message id, `ii://<msgid>`.
    Message(&'a str),
    /// Anything else; handed to a browser.
    External(&'a str),
}

impl<'a> LinkTarget<'a> {
    /// Classify a `Url` token. Other tokens have no target.
    pub fn of(token: &'a Token) -> Option<Self> {
        if token.kind != TokenKind::Url {
            return None;
        }
        if let Some(attachment) = &token.attachment {
            return Some(LinkTarget::Attachment(attachment));
        }
        let url = token.url.as_deref()?;
        let target = if let Some(slug) = url.strip_prefix('#') {
            LinkTarget::Anchor(slug)
        } else if let Some(rest) = url.strip_prefix(II_SCHEME) {
            if is_echo_name(rest) {
                LinkTarget::Echo(rest)
            } else {
                LinkTarget::Message(rest)
            }
        } else {
            LinkTarget::External(url)
        };
        Some(target)
    }
}

/// Whether `name` is a well-formed echo area name such as `ii.test.14`.
pub fn is_echo_name(name: &str) -> bool {
    ECHO_NAME.is_match(name)
}
