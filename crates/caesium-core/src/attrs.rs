//! Text attributes accumulated while walking a token list.

use bitflags::bitflags;

use crate::token::{Token, TokenKind};

bitflags! {
    /// Character attributes a renderer applies on top of the token colour.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextAttrs: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
    }
}

impl TextAttrs {
    /// Attributes in effect for `token`, given those before it.
    ///
    /// Links are underlined; any other token ends the underline. Style
    /// markers switch bold and italic on and off.
    pub fn apply(self, token: &Token) -> Self {
        let mut attrs = self;
        attrs.set(TextAttrs::UNDERLINE, token.kind == TokenKind::Url);
        match token.kind {
            TokenKind::BoldBegin => attrs.insert(TextAttrs::BOLD),
            TokenKind::BoldEnd => attrs.remove(TextAttrs::BOLD),
            TokenKind::ItalicBegin => attrs.insert(TextAttrs::ITALIC),
            TokenKind::ItalicEnd => attrs.remove(TextAttrs::ITALIC),
            _ => {}
        }
        attrs
    }
}

/// Attributes carried into `tokens[index]` from earlier tokens on its
/// source line.
///
/// Spans never cross source lines, so a renderer that starts drawing in the
/// middle of a line only needs to replay that line's prefix.
pub fn attrs_before(tokens: &[Token], index: usize) -> TextAttrs {
    let Some(line) = tokens.get(index).map(|t| t.line) else {
        return TextAttrs::empty();
    };
    let first = tokens[..index]
        .iter()
        .rposition(|t| t.line != line)
        .map_or(0, |i| i + 1);
    tokens[first..index]
        .iter()
        .fold(TextAttrs::empty(), TextAttrs::apply)
}
