//! Embedded files: XPM image literals and labelled base64 blobs.
//!
//! Both formats span several source lines. With inline styles on, a decoded
//! block becomes one attachment link token; with styles off it stays visible
//! as opaque code lines. Malformed blocks are not errors: the caller falls
//! back to ordinary line handling.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine as _};

use crate::patterns::{BASE64_LINE, FILENAME_UNSAFE, XPM_NAME};
use crate::token::{Attachment, Token};

/// Opening line of an XPM image literal.
pub const XPM_MARKER: &str = "/* XPM */";
/// Prefix of a base64 blob label line.
pub const BASE64_MARKER: &str = "@base64:";

/// Human-readable size: bytes below 1 KiB, KiB with two decimals above.
///
/// ```rust
/// use caesium_core::attach::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.50 KiB");
/// ```
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.2} KiB", bytes as f64 / 1024.0)
    }
}

/// Replace path separators, reserved characters, `..` and leading/trailing
/// dots or spaces with `_`.
pub fn sanitize_filename(name: &str) -> String {
    FILENAME_UNSAFE.replace_all(name, "_").into_owned()
}

/// Pseudo-URL shown for an attachment.
pub(crate) fn attachment_url(filename: &str, kind: &str, size: usize) -> String {
    format!("file:///{filename} ({kind}, {})", format_size(size))
}

/// One code token per line, numbered from `first_line`.
pub(crate) fn code_lines(lines: &[&str], first_line: usize) -> Vec<Token> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| Token::code(*line, first_line + i))
        .collect()
}

/// Tokenize an XPM literal starting at `lines[0]`.
///
/// Returns the tokens and the number of lines consumed, or `None` when the
/// array name or the closing `};` is missing.
pub(crate) fn tokenize_xpm(lines: &[&str], line: usize, styled: bool) -> Option<(Vec<Token>, usize)> {
    if lines.len() < 2 || !lines[0].starts_with(XPM_MARKER) {
        return None;
    }

    let name = XPM_NAME.find(lines[1])?.as_str();
    let name = name.trim_end_matches(['[', ']']);
    let filename = match name.strip_suffix("_xpm") {
        Some(stem) => format!("{stem}.xpm"),
        None => format!("{name}.xpm"),
    };
    let filename = sanitize_filename(&filename);

    let Some(last) = lines.iter().position(|l| l.trim_end().ends_with("};")) else {
        tracing::debug!(line, "unterminated XPM literal");
        return None;
    };
    let span = &lines[..=last];

    if !styled {
        return Some((code_lines(span, line), span.len()));
    }

    let source = span.join("\n");
    let data = source.clone().into_bytes();
    let url = attachment_url(&filename, "xpm", data.len());
    let token = Token::attachment(source, line, url, Attachment { filename, data });
    Some((vec![token], span.len()))
}

/// Tokenize a `@base64:<name>` blob starting at `lines[0]`.
///
/// Consumes the label and every following line that looks like base64.
/// Returns `None` when there is no name or no payload line.
pub(crate) fn tokenize_base64(lines: &[&str], line: usize, styled: bool) -> Option<(Vec<Token>, usize)> {
    if lines.len() < 2 || !lines[0].starts_with(BASE64_MARKER) {
        return None;
    }

    let name = lines[0].split_once(':').map_or("", |(_, name)| name.trim());
    if name.is_empty() {
        return None;
    }
    let filename = sanitize_filename(name);

    let mut payload = String::new();
    let mut count = 1;
    for raw in &lines[1..] {
        let chunk = raw.trim();
        if chunk.is_empty() || !BASE64_LINE.is_match(chunk) {
            break;
        }
        payload.push_str(chunk);
        payload.push('\n');
        count += 1;
    }
    if payload.is_empty() {
        return None;
    }
    let span = &lines[..count];

    if !styled {
        return Some((code_lines(span, line), count));
    }

    let data = match decode_lenient(&payload) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!(line, %err, "base64 blob does not decode");
            return Some((code_lines(span, line), count));
        }
    };

    let url = attachment_url(&filename, "b64", data.len());
    let token = Token::attachment(span.join("\n"), line, url, Attachment { filename, data });
    Some((vec![token], count))
}

/// Standard alphabet, any padding, non-zero trailing bits allowed.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 the forgiving way mail clients do.
///
/// Characters outside the alphabet are skipped, a stray `=` before the
/// third character of a group is ignored, and decoding stops at the first
/// completed pad group. An unfinished last group is an error.
fn decode_lenient(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let mut cleaned = String::with_capacity(payload.len());
    let mut quad = 0;
    let mut pads = 0;
    let mut complete = false;
    for c in payload.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '+' | '/') {
            cleaned.push(c);
            quad = (quad + 1) % 4;
            pads = 0;
        } else if c == '=' && quad >= 2 {
            cleaned.push(c);
            pads += 1;
            if quad + pads >= 4 {
                complete = true;
                break;
            }
        }
    }
    if !complete && quad != 0 {
        return Err(DecodeError::InvalidPadding);
    }
    LENIENT.decode(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    const XPM: [&str; 3] = ["/* XPM */", "static char *file_xpm[] = {", "\"1 1 1 1\"};"];

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KiB");
        assert_eq!(format_size(10 * 1024 + 512), "10.50 KiB");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("../etc/passwd"), "__etc_passwd");
        assert_eq!(sanitize_filename(".hidden"), "_hidden");
        assert_eq!(sanitize_filename("a<b>c?.txt"), "a_b_c_.txt");
        assert_eq!(sanitize_filename("name. "), "name._");
        assert_eq!(sanitize_filename("plain.png"), "plain.png");
    }

    #[test]
    fn xpm_attachment() {
        let (tokens, used) = tokenize_xpm(&XPM, 5, true).unwrap();
        assert_eq!(used, 3);
        assert_eq!(tokens.len(), 1);
        let attachment = tokens[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "file.xpm");
        assert_eq!(attachment.data, XPM.join("\n").into_bytes());
        assert_eq!(tokens[0].line, 5);
        assert_eq!(
            tokens[0].url.as_deref(),
            Some(format!("file:///file.xpm (xpm, {} B)", XPM.join("\n").len()).as_str())
        );
    }

    #[test]
    fn xpm_without_styles_is_code() {
        let (tokens, used) = tokenize_xpm(&XPM, 0, false).unwrap();
        assert_eq!(used, 3);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Code));
        assert_eq!(tokens[2], Token::code(XPM[2], 2));
    }

    #[test]
    fn xpm_needs_terminator() {
        assert!(tokenize_xpm(&XPM[..2], 0, true).is_none());
        assert!(tokenize_xpm(&["/* XPM */", "no array here", "};"], 0, true).is_none());
    }

    #[test]
    fn base64_blob() {
        let lines = ["@base64: hello.txt", "aGVsbG8g", "d29ybGQ=", "after it"];
        let (tokens, used) = tokenize_base64(&lines, 0, true).unwrap();
        assert_eq!(used, 3);
        let attachment = tokens[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, "hello.txt");
        assert_eq!(attachment.data, b"hello world");
        assert_eq!(tokens[0].url.as_deref(), Some("file:///hello.txt (b64, 11 B)"));
    }

    #[test]
    fn base64_bad_padding_falls_back_to_code() {
        let lines = ["@base64:x.bin", "abc"];
        let (tokens, used) = tokenize_base64(&lines, 2, true).unwrap();
        assert_eq!(used, 2);
        assert_eq!(tokens, vec![Token::code("@base64:x.bin", 2), Token::code("abc", 3)]);
    }

    #[test]
    fn lenient_decode_stops_at_first_pad_group() {
        assert_eq!(decode_lenient("aGk=\naGk=\n").unwrap(), b"hi");
        assert_eq!(decode_lenient("aGl=").unwrap(), b"hi");
        assert_eq!(decode_lenient("a=Gk=").unwrap(), b"hi");
        assert!(decode_lenient("aGk").is_err());
    }

    #[test]
    fn base64_needs_name_and_payload() {
        assert!(tokenize_base64(&["@base64:", "aGk="], 0, true).is_none());
        assert!(tokenize_base64(&["@base64:x", "not base64!"], 0, true).is_none());
    }
}
