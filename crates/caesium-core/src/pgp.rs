//! PGP public keys and clear-signed messages.
//!
//! The crate does not speak OpenPGP itself. A caller that has a keyring can
//! inject a [`KeyInspector`]; without one, key blocks still become
//! attachments (styles on) or opaque code (styles off), and signed messages
//! show their signature block verbatim.

use chrono::DateTime;

use crate::attach::{attachment_url, code_lines, sanitize_filename};
use crate::error::PgpError;
use crate::parser::Tokenizer;
use crate::token::{Attachment, Token};

pub const BEGIN_KEY: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
pub const END_KEY: &str = "-----END PGP PUBLIC KEY BLOCK-----";
/// Dash-escaped key block inside a signed message.
pub const BEGIN_KEY_ESCAPED: &str = "- -----BEGIN PGP PUBLIC KEY BLOCK-----";
pub const END_KEY_ESCAPED: &str = "- -----END PGP PUBLIC KEY BLOCK-----";
pub const BEGIN_SIGNED_MESSAGE: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
pub const BEGIN_SIGNATURE: &str = "-----BEGIN PGP SIGNATURE-----";
pub const END_SIGNATURE: &str = "-----END PGP SIGNATURE-----";

const DEFAULT_KEY_FILENAME: &str = "pgp-public-key.asc";

/// Metadata of a scanned public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub key_id: String,
    pub fingerprint: String,
    /// User ids; the first one names the key.
    pub user_ids: Vec<String>,
    /// Creation time, Unix seconds.
    pub created: i64,
    /// Expiry time, Unix seconds.
    pub expires: Option<i64>,
    /// Numeric public-key algorithm id (RFC 4880 §9.1).
    pub algorithm: String,
    /// Key size in bits.
    pub length: String,
}

/// Result of verifying a clear-signed message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureInfo {
    pub valid: bool,
    pub trust: String,
    pub key_id: Option<String>,
    pub fingerprint: Option<String>,
    pub signer: Option<String>,
    /// Signature time, Unix seconds.
    pub timestamp: Option<i64>,
}

/// Keyring access used to annotate PGP blocks.
pub trait KeyInspector {
    /// Read the first public key from an armored key block.
    fn scan_key(&self, armored: &[u8]) -> Result<KeyInfo, PgpError>;

    /// Verify a complete clear-signed message.
    ///
    /// Backend failures should be reported as an invalid signature.
    fn verify(&self, signed: &[u8]) -> SignatureInfo;
}

/// Name of a public-key algorithm id, or the id itself when unknown.
pub fn algorithm_name(id: &str) -> &str {
    match id {
        "1" => "RSA (Encrypt or Sign)",
        "2" => "RSA (Encrypt-Only)",
        "3" => "RSA (Sign-Only)",
        "16" => "Elgamal (Encrypt-Only)",
        "17" => "DSA (Digital Signature Algorithm)",
        "18" => "ECDH",
        "19" => "ECDSA",
        other => other,
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, `---` when out of range.
pub fn format_timestamp(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "---".to_string())
}

/// `LineBreak`, `Code` pairs for each info line.
fn info_lines<I>(line: usize, lines: I) -> Vec<Token>
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .flat_map(|text| [Token::line_break(line), Token::code(text, line)])
        .collect()
}

fn key_info_tokens(info: &KeyInfo, line: usize) -> Result<(String, Vec<Token>), PgpError> {
    let user = info.user_ids.first().ok_or(PgpError::InvalidKey)?;
    let filename = sanitize_filename(&format!("{user}-{DEFAULT_KEY_FILENAME}").replace(',', "_"));
    let expires = info.expires.map_or_else(|| "---".to_string(), format_timestamp);

    let tokens = info_lines(
        line,
        [
            format!("      KeyId: {}", info.key_id),
            format!("Fingerprint: {}", info.fingerprint),
            format!("     UserId: {user}"),
            format!("    Created: {}", format_timestamp(info.created)),
            format!("    Expires: {expires}"),
            format!("  Algorithm: {}", algorithm_name(&info.algorithm)),
            format!("       Size: {}", info.length),
        ],
    );
    Ok((filename, tokens))
}

fn signature_status_tokens(sign: &SignatureInfo, line: usize) -> Vec<Token> {
    let mut lines = if sign.valid {
        vec![
            "     Status: Valid :)".to_string(),
            format!("      Trust: {}", sign.trust),
        ]
    } else {
        vec!["     Status: Invalid :(".to_string()]
    };
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "---".to_string());
    lines.push(format!("      KeyId: {}", or_dash(&sign.key_id)));
    lines.push(format!("Fingerprint: {}", or_dash(&sign.fingerprint)));
    lines.push(format!("     Signer: {}", or_dash(&sign.signer)));
    lines.push(format!(
        "  Timestamp: {}",
        sign.timestamp.map_or_else(|| "---".to_string(), format_timestamp)
    ));
    info_lines(line, lines)
}

impl<'k> Tokenizer<'k> {
    /// Tokenize a public key block whose first line is `lines[0]`.
    ///
    /// The caller has checked that `end_marker` occurs in `lines`.
    pub(crate) fn tokenize_key_block(&self, lines: &[&str], line: usize, end_marker: &str) -> (Vec<Token>, usize) {
        let count = lines
            .iter()
            .position(|l| l.trim().starts_with(end_marker))
            .map_or(lines.len(), |i| i + 1);
        let span = &lines[..count];

        if !self.options().inline_styles {
            return (code_lines(span, line), count);
        }

        let mut armored: Vec<&str> = span.to_vec();
        if end_marker == END_KEY_ESCAPED {
            for edge in [0, count - 1] {
                armored[edge] = armored[edge].strip_prefix("- ").unwrap_or(armored[edge]);
            }
        }
        let data = armored.join("\n").into_bytes();

        let mut filename = DEFAULT_KEY_FILENAME.to_string();
        let mut details = Vec::new();
        if let Some(inspector) = self.inspector() {
            match inspector.scan_key(&data).and_then(|info| key_info_tokens(&info, line)) {
                Ok((name, tokens)) => {
                    filename = name;
                    details = tokens;
                }
                Err(err) => {
                    tracing::debug!(line, %err, "public key not readable");
                    details = vec![Token::line_break(line), Token::code(format!("Error: {err}"), line)];
                }
            }
        }

        let url = attachment_url(&filename, "PGP key", data.len());
        let mut tokens = vec![Token::attachment(span.join("\n"), line, url, Attachment { filename, data })];
        tokens.extend(details);
        (tokens, count)
    }

    /// Tokenize a clear-signed message whose first line is `lines[0]`.
    ///
    /// Returns `None` when no signature part precedes the end marker.
    pub(crate) fn tokenize_signed_message(&self, lines: &[&str], line: usize) -> Option<(Vec<Token>, usize)> {
        let mut signature = None;
        let mut count = lines.len();
        for (i, raw) in lines.iter().enumerate() {
            let trimmed = raw.trim();
            if trimmed.starts_with(BEGIN_SIGNATURE) {
                signature = Some(i);
            }
            if trimmed.starts_with(END_SIGNATURE) {
                count = i + 1;
                break;
            }
        }
        let Some(signature) = signature else {
            tracing::debug!(line, "signed message without signature block");
            return None;
        };

        let mut tokens = vec![Token::code(lines[0], line)];
        tokens.extend(self.tokenize_lines(&lines[1..signature], line + 1, false));

        let signature_line = line + signature;
        match self.inspector().filter(|_| self.options().inline_styles) {
            Some(inspector) => {
                let sign = inspector.verify(lines[..count].join("\n").as_bytes());
                tokens.push(Token::code(lines[signature], signature_line));
                tokens.extend(signature_status_tokens(&sign, signature_line));
                tokens.push(Token::code(lines[count - 1], line + count - 1));
            }
            None => tokens.extend(code_lines(&lines[signature..count], signature_line)),
        }
        Some((tokens, count))
    }
}
