//! Quoting a message body for a reply.

use crate::patterns::QUOTE;

/// Prefix put before quoted lines of `author`.
///
/// Old-style quoting uses a bare `>`; otherwise a one-word name is used as
/// is and longer names shrink to their initials.
///
/// ```rust
/// use caesium_core::reply::quote_author;
///
/// assert_eq!(quote_author("Ivan Petrov", false), "IP");
/// assert_eq!(quote_author("anon", false), "anon");
/// assert_eq!(quote_author("anon", true), "");
/// ```
pub fn quote_author(name: &str, old_style: bool) -> String {
    if old_style {
        return String::new();
    }
    if !name.contains(' ') {
        return name.to_string();
    }
    name.split(' ').filter_map(|word| word.chars().next()).collect()
}

/// Quote body lines for a reply.
///
/// Tear lines and blank lines are dropped. Lines that already quote someone
/// get one more `>`; the rest are attributed to `author`.
pub fn quote_reply<S: AsRef<str>>(lines: &[S], author: &str) -> Vec<String> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.starts_with("+++") && !line.trim().is_empty())
        .map(|line| match QUOTE.find(line) {
            Some(m) => {
                let (prefix, rest) = line.split_at(m.end());
                let quoter = if rest.is_empty() || rest.starts_with(' ') { ">" } else { "> " };
                format!("{prefix}{quoter}{rest}")
            }
            None => format!("{author}> {line}"),
        })
        .collect()
}

/// Subject for a reply: `Re: ` is added once.
pub fn reply_subject(subject: &str) -> String {
    if subject.starts_with("Re:") {
        subject.to_string()
    } else {
        format!("Re: {subject}")
    }
}
