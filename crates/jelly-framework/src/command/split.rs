//! Quote-aware argument splitting.
//!
//! Handles:
//! - Splitting on an arbitrary, usually single-character, delimiter
//! - Quoted spans (single or double quotes) where the delimiter is plain content
//! - A bound on the number of tokens, after which the rest of the text is dropped

use tracing::trace;

fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"')
}

/// Splits `text` on `delimiter` into at most `max_tokens` arguments.
///
/// A quote character toggles quoting and is never copied into a token. Outside
/// quotes every occurrence of `delimiter` completes the current token, even an
/// empty one. As soon as `max_tokens` tokens are complete the scan stops and
/// the remaining text is discarded, so `None` means unbounded. A bound of zero
/// still lets the first token complete before stopping.
///
/// Tokens are trimmed afterwards and empty ones are dropped.
pub fn split_args(text: &str, delimiter: &str, max_tokens: Option<usize>) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut bounded = false;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if !in_quote && !delimiter.is_empty() && rest.starts_with(delimiter) {
            tokens.push(std::mem::take(&mut current));
            rest = &rest[delimiter.len()..];

            if max_tokens.is_some_and(|max| tokens.len() >= max) {
                bounded = true;
                break;
            }
            continue;
        }

        if is_quote(ch) {
            in_quote = !in_quote;
        } else {
            current.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    if !bounded && !current.is_empty() {
        tokens.push(current);
    }

    if bounded && !rest.is_empty() {
        trace!(discarded = rest, "Token bound reached, dropping remaining text");
    }

    sanitize(tokens)
}

/// Splits off the first token of `text`.
///
/// Follows the same quoting rules as [`split_args`]. Returns the trimmed first
/// token and the text after the delimiter that ended it, or an empty remainder
/// if no unquoted delimiter occurs.
pub fn split_first<'a>(text: &'a str, delimiter: &str) -> (String, &'a str) {
    let mut head = String::new();
    let mut in_quote = false;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if !in_quote && !delimiter.is_empty() && rest.starts_with(delimiter) {
            return (head.trim().to_string(), &rest[delimiter.len()..]);
        }

        if is_quote(ch) {
            in_quote = !in_quote;
        } else {
            head.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    (head.trim().to_string(), "")
}

fn sanitize(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
