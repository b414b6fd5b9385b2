//! Placeholder expansion
//!
//! Replaces `${key}` and `${key:default}` occurrences using a resolver.

use crate::config::ResolverConfig;
use crate::resolver::PropertyResolver;

/// Expand placeholders in `text`
///
/// - `${key}` is replaced by the resolved value
/// - `${key:default}` falls back to `default` when the key is unresolved;
///   the default may itself contain placeholders, as in `${a:${b}}`
/// - An unresolved placeholder without default is kept verbatim
/// - Resolved values are expanded again, up to `config.max_depth` levels
#[must_use]
pub fn expand(text: &str, resolver: &dyn PropertyResolver, config: &ResolverConfig) -> String {
    expand_at(text, resolver, config, 0)
}

fn expand_at(text: &str, resolver: &dyn PropertyResolver, config: &ResolverConfig, depth: usize) -> String {
    if config.prefix.is_empty() || config.suffix.is_empty() || !text.contains(config.prefix.as_str()) {
        return text.to_string();
    }
    if depth >= config.max_depth {
        tracing::warn!("Placeholder expansion depth {} reached for '{}'", config.max_depth, text);
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(config.prefix.as_str()) {
        out.push_str(&rest[..start]);
        let body = &rest[start + config.prefix.len()..];

        let Some(end) = closing_suffix(body, config) else {
            // Unterminated placeholder, keep the remainder as written
            out.push_str(&rest[start..]);
            return out;
        };

        let expression = &body[..end];
        let (key, default) = match expression.split_once(config.default_separator) {
            Some((key, default)) => (key, Some(default)),
            None => (expression, None),
        };

        match resolver.resolve(key).or_else(|| default.map(str::to_string)) {
            Some(value) => out.push_str(&expand_at(&value, resolver, config, depth + 1)),
            None => {
                tracing::trace!("Unresolved placeholder '{}'", key);
                out.push_str(&rest[start..start + config.prefix.len() + end + config.suffix.len()]);
            }
        }

        rest = &body[end + config.suffix.len()..];
    }

    out.push_str(rest);
    out
}

/// Offset in `body` of the suffix closing a placeholder opened just before it
fn closing_suffix(body: &str, config: &ResolverConfig) -> Option<usize> {
    let (prefix, suffix) = (config.prefix.as_str(), config.suffix.as_str());
    let mut open = 0usize;
    let mut at = 0;
    while at < body.len() {
        let tail = &body[at..];
        if tail.starts_with(suffix) {
            if open == 0 {
                return Some(at);
            }
            open -= 1;
            at += suffix.len();
        } else if tail.starts_with(prefix) {
            open += 1;
            at += prefix.len();
        } else {
            at += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}
