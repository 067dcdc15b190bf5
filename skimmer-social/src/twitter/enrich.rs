//! Pure text enrichment for retained timeline posts.
//!
//! Mirrors the upstream service's display pipeline: escape first, then one
//! link substitution, then one mention substitution. Both substitutions are
//! deliberately single-shot per invocation with a greedy left-hand group, so
//! the *last* candidate wins and earlier ones stay plain text. That matches
//! the behavior downstream renderers already rely on; do not widen it to a
//! global replace.

use std::sync::OnceLock;

use regex::Regex;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(.*)(https?://\S+)(.*)").expect("url pattern"))
}

fn mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(.*@)(\w+)(.*)").expect("mention pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+").expect("hashtag pattern"))
}

/// Escape `&`, `<`, `>`, and double quotes. Single quotes pass through
/// (compatibility-mode escaping); non-ASCII characters are preserved as-is.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape the text, then wrap one URL and one `@mention` in anchor tags.
///
/// The URL anchor uses the URL as both href and label; the mention anchor
/// links to the service's profile page for the handle.
pub fn process_text(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = url_re().replace(&escaped, r#"${1}<a href="${2}">${2}</a>${3}"#);
    mention_re()
        .replace(
            &linked,
            r#"${1}<a href="http://twitter.com/${2}">${2}</a>${3}"#,
        )
        .into_owned()
}

/// Collect every `#word` hashtag in order of appearance, `#` included.
/// Duplicates are preserved; no hashtags yields an empty vec.
pub fn extract_tags(text: &str) -> Vec<String> {
    tag_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
