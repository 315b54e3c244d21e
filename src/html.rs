//! Best-effort text heuristics over compiled email markup.
//!
//! These are regex passes, not an HTML parser. They only need to cope with
//! markup produced by the MJML compiler from our own templates, so they trade
//! generality for predictability: every function is a pure `&str` transform
//! and malformed input simply yields "no match".
//!
//! Two extraction entry points feed the preheader chain in
//! [`metadata`](crate::metadata):
//!
//! - [`extract_hidden_preheader`]: the first `div`/`span` hidden with
//!   `display:none` or `opacity:0` within the first [`HIDDEN_SCAN_LIMIT`]
//!   characters (where MJML puts `<mj-preview>` text).
//! - [`body_snippet`]: visible body text with boilerplate removed, cut to
//!   [`SNIPPET_MAX_CHARS`] on a word boundary.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Characters of the document searched for a hidden preheader block.
pub const HIDDEN_SCAN_LIMIT: usize = 20_000;

/// Longest body snippet kept before truncation.
pub const SNIPPET_MAX_CHARS: usize = 140;

/// A word boundary must lie past this many characters to be used as the cut.
pub const SNIPPET_MIN_BREAK: usize = 60;

/// Appended to truncated snippets only.
pub const ELLIPSIS: char = '\u{2026}';

/// Inline styles that mark the preheader block itself.
const PREHEADER_STYLES: &str = r"display\s*:\s*none|opacity\s*:\s*0";

/// Inline styles that hide or zero-size a block in the visible body.
const HIDDEN_STYLES: &str = r"display\s*:\s*none|opacity\s*:\s*0|visibility\s*:\s*hidden|max-height\s*:\s*0|mso-hide\s*:\s*all|font-size\s*:\s*0|width\s*:\s*0|height\s*:\s*0";

const PREHEADER_TAGS: &[&str] = &["div", "span"];
const HIDDEN_TAGS: &[&str] = &["div", "span", "p", "table", "tr", "td"];

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BODY_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<body[^>]*>").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script[\s\S]*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style[\s\S]*?</style>").unwrap());
static HEAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<head[\s\S]*?</head>").unwrap());
static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<[^>]*(?:id|class)\s*=\s*["'][^"']*(?:header|logo|footer|social)[^"']*["'][^>]*>[\s\S]*?</[^>]+>"#,
    )
    .unwrap()
});

/// Double-quoted style attributes are tried before single-quoted ones.
static PREHEADER_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        styled_element_regex(PREHEADER_TAGS, PREHEADER_STYLES, '"'),
        styled_element_regex(PREHEADER_TAGS, PREHEADER_STYLES, '\''),
    ]
});

static HIDDEN_BLOCK_RES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        styled_element_regex(HIDDEN_TAGS, HIDDEN_STYLES, '"'),
        styled_element_regex(HIDDEN_TAGS, HIDDEN_STYLES, '\''),
    ]
});

/// Build a case-insensitive matcher for `<tag ... style="...">inner</tag>`
/// where the style attribute contains one of `styles`.
///
/// The regex crate has no backreferences, so each tag gets its own
/// alternative with a literal closing tag. Alternatives keep `tags` order and
/// each captures its inner content in its own group.
fn styled_element_regex(tags: &[&str], styles: &str, quote: char) -> Regex {
    let alternatives: Vec<String> = tags
        .iter()
        .map(|tag| {
            format!(
                r"<{tag}[^>]*style={quote}[^{quote}]*(?:{styles})[^{quote}]*{quote}[^>]*>([\s\S]*?)</{tag}>"
            )
        })
        .collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("styled element regex is valid")
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn squish(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Replace every tag with a space.
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(html, " ")
}

/// Remove comments, `<script>`, `<style>` and `<head>` blocks.
pub fn strip_head_script_style(html: &str) -> String {
    let out = COMMENT_RE.replace_all(html, " ");
    let out = SCRIPT_RE.replace_all(&out, " ");
    let out = STYLE_RE.replace_all(&out, " ");
    HEAD_RE.replace_all(&out, " ").into_owned()
}

/// Remove hidden or zero-sized blocks (preheaders, tracking spacers).
pub fn strip_hidden_blocks(html: &str) -> String {
    let [double, single] = &*HIDDEN_BLOCK_RES;
    let out = double.replace_all(html, " ");
    single.replace_all(&out, " ").into_owned()
}

/// Remove elements whose `id` or `class` mentions header, logo, footer or social.
pub fn strip_boilerplate(html: &str) -> Cow<'_, str> {
    BOILERPLATE_RE.replace_all(html, " ")
}

/// Content after the first `<body>` tag, or the whole document when there is
/// none (or nothing follows it).
pub fn body_section(html: &str) -> &str {
    let mut parts = BODY_OPEN_RE.split(html);
    parts.next();
    match parts.next() {
        Some(body) if !body.is_empty() => body,
        _ => html,
    }
}

/// The first `n` characters of `text` (not bytes).
fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Extract the hidden preheader block, if any.
///
/// Scans only the first [`HIDDEN_SCAN_LIMIT`] characters. The first hidden
/// `div`/`span` wins; its inner tags are stripped and whitespace squished.
/// Returns `None` when nothing matches or the text comes out empty.
pub fn extract_hidden_preheader(html: &str) -> Option<String> {
    let head = prefix_chars(html, HIDDEN_SCAN_LIMIT);
    PREHEADER_RES.iter().find_map(|re| {
        let caps = re.captures(head)?;
        let inner = caps.iter().skip(1).flatten().next()?.as_str();
        if inner.is_empty() {
            return None;
        }
        Some(squish(&strip_tags(inner))).filter(|text| !text.is_empty())
    })
}

/// Derive a preview snippet from visible body text.
///
/// Always returns a string, possibly empty.
pub fn body_snippet(html: &str) -> String {
    let body = body_section(html);
    let cleaned = strip_head_script_style(body);
    let cleaned = strip_hidden_blocks(&cleaned);
    let cleaned = strip_boilerplate(&cleaned);
    let text = squish(&strip_tags(&cleaned));
    truncate_snippet(&text, SNIPPET_MAX_CHARS)
}

/// Cut `text` to at most `max` characters plus an ellipsis.
///
/// Breaks at the last space inside the limit when that space lies past
/// [`SNIPPET_MIN_BREAK`]; otherwise hard-cuts at `max`.
pub fn truncate_snippet(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut = prefix_chars(text, max);
    let kept = match cut.rfind(' ') {
        Some(idx) if cut[..idx].chars().count() > SNIPPET_MIN_BREAK => &cut[..idx],
        _ => cut,
    };
    format!("{kept}{ELLIPSIS}")
}
