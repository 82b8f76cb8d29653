//! Asset path rewriting
//!
//! Posts reference their media relative to their own folder (`./assets/...`).
//! Once served from the content root those references must become absolute.
//! This is a plain text substitution over the markdown source, applied before
//! any rendering, using the fixed rule table below.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// Marker every rewritable reference contains
const ASSETS_MARKER: &str = "./assets/";

/// Placeholder for the absolute asset prefix inside a replacement template
const PREFIX: &str = "{prefix}";

/// A single substitution: every match of `pattern` becomes `template`
pub struct AssetRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub template: &'static str,
}

impl AssetRule {
    fn new(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            template,
        }
    }

    /// Replacement string for a given prefix, with `$` escaped so the prefix
    /// is never read as a capture reference
    fn replacement(&self, prefix: &str) -> String {
        self.template.replace(PREFIX, &prefix.replace('$', "$$"))
    }
}

lazy_static! {
    /// Applied in order. The `.mp4` rule only sees what `html-src` left behind.
    pub static ref ASSET_RULES: Vec<AssetRule> = vec![
        AssetRule::new(
            "markdown-image",
            r"!\[([^\]]*)\]\(\./assets/([^)]+)\)",
            "![${1}]({prefix}${2})",
        ),
        AssetRule::new(
            "html-src",
            r#"src=(["'])\./assets/([^"']+)(["'])"#,
            "src=${1}{prefix}${2}${3}",
        ),
        AssetRule::new(
            "html-video-src",
            r#"(?i)src=(["'])\./assets/([^"']+\.mp4)(["'])"#,
            "src=${1}{prefix}${2}${3}",
        ),
        AssetRule::new(
            "html-href",
            r#"href=(["'])\./assets/([^"']+)(["'])"#,
            "href=${1}{prefix}${2}${3}",
        ),
    ];
}

/// Rewrite `./assets/...` references in `body` to `prefix...`
///
/// `prefix` is the absolute asset folder URL including its trailing slash,
/// e.g. `/content/blogs/authentication/assets/`. Text without any asset
/// reference is returned borrowed and unchanged.
pub fn rewrite_asset_paths<'a>(body: &'a str, prefix: &str) -> Cow<'a, str> {
    if !body.contains(ASSETS_MARKER) {
        return Cow::Borrowed(body);
    }

    let mut text = Cow::Borrowed(body);
    for rule in ASSET_RULES.iter() {
        let replacement = rule.replacement(prefix);
        let rewritten = match rule.pattern.replace_all(&text, replacement.as_str()) {
            Cow::Owned(s) => Some(s),
            Cow::Borrowed(_) => None,
        };
        if let Some(rewritten) = rewritten {
            tracing::trace!("Asset rule {} applied", rule.name);
            text = Cow::Owned(rewritten);
        }
    }
    text
}
