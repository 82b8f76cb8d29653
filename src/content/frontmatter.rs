//! Front-matter parsing
//!
//! Posts start with a `---` delimited block of `key: value` lines. Parsing is
//! deliberately line-based rather than full YAML: each line is split at its
//! first colon, and values are coerced by a small fixed set of rules.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A `---` line, the block, then a closing line containing only `---`,
    /// anchored at the very start of the file.
    static ref FRONT_MATTER_RE: Regex =
        Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(?:\r?\n|\z)").unwrap();
}

/// A single front-matter value after coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterValue {
    Text(String),
    List(Vec<String>),
}

impl FrontMatterValue {
    /// Coerce a trimmed raw value
    ///
    /// - `[...]` is parsed as a strict JSON array, keeping the raw string on failure
    /// - one layer of matching single or double quotes is stripped
    /// - anything else stays a plain string
    pub fn coerce(raw: &str) -> Self {
        if raw.starts_with('[') && raw.ends_with(']') {
            return match parse_json_array(raw) {
                Some(items) => FrontMatterValue::List(items),
                None => FrontMatterValue::Text(raw.to_string()),
            };
        }

        if raw.len() >= 2
            && ((raw.starts_with('"') && raw.ends_with('"'))
                || (raw.starts_with('\'') && raw.ends_with('\'')))
        {
            return FrontMatterValue::Text(raw[1..raw.len() - 1].to_string());
        }

        FrontMatterValue::Text(raw.to_string())
    }
}

/// Parse a JSON array, stringifying non-string scalars
fn parse_json_array(raw: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    Some(
        values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
    )
}

/// Untyped front-matter: every key found in the block, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFrontMatter {
    entries: IndexMap<String, FrontMatterValue>,
}

impl RawFrontMatter {
    /// Split a markdown file into its front-matter and body
    ///
    /// Without a leading block the whole input is body and the front-matter is empty.
    pub fn split(content: &str) -> (Self, &str) {
        match FRONT_MATTER_RE.captures(content) {
            Some(caps) => {
                let block = caps.get(1).map_or("", |m| m.as_str());
                let end = caps.get(0).map_or(0, |m| m.end());
                (Self::parse_block(block), &content[end..])
            }
            None => (Self::default(), content),
        }
    }

    /// Parse the inside of a front-matter block
    pub fn parse_block(block: &str) -> Self {
        let mut entries = IndexMap::new();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), FrontMatterValue::coerce(value.trim()));
        }

        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&FrontMatterValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontMatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First non-empty scalar among `keys`
    fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.get(key)? {
            FrontMatterValue::Text(s) if !s.is_empty() => Some(s.clone()),
            FrontMatterValue::Text(_) => None,
            FrontMatterValue::List(items) if !items.is_empty() => Some(items.join(", ")),
            FrontMatterValue::List(_) => None,
        })
    }

    /// A list value; a plain string becomes a single entry
    fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            FrontMatterValue::List(items) => Some(items.clone()),
            FrontMatterValue::Text(s) if !s.is_empty() => Some(vec![s.clone()]),
            FrontMatterValue::Text(_) => None,
        }
    }
}

/// Typed front-matter for a blog post
///
/// Every field is optional; the resolver applies defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// `summary`, falling back to `description`
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    /// `readTime`
    pub read_time: Option<String>,
    /// `publishDate`, falling back to `date`
    pub publish_date: Option<String>,
    pub author: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> (Self, &str) {
        let (raw, body) = RawFrontMatter::split(content);
        (Self::from(&raw), body)
    }
}

impl From<&RawFrontMatter> for FrontMatter {
    fn from(raw: &RawFrontMatter) -> Self {
        Self {
            title: raw.text(&["title"]),
            summary: raw.text(&["summary", "description"]),
            tags: raw.list("tags"),
            read_time: raw.text(&["readTime"]),
            publish_date: raw.text(&["publishDate", "date"]),
            author: raw.text(&["author"]),
        }
    }
}
