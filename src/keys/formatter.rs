//! Human-readable column headers

use std::collections::HashMap;

/// Default acronym overrides, keyed by the lower-cased whole key
const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("id", "ID"),
    ("url", "URL"),
    ("uri", "URI"),
    ("api", "API"),
    ("html", "HTML"),
    ("xml", "XML"),
    ("pdf", "PDF"),
    ("csv", "CSV"),
];

/// Converts structural field names into display headers
///
/// `hasExtracts` becomes `Has Extracts`, `owner.id` becomes `Owner Id`. Keys
/// that match the override table as a whole (case-insensitive) are replaced
/// verbatim, so `id` becomes `ID` or the job's identifier alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormatter {
    overrides: HashMap<String, String>,
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new(
            DEFAULT_OVERRIDES
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        )
    }
}

impl DisplayFormatter {
    /// Create a formatter with an explicit override table
    pub fn new<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Default table with `id` displayed as `alias` (e.g. `LUID`)
    pub fn with_id_alias(alias: impl Into<String>) -> Self {
        let mut formatter = Self::default();
        formatter.overrides.insert("id".to_string(), alias.into());
        formatter
    }

    /// Look up the override for a whole key
    pub fn override_for(&self, key: &str) -> Option<&str> {
        self.overrides.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Format a key as a display header
    pub fn display(&self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }
        if let Some(header) = self.override_for(key) {
            return header.to_string();
        }

        key.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .flat_map(split_camel)
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Format every key in order
    pub fn display_all<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        keys.iter().map(|k| self.display(k.as_ref())).collect()
    }
}

/// Split an alphanumeric run on camelCase boundaries.
///
/// A boundary sits before an upper-case letter that follows a lower-case
/// letter or digit, and before the last capital of an acronym that is
/// followed by a lower-case letter (`siteURLPath` -> `site`, `URL`, `Path`).
fn split_camel(part: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = part.char_indices().collect();
    let mut tokens = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (pos, c) = chars[i];
        let prev = chars[i - 1].1;
        let next = chars.get(i + 1).map(|&(_, n)| n);

        let lower_to_upper =
            c.is_ascii_uppercase() && (prev.is_ascii_lowercase() || prev.is_ascii_digit());
        let acronym_end = c.is_ascii_uppercase()
            && prev.is_ascii_uppercase()
            && next.is_some_and(|n| n.is_ascii_lowercase());

        if lower_to_upper || acronym_end {
            tokens.push(&part[start..pos]);
            start = pos;
        }
    }
    tokens.push(&part[start..]);
    tokens
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
