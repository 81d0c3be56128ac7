//! Comparison-key normalization

/// Structural key every identifier alias maps back to
pub const CANONICAL_ID: &str = "id";

/// Canonicalizes field names into comparison keys
///
/// Non-alphanumeric characters are dropped and the rest is lower-cased, so
/// `owner.id`, `Owner Id` and `owner_ID` all compare equal. A single alias
/// token (for example `LUID`) is mapped back to [`CANONICAL_ID`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNormalizer {
    /// Normalized alias token, if any
    alias: Option<String>,
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::plain()
    }
}

impl KeyNormalizer {
    /// Create a normalizer that maps `alias` back to `id`
    pub fn new(alias: impl AsRef<str>) -> Self {
        let alias = strip(alias.as_ref());
        Self {
            alias: (!alias.is_empty() && alias != CANONICAL_ID).then_some(alias),
        }
    }

    /// Normalizer without an alias
    pub fn plain() -> Self {
        Self { alias: None }
    }

    /// Normalizer for jobs that label identifiers as `LUID`
    pub fn luid() -> Self {
        Self::new("LUID")
    }

    /// The normalized alias token, if configured
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Normalize a key for comparison
    pub fn normalize(&self, key: &str) -> String {
        let stripped = strip(key);
        match &self.alias {
            Some(alias) if *alias == stripped => CANONICAL_ID.to_string(),
            _ => stripped,
        }
    }
}

/// Keep ASCII letters and digits, lower-cased
fn strip(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
