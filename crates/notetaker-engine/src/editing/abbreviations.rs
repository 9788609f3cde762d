use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Trigger word to expansion, consulted when a word boundary is typed.
///
/// Serializes as a plain TOML/JSON table:
///
/// ```toml
/// [abbreviations]
/// brb = "be right back"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationTable {
    entries: BTreeMap<String, String>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a trigger, returning the previous expansion.
    pub fn insert(
        &mut self,
        trigger: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(trigger.into(), expansion.into())
    }

    pub fn remove(&mut self, trigger: &str) -> Option<String> {
        self.entries.remove(trigger)
    }

    pub fn get(&self, trigger: &str) -> Option<&str> {
        self.entries.get(trigger).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AbbreviationTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
