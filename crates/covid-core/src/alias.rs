// crates/covid-core/src/alias.rs

//! # Country Name Normalization
//!
//! The source dataset labels countries inconsistently (`"US"`, `"Korea,
//! South"`, `"Taiwan*"`). An [`AliasTable`] maps those raw labels to a
//! canonical display name and a [`Normalizer`] applies it everywhere a raw
//! label is read, including user queries.
//!
//! The lookup is a single step: the output of an alias is never looked up
//! again. The built-in table keeps the historical pair
//! `"Republic of the Congo" <-> "Congo (Brazzaville)"`, so those two labels
//! swap places instead of converging. [`AliasTable::cycles`] reports such
//! pairs and the normalizer logs them once at construction.

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Built-in raw → canonical aliases.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("Cabo Verde", "Cape Verde"),
    ("Ivory Coast", "Côte d’Ivoire"),
    ("Cote d'Ivoire", "Côte d’Ivoire"),
    ("Czechia", "Czech Republic"),
    ("Korea, South", "South Korea"),
    ("US", "United States"),
    ("Mainland China", "China"),
    ("Taiwan*", "Taiwan"),
    ("Burma", "Myanmar"),
    ("Holy See", "Vatican City"),
    ("West Bank and Gaza", "Palestine"),
    ("Republic of the Congo", "Congo (Brazzaville)"),
    ("Congo (Kinshasa)", "Democratic Republic of the Congo"),
    ("Congo (Brazzaville)", "Republic of the Congo"),
    ("Timor-Leste", "East Timor"),
    ("Bahamas, The", "Bahamas"),
    ("Gambia, The", "Gambia"),
    ("The Bahamas", "Bahamas"),
    ("The Gambia", "Gambia"),
];

/// On-disk shape for a custom table:
/// `{ "aliases": [ { "from": "US", "to": "United States" }, ... ] }`
#[derive(Debug, Deserialize)]
struct AliasFile {
    aliases: Vec<AliasEntry>,
}

#[derive(Debug, Deserialize)]
struct AliasEntry {
    from: String,
    to: String,
}

/// Immutable raw-label → canonical-name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        DEFAULT_ALIASES.iter().copied().collect()
    }

    /// Loads a custom table from JSON. Later entries win on duplicate keys.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let file: AliasFile = serde_json::from_reader(reader)?;
        Ok(file
            .aliases
            .into_iter()
            .map(|e| (e.from, e.to))
            .collect())
    }

    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.insert(from.into(), to.into());
        self
    }

    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aliases whose target is itself an alias key, sorted by key.
    ///
    /// Normalizing such a key twice gives a different answer than once.
    pub fn cycles(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .entries
            .iter()
            .filter(|(from, to)| from != to && self.entries.contains_key(to.as_str()))
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();
        out.sort_unstable();
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AliasTable {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Applies an injected [`AliasTable`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: Arc<AliasTable>,
}

impl Normalizer {
    pub fn new(table: AliasTable) -> Self {
        for (from, to) in table.cycles() {
            tracing::warn!(from, to, "alias target is itself aliased; normalization is not idempotent for this name");
        }
        Normalizer {
            table: Arc::new(table),
        }
    }

    /// Canonical name for `raw`; unknown names pass through verbatim.
    pub fn normalize<'a>(&'a self, raw: &'a str) -> &'a str {
        self.table.get(raw).unwrap_or(raw)
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(AliasTable::builtin())
    }
}
