//! Memoized parsing.
//!
//! [`SpecCache`] keys each parse by a SHA-256 digest of the document's
//! compact JSON form, so the same document always yields the same shared
//! [`ParsedSpec`]. The cache is owned by the caller; there is no global
//! instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sha2::{Digest, Sha256};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::model::ParsedSpec;
use crate::parse::RawDocument;
use crate::transform::SpecParser;

type Entries = HashMap<String, Arc<ParsedSpec>>;

/// A thread-safe parse cache.
#[derive(Debug, Default)]
pub struct SpecCache {
    parser: SpecParser,
    entries: RwLock<Entries>,
}

impl SpecCache {
    pub fn new(parser: SpecParser) -> Self {
        Self {
            parser,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self::new(SpecParser::new(config))
    }

    /// The cache key of a document: hex SHA-256 of its compact JSON.
    pub fn key_for(document: &RawDocument) -> String {
        format!("{:x}", Sha256::digest(document.to_string().as_bytes()))
    }

    /// Parse `document`, or return the result of an earlier identical parse.
    /// Failed parses are not cached.
    pub fn parse(&self, document: &RawDocument) -> Result<Arc<ParsedSpec>, ParseError> {
        let key = Self::key_for(document);

        if let Some(hit) = self.read().get(&key) {
            log::debug!("spec cache hit for {key}");
            return Ok(Arc::clone(hit));
        }

        let parsed = Arc::new(self.parser.parse(document)?);
        let mut entries = self.write();
        // Another caller may have parsed the same document meanwhile.
        let entry = entries.entry(key).or_insert(parsed);
        Ok(Arc::clone(entry))
    }

    pub fn get(&self, key: &str) -> Option<Arc<ParsedSpec>> {
        self.read().get(key).cloned()
    }

    /// Drop one entry, or every entry when `key` is `None`. Returns how
    /// many entries were removed.
    pub fn clear(&self, key: Option<&str>) -> usize {
        let mut entries = self.write();
        match key {
            Some(key) => usize::from(entries.remove(key).is_some()),
            None => {
                let removed = entries.len();
                entries.clear();
                removed
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
