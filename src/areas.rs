//! Area code table
//!
//! Maps human-readable area names to the provider's area codes. The table
//! is a flat text file with one `name = code` pair per line.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::LookupError;

const SEPARATOR: &str = " = ";

/// Immutable name → code mapping loaded from a table source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaCodeTable {
    codes: HashMap<String, String>,
}

impl AreaCodeTable {
    /// Read and parse the table at `path`.
    ///
    /// Only failing to read the file is an error; malformed lines are
    /// skipped by [`AreaCodeTable::parse`].
    #[tracing::instrument(level = "debug")]
    pub async fn load(path: &Path) -> Result<Self, LookupError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| LookupError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;

        let table = Self::parse(&String::from_utf8_lossy(&bytes));
        debug!("Loaded {} area codes", table.len());
        Ok(table)
    }

    /// Parse table text. Lines that do not split into exactly two parts on
    /// `" = "` are ignored; later duplicates overwrite earlier ones.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut codes = HashMap::new();

        for line in source.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);

            let parts: Vec<&str> = line.split(SEPARATOR).collect();
            if let [name, code] = parts.as_slice() {
                codes.insert((*name).to_string(), (*code).to_string());
            }
        }

        Self { codes }
    }

    /// Exact-key lookup of an area name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
