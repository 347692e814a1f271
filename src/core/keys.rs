//! Composite key codec
//!
//! A composite key is `U+0000 index_name U+0000 (field U+0000)*`. The
//! leading separator keeps composite keys out of the namespace of plain
//! primary ids, and the trailing separator after every field makes a partial
//! key a strict prefix of every full key sharing those leading fields.

use crate::domain::{KeyError, Result};
use std::fmt;

const SEPARATOR: char = '\u{0}';
const MAX_UNICODE: char = '\u{10FFFF}';

/// Deterministic key built from an index name and ordered field values
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    /// Builds the full key for `fields` under `index_name`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::EmptyIndexName`] for an empty index name and
    /// [`KeyError::ReservedCharacter`] if any component contains U+0000 or
    /// U+10FFFF.
    ///
    /// # Examples
    ///
    /// ```
    /// use caretrail::core::keys::CompositeKey;
    ///
    /// let key = CompositeKey::new("id~name", ["u1", "Ann"]).unwrap();
    /// assert_eq!(key.as_str(), "\u{0}id~name\u{0}u1\u{0}Ann\u{0}");
    /// ```
    pub fn new<I, S>(index_name: &str, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if index_name.is_empty() {
            return Err(KeyError::EmptyIndexName.into());
        }
        validate_component(index_name, 0)?;

        let mut key = String::with_capacity(index_name.len() + 2);
        key.push(SEPARATOR);
        key.push_str(index_name);
        key.push(SEPARATOR);

        for (i, field) in fields.into_iter().enumerate() {
            let field = field.as_ref();
            validate_component(field, i + 1)?;
            key.push_str(field);
            key.push(SEPARATOR);
        }

        Ok(Self(key))
    }

    /// Builds the range-scan prefix for keys whose leading fields equal `fields`
    ///
    /// Encoding is identical to [`new`](Self::new); the result is only
    /// meaningful as a prefix.
    pub fn partial<I, S>(index_name: &str, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(index_name, fields)
    }

    /// Wraps an encoded key read back from the store
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Malformed`] unless the string has composite layout.
    pub fn parse(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        if !is_composite(&encoded) || !encoded.ends_with(SEPARATOR) || encoded.len() < 3 {
            return Err(KeyError::Malformed(format!("{encoded:?}")).into());
        }
        Ok(Self(encoded))
    }

    /// Splits the key into its index name and field values
    ///
    /// # Examples
    ///
    /// ```
    /// use caretrail::core::keys::CompositeKey;
    ///
    /// let key = CompositeKey::new("userid~patientid", ["nurseA", "P1", "ward-3", "query"]).unwrap();
    /// let (index, fields) = key.split();
    /// assert_eq!(index, "userid~patientid");
    /// assert_eq!(fields, vec!["nurseA", "P1", "ward-3", "query"]);
    /// ```
    pub fn split(&self) -> (&str, Vec<&str>) {
        // Layout guarantees a leading and trailing separator.
        let inner = &self.0[1..self.0.len() - 1];
        let mut parts = inner.split(SEPARATOR);
        let index_name = parts.next().unwrap_or_default();
        (index_name, parts.collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompositeKey {
    /// Human-readable rendering with separators shown as `|`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index_name, fields) = self.split();
        write!(f, "{index_name}|{}", fields.join("|"))
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a stored key uses composite layout rather than a plain id
pub fn is_composite(key: &str) -> bool {
    key.starts_with(SEPARATOR)
}

fn validate_component(component: &str, position: usize) -> Result<()> {
    if let Some(c) = component
        .chars()
        .find(|&c| c == SEPARATOR || c == MAX_UNICODE)
    {
        return Err(KeyError::ReservedCharacter {
            position,
            code: c as u32,
        }
        .into());
    }
    Ok(())
}
