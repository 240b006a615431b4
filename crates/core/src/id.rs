//! Identifiers for diagram cells.
//!
//! Nodes and edges share a single id space. Ids minted by a graph follow the
//! `n<seq>` / `e<seq>` pattern, but any non-empty string without whitespace is
//! accepted so snapshots produced elsewhere can be loaded as-is.
//!
//! `CellId` supports:
//! - [`CellId::node`] / [`CellId::edge`] for sequential ids
//! - [`CellId::new`] / `FromStr` / `TryFrom<String>` for parsing
//! - serde as a plain string (validated on deserialize)
//! - `Display`, `Eq`, `Ord`, `Hash`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix used for node ids minted by a graph.
pub const NODE_PREFIX: char = 'n';

/// Prefix used for edge ids minted by a graph.
pub const EDGE_PREFIX: char = 'e';

/// Errors from constructing a [`CellId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellIdError {
    /// The input was empty.
    #[error("cell id cannot be empty")]
    Empty,
    /// The input contained whitespace.
    #[error("cell id `{0}` contains whitespace")]
    Whitespace(String),
}

/// Opaque identifier of a node or an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId(String);

impl CellId {
    /// Create a `CellId`, validating the input.
    pub fn new(raw: impl Into<String>) -> Result<Self, CellIdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(CellIdError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(CellIdError::Whitespace(raw));
        }
        Ok(Self(raw))
    }

    /// The `seq`-th node id (`n<seq>`).
    #[must_use]
    pub fn node(seq: u64) -> Self {
        Self(format!("{NODE_PREFIX}{seq}"))
    }

    /// The `seq`-th edge id (`e<seq>`).
    #[must_use]
    pub fn edge(seq: u64) -> Self {
        Self(format!("{EDGE_PREFIX}{seq}"))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix if this id has the form `<prefix><digits>`.
    ///
    /// Used to seed id counters after loading a snapshot.
    #[must_use]
    pub fn sequence(&self, prefix: char) -> Option<u64> {
        self.0.strip_prefix(prefix)?.parse().ok()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CellId {
    type Err = CellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CellId {
    type Error = CellIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CellId {
    type Error = CellIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CellId> for String {
    fn from(id: CellId) -> Self {
        id.0
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CellId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CellId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_use_prefixes() {
        assert_eq!(CellId::node(1).as_str(), "n1");
        assert_eq!(CellId::edge(12).as_str(), "e12");
    }

    #[test]
    fn new_rejects_empty_and_whitespace() {
        assert_eq!(CellId::new(""), Err(CellIdError::Empty));
        assert!(matches!(
            CellId::new("n 1"),
            Err(CellIdError::Whitespace(_))
        ));
    }

    #[test]
    fn new_accepts_foreign_ids() {
        let id = CellId::new("3f2c-node").unwrap();
        assert_eq!(id.as_str(), "3f2c-node");
        assert_eq!(id.sequence(NODE_PREFIX), None);
    }

    #[test]
    fn sequence_parses_numeric_suffix() {
        assert_eq!(CellId::node(42).sequence(NODE_PREFIX), Some(42));
        assert_eq!(CellId::node(42).sequence(EDGE_PREFIX), None);
        assert_eq!(CellId::new("nx").unwrap().sequence(NODE_PREFIX), None);
    }

    #[test]
    fn display_and_from_str_agree() {
        let id: CellId = "e7".parse().unwrap();
        assert_eq!(id.to_string(), "e7");
        assert_eq!(id, "e7");
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = CellId::node(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"n3\"");
        let back: CellId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_empty_id() {
        let result: Result<CellId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = CellId::node(1);
        let b = CellId::node(2);
        assert!(a < b);
    }
}
