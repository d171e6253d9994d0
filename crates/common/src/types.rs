use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier assigned by the document store to every stored record.
///
/// Wraps a UUID so callers never deal with the storage engine's native key
/// format directly. Any string that parses into a `DocumentId` is a valid
/// reference token; everything else is rejected before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

/// Returned when a string is not a well-formed [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document id: {input:?}")]
pub struct InvalidId {
    pub input: String,
}

impl DocumentId {
    /// Creates a new random document ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a document ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a reference token.
    pub fn parse(input: &str) -> Result<Self, InvalidId> {
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|_| InvalidId {
                input: input.to_string(),
            })
    }

    /// Returns true if `input` is a well-formed reference token.
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DocumentId> for Uuid {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_new_creates_unique_ids() {
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn document_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = DocumentId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn parse_accepts_display_output() {
        let id = DocumentId::new();
        assert_eq!(DocumentId::parse(&id.to_string()), Ok(id));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        for input in ["", "xyz", "12345", "not-a-uuid-at-all-0000000000000"] {
            let err = DocumentId::parse(input).unwrap_err();
            assert_eq!(err.input, input);
            assert!(!DocumentId::is_valid(input));
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
