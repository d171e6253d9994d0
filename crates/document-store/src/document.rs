use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DocumentId, StoreError};

/// Field name under which the document id is exposed when decoding.
pub const ID_FIELD: &str = "_id";

/// A stored document: its id plus a JSON object body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

impl Document {
    /// Creates a document from an id and body.
    pub fn new(id: DocumentId, body: Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Returns a body field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Deserializes the document into a typed record.
    ///
    /// The id is injected as `_id` so records can carry it as a regular field.
    pub fn decode<T: DeserializeOwned>(&self, collection: &str) -> Result<T, StoreError> {
        let mut body = self.body.clone();
        body.insert(ID_FIELD.to_string(), Value::String(self.id.to_string()));
        serde_json::from_value(Value::Object(body)).map_err(|e| StoreError::Decode {
            collection: collection.to_string(),
            id: self.id,
            reason: e.to_string(),
        })
    }
}

/// Converts a serializable value into a document body.
///
/// Any `_id` key is dropped; ids are always assigned by the store.
pub fn to_body<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove(ID_FIELD);
            Ok(map)
        }
        other => Err(StoreError::Serialization(serde::ser::Error::custom(
            format!("expected a JSON object, got {other}"),
        ))),
    }
}

/// Selects documents within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document.
    All,
    /// Documents where any of `fields` is a string containing `term`,
    /// compared case-insensitively as a literal substring.
    ContainsAny {
        fields: Vec<String>,
        term: String,
    },
}

impl Filter {
    /// Builds a case-insensitive substring filter over the given fields.
    pub fn contains_any<I, F>(fields: I, term: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self::ContainsAny {
            fields: fields.into_iter().map(Into::into).collect(),
            term: term.into(),
        }
    }

    /// Returns true if the document body satisfies the filter.
    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::ContainsAny { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|field| {
                    body.get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Result ordering for `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    /// The order documents were inserted in.
    #[default]
    Insertion,
    /// Descending by an RFC 3339 timestamp field; ties go to the newest insert.
    NewestFirst(&'static str),
}

/// Outcome of a conditional integer increment.
#[derive(Debug, Clone, PartialEq)]
pub enum IncrementOutcome {
    /// The increment was applied; holds the post-update document.
    Applied(Document),
    /// The result would have fallen below the floor; nothing changed.
    Rejected { current: i64 },
    /// No document has the given id.
    NotFound,
}

pub(crate) fn timestamp_of(body: &Map<String, Value>, field: &str) -> Option<DateTime<Utc>> {
    body.get(field)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn contains_any_is_case_insensitive() {
        let filter = Filter::contains_any(["subject", "location"], "BIRM");
        assert!(filter.matches(&body(json!({"subject": "Art", "location": "Birmingham"}))));
        assert!(!filter.matches(&body(json!({"subject": "Art", "location": "Bristol"}))));
    }

    #[test]
    fn contains_any_treats_term_literally() {
        let filter = Filter::contains_any(["subject"], "c++");
        assert!(filter.matches(&body(json!({"subject": "Intro to C++"}))));
        assert!(!filter.matches(&body(json!({"subject": "Intro to C"}))));
    }

    #[test]
    fn contains_any_ignores_non_string_fields() {
        let filter = Filter::contains_any(["price"], "8");
        assert!(!filter.matches(&body(json!({"price": 88}))));
    }

    #[test]
    fn decode_injects_id() {
        #[derive(Deserialize)]
        struct Named {
            #[serde(rename = "_id")]
            id: DocumentId,
            name: String,
        }

        let id = DocumentId::new();
        let doc = Document::new(id, body(json!({"name": "Jo"})));
        let named: Named = doc.decode("people").unwrap();
        assert_eq!(named.id, id);
        assert_eq!(named.name, "Jo");
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            count: u32,
        }

        let doc = Document::new(DocumentId::new(), body(json!({"count": "many"})));
        let err = doc.decode::<Strict>("things").unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref collection, .. } if collection == "things"));
    }

    #[test]
    fn to_body_drops_id_and_rejects_scalars() {
        let map = to_body(&json!({"_id": "x", "a": 1})).unwrap();
        assert!(!map.contains_key(ID_FIELD));
        assert_eq!(map.get("a"), Some(&json!(1)));
        assert!(to_body(&json!(5)).is_err());
    }
}
