//! Field-level checks for incoming order payloads.
//!
//! Validation is pure and stops at the first failing rule; rules run in a
//! fixed order so clients always see the same message for the same payload.

use common::DocumentId;
use serde::Deserialize;
use serde_json::Value;

use super::NewOrder;
use crate::error::{Entity, ValidationError};

/// Raw order payload as received from a client.
///
/// Fields are kept as loose JSON so that wrong types produce the specific
/// validation message for that field rather than a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default, rename = "lessonIDs")]
    pub lesson_ids: Option<Value>,
    /// Older clients send the lesson list as `cart`.
    #[serde(default)]
    pub cart: Option<Value>,
    #[serde(default, rename = "numberOfSpaces")]
    pub number_of_spaces: Option<Value>,
}

impl OrderRequest {
    /// Checks the payload and converts it into a [`NewOrder`].
    pub fn validate(&self) -> Result<NewOrder, ValidationError> {
        let lessons = self.lesson_ids.as_ref().or(self.cart.as_ref());

        let (Some(name), Some(phone), Some(lessons), Some(spaces)) = (
            self.name.as_ref().filter(|v| is_present(v)),
            self.phone.as_ref().filter(|v| is_present(v)),
            lessons.filter(|v| is_present(v)),
            self.number_of_spaces.as_ref().filter(|v| is_present(v)),
        ) else {
            return Err(ValidationError::MissingOrderFields);
        };

        let name = name
            .as_str()
            .map(str::trim)
            .filter(|n| n.chars().count() >= 2)
            .ok_or(ValidationError::NameTooShort)?;

        let phone = phone
            .as_str()
            .filter(|p| is_valid_phone(p))
            .ok_or(ValidationError::InvalidPhone)?;

        let lessons = lessons
            .as_array()
            .filter(|l| !l.is_empty())
            .ok_or(ValidationError::EmptyCart)?;

        let number_of_spaces = positive_count(spaces).ok_or(ValidationError::InvalidSpaceCount)?;

        let lesson_ids = lessons
            .iter()
            .map(|id| {
                id.as_str()
                    .and_then(|id| DocumentId::parse(id).ok())
                    .ok_or(ValidationError::InvalidId {
                        entity: Entity::Lesson,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewOrder {
            name: name.to_string(),
            phone: phone.trim().to_string(),
            lesson_ids,
            number_of_spaces,
        })
    }
}

/// Presence check: null, `false`, `0` and `""` count as missing.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Digits, whitespace, hyphens, plus signs and parentheses only.
pub fn is_valid_phone(phone: &str) -> bool {
    !phone.is_empty()
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '+' | '(' | ')'))
}

/// Accepts a positive JSON integer or a string of digits.
fn positive_count(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(count).ok().filter(|c| *c > 0)
}
