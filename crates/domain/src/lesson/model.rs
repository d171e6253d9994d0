use common::DocumentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A catalog entry representing a purchasable lesson with finite capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub subject: String,
    pub location: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub available_spaces: u32,
    pub image: String,
    pub description: String,
}

/// A lesson that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub subject: String,
    pub location: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub available_spaces: u32,
    pub image: String,
    pub description: String,
}

impl NewLesson {
    /// Creates a lesson draft.
    pub fn new(
        subject: impl Into<String>,
        location: impl Into<String>,
        price: Decimal,
        available_spaces: u32,
        image: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            location: location.into(),
            price,
            available_spaces,
            image: image.into(),
            description: description.into(),
        }
    }

    /// Rejects drafts that cannot be offered for sale.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lesson_serializes_with_wire_names() {
        let id = DocumentId::new();
        let lesson = Lesson {
            id,
            subject: "Python Programming".to_string(),
            location: "Liverpool".to_string(),
            price: Decimal::new(8899, 2),
            available_spaces: 12,
            image: "logo-python.svg".to_string(),
            description: "Learn Python".to_string(),
        };

        let value = serde_json::to_value(&lesson).unwrap();
        assert_eq!(value["_id"], json!(id.to_string()));
        assert_eq!(value["availableSpaces"], json!(12));
        assert_eq!(value["price"], json!(88.99));
    }

    #[test]
    fn new_lesson_keeps_price_as_given() {
        let lesson = NewLesson::new("Art", "Leeds", Decimal::new(-5, 0), 3, "art.svg", "Paint");
        assert_eq!(lesson.price, Decimal::new(-5, 0));
        assert_eq!(lesson.validate(), Err(ValidationError::NegativePrice));
    }
}
