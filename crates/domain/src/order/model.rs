use chrono::{DateTime, Utc};
use common::DocumentId;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an order. Orders are confirmed on creation and never
/// change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Confirmed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// A stored purchase of spaces across one or more lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub phone: String,
    #[serde(rename = "lessonIDs")]
    pub lesson_ids: Vec<DocumentId>,
    pub number_of_spaces: u32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// A validated order request, ready to be stored.
///
/// Name and phone are already trimmed and every lesson id parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub name: String,
    pub phone: String,
    pub lesson_ids: Vec<DocumentId>,
    pub number_of_spaces: u32,
}

/// Stored shape of an order, without the store-assigned id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderFields<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    #[serde(rename = "lessonIDs")]
    pub lesson_ids: &'a [DocumentId],
    pub number_of_spaces: u32,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl NewOrder {
    pub(crate) fn fields(&self, created_at: DateTime<Utc>) -> OrderFields<'_> {
        OrderFields {
            name: &self.name,
            phone: &self.phone,
            lesson_ids: &self.lesson_ids,
            number_of_spaces: self.number_of_spaces,
            created_at,
            status: OrderStatus::Confirmed,
        }
    }
}
