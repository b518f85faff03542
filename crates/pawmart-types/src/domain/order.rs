use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A buyer's order against a listing. `listing_id` is a soft reference
/// (the listing's hex id as a string); deleting the listing does not
/// touch its orders. `status` is free-form, set by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub buyer_email: String,
    pub listing_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_cents: Option<i64>,
}

/// Partial update for an [`Order`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_cents: Option<i64>,
}

impl Order {
    pub fn apply(&mut self, patch: &OrderPatch) {
        if let Some(status) = &patch.status {
            self.status = Some(status.clone());
        }
        if let Some(offer_cents) = patch.offer_cents {
            self.offer_cents = Some(offer_cents);
        }
    }
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.offer_cents.is_none()
    }
}
