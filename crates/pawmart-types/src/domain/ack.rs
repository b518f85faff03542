use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Outcome of a user insert. The duplicate case is a normal outcome,
/// not an error: the caller is told nothing was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(ObjectId),
    AlreadyExists,
}

/// Store acknowledgment for an update. Field names follow the driver's
/// wire shape (`matchedCount` / `modifiedCount`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateAck {
    pub fn unmatched() -> Self {
        Self {
            matched_count: 0,
            modified_count: 0,
        }
    }
}

/// Store acknowledgment for a delete. `deleted_count` is 0 when no
/// record matched the key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acks_serialize_camel_case() {
        let json = serde_json::to_value(UpdateAck {
            matched_count: 1,
            modified_count: 0,
        })
        .unwrap();
        assert_eq!(json["matchedCount"], 1);
        assert_eq!(json["modifiedCount"], 0);

        let json = serde_json::to_value(DeleteAck { deleted_count: 1 }).unwrap();
        assert_eq!(json["deletedCount"], 1);
    }
}
