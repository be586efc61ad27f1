//! Object ledger: identity minting for client-placed world objects.

use std::collections::HashMap;

use serde_json::Value;

use super::RelayError;

/// A placed world object. The payload is opaque to the server.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub data: Value,
    pub owner: String,
}

/// Mint an `obj_`-prefixed 128-bit random identity.
fn mint_object_id() -> String {
    use rand::Rng;
    format!("obj_{:032x}", rand::rng().random::<u128>())
}

/// Last-known placement data per object, keyed by minted identity.
///
/// Records are kept until an explicit removal; objects placed by a player
/// who has since disconnected stay in the ledger.
#[derive(Debug, Default)]
pub struct ObjectLedger {
    objects: HashMap<String, ObjectRecord>,
}

impl ObjectLedger {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Store a placement and return its fresh identity.
    ///
    /// An identity collision is rejected rather than overwritten.
    pub fn add(&mut self, data: Value, owner: &str) -> Result<String, RelayError> {
        let id = mint_object_id();
        if self.objects.contains_key(&id) {
            return Err(RelayError::IdentityCollision(id));
        }
        self.objects.insert(
            id.clone(),
            ObjectRecord {
                data,
                owner: owner.to_owned(),
            },
        );
        Ok(id)
    }

    /// Delete a record, reporting whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.objects.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&ObjectRecord> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_then_remove_restores_prior_size() {
        let mut ledger = ObjectLedger::new();
        let id = ledger.add(json!({"type": "house"}), "player_a").unwrap();

        assert!(id.starts_with("obj_"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.remove(&id));
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_of_unknown_identity_changes_nothing() {
        let mut ledger = ObjectLedger::new();
        ledger.add(json!({"type": "tree"}), "player_a").unwrap();

        assert!(!ledger.remove("obj_never_added"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn records_carry_owner_and_payload() {
        let mut ledger = ObjectLedger::new();
        let id = ledger
            .add(json!({"type": "house", "color": 255}), "player_a")
            .unwrap();

        let record = ledger.get(&id).unwrap();
        assert_eq!(record.owner, "player_a");
        assert_eq!(record.data["color"], 255);
    }
}
