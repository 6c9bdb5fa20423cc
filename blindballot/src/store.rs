use crate::*;
use std::collections::BTreeMap;

/// Receipts of cast ballots, keyed by voting_id
pub trait ReceiptStore {
    /// Get the receipt of the last ballot cast in this election, if any
    fn get_prior(&self, voting_id: &str) -> Option<PriorBallot>;

    /// Remember the receipt of a ballot, replacing any earlier one
    fn set_prior(&mut self, voting_id: &str, prior: PriorBallot);
}

/// A simple store that uses an in-memory BTreeMap
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemStore {
    inner: BTreeMap<String, PriorBallot>,
}

impl MemStore {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ReceiptStore for MemStore {
    fn get_prior(&self, voting_id: &str) -> Option<PriorBallot> {
        self.inner.get(voting_id).cloned()
    }

    fn set_prior(&mut self, voting_id: &str, prior: PriorBallot) {
        self.inner.insert(voting_id.to_string(), prior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint_dig::BigUint;

    fn receipt(label: u32) -> PriorBallot {
        PriorBallot {
            label: BigUint::from(label),
            nonce: BigUint::from(label + 1),
        }
    }

    #[test]
    fn test_mem_store() {
        let mut store = MemStore::default();
        assert!(store.get_prior("1").is_none());

        store.set_prior("1", receipt(10));
        store.set_prior("2", receipt(20));
        store.set_prior("1", receipt(30));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_prior("1"), Some(receipt(30)));
        assert_eq!(store.get_prior("2"), Some(receipt(20)));
    }

    #[test]
    fn test_mem_store_json() {
        let mut store = MemStore::default();
        store.set_prior("4", receipt(65));

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"4":{"label":"NjU=","nonce":"NjY="}}"#);

        let decoded: MemStore = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.get_prior("4"), Some(receipt(65)));
    }
}
