use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::blockchain::{MINING_REWARD, NETWORK_SENDER};

/// An opaque key/value record awaiting (or captured in) a block.
///
/// The ledger never inspects the contents. Keys are kept in a sorted map, so
/// the JSON form of a transaction is stable and can be fed into block hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Map<String, Value>);

impl Transaction {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Reward paid to `to` for sealing a block. Built at mining time, never
    /// submitted through the pool.
    pub fn reward(to: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("from".into(), json!(NETWORK_SENDER));
        fields.insert("to".into(), json!(to));
        fields.insert("amount".into(), json!(MINING_REWARD));
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for Transaction {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_names_network_as_sender() {
        let tx = Transaction::reward("miner-1");
        assert_eq!(tx.get("from"), Some(&json!("network")));
        assert_eq!(tx.get("to"), Some(&json!("miner-1")));
        assert_eq!(tx.get("amount"), Some(&json!(1)));
    }

    #[test]
    fn json_form_ignores_insertion_order() {
        let a: Transaction = serde_json::from_str(r#"{"to":"b","from":"a","amount":3}"#).unwrap();
        let b: Transaction = serde_json::from_str(r#"{"amount":3,"from":"a","to":"b"}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
