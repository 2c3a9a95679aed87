//! Backend Requests
//!
//! Payloads sent to the task endpoint.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::row::Rank;

/// Body of `PUT <endpoint>`: the original ranks listed in their new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    #[serde(rename = "ruleID")]
    pub rule_id: i64,
    pub chain: String,
    pub ranks: Vec<Rank>,
}

/// `DELETE <endpoint>?ruleID=..&chain=..&rank=..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub rule_id: i64,
    pub chain: String,
    pub rank: Rank,
}

impl DeleteRequest {
    pub fn url(&self, endpoint: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}ruleID={}&chain={}&rank={}",
            endpoint,
            separator,
            self.rule_id,
            utf8_percent_encode(&self.chain, NON_ALPHANUMERIC),
            self.rank,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_request_wire_format() {
        let req = ReorderRequest {
            rule_id: 7,
            chain: "post".to_string(),
            ranks: vec![3, 0, 1, 2],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "ruleID": 7, "chain": "post", "ranks": [3, 0, 1, 2] })
        );
    }

    #[test]
    fn test_delete_url() {
        let req = DeleteRequest { rule_id: 4, chain: "error".to_string(), rank: 2 };
        assert_eq!(req.url("tasks"), "tasks?ruleID=4&chain=error&rank=2");
        assert_eq!(req.url("tasks?lang=fr"), "tasks?lang=fr&ruleID=4&chain=error&rank=2");
    }

    #[test]
    fn test_delete_url_encodes_chain() {
        let req = DeleteRequest { rule_id: 1, chain: "a&b c".to_string(), rank: 0 };
        assert_eq!(req.url("tasks"), "tasks?ruleID=1&chain=a%26b%20c&rank=0");
    }
}
