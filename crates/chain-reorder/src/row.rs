//! Task Rows
//!
//! A row is one task of a chain as rendered by the server.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// Position of a task inside its chain, as assigned by the server
pub type Rank = i32;

/// One reorderable task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Value of `data-task-id`
    pub task_id: String,
    /// Chain (group) the row belongs to
    pub chain: String,
    /// Rank at page load; identifies the row inside its chain
    pub rank: Rank,
}

impl Row {
    pub fn new(task_id: impl Into<String>, chain: impl Into<String>, rank: Rank) -> Self {
        Self {
            task_id: task_id.into(),
            chain: chain.into(),
            rank,
        }
    }

    /// Build a row from its `data-task-id`, `data-chain` and `data-rank` attributes
    pub fn from_attributes(
        task_id: Option<String>,
        chain: Option<String>,
        rank: Option<String>,
    ) -> EditorResult<Self> {
        let non_empty = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| EditorError::InvalidRow(format!("missing {}", name)))
        };

        let task_id = non_empty(task_id, "data-task-id")?;
        let chain = non_empty(chain, "data-chain")?;
        let rank = non_empty(rank, "data-rank")?;
        let rank = rank.trim().parse::<Rank>().map_err(|_| {
            EditorError::InvalidRow(format!("data-rank {:?} is not an integer", rank))
        })?;

        Ok(Self { task_id, chain, rank })
    }

    /// Rule ID carried by `data-task-id`, if it is numeric
    pub fn rule_id(&self) -> Option<i64> {
        self.task_id.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_attributes() {
        let row =
            Row::from_attributes(Some("12".into()), Some("pre".into()), Some("3".into())).unwrap();
        assert_eq!(row, Row::new("12", "pre", 3));
        assert_eq!(row.rule_id(), Some(12));
    }

    #[test]
    fn test_row_missing_attribute() {
        let err = Row::from_attributes(Some("12".into()), None, Some("0".into())).unwrap_err();
        assert_eq!(err, EditorError::InvalidRow("missing data-chain".into()));

        let err = Row::from_attributes(Some(String::new()), Some("post".into()), Some("0".into()))
            .unwrap_err();
        assert_eq!(err, EditorError::InvalidRow("missing data-task-id".into()));
    }

    #[test]
    fn test_row_bad_rank() {
        let err = Row::from_attributes(Some("1".into()), Some("error".into()), Some("first".into()))
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidRow(_)));
    }

    #[test]
    fn test_non_numeric_task_id_has_no_rule_id() {
        assert_eq!(Row::new("task-a", "pre", 0).rule_id(), None);
    }
}
