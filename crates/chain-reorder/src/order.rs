//! Row Ordering
//!
//! The canonical in-memory order of a chain. The table in the page is
//! a projection of this list.

use std::collections::HashSet;

use crate::error::{EditorError, EditorResult};
use crate::row::Rank;

/// Where the dragged row lands relative to the row under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    /// Upper half of the target's box inserts before it, lower half after it
    pub fn from_pointer(pointer_y: f64, top: f64, height: f64) -> Self {
        let offset = pointer_y - top;
        if offset < height / 2.0 {
            Placement::Before
        } else {
            Placement::After
        }
    }
}

/// Ordered list of row ranks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOrder {
    ranks: Vec<Rank>,
}

impl RowOrder {
    pub fn new(ranks: Vec<Rank>) -> EditorResult<Self> {
        let mut seen = HashSet::with_capacity(ranks.len());
        for rank in &ranks {
            if !seen.insert(*rank) {
                return Err(EditorError::DuplicateRank(*rank));
            }
        }
        Ok(Self { ranks })
    }

    pub fn as_slice(&self) -> &[Rank] {
        &self.ranks
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn contains(&self, rank: Rank) -> bool {
        self.ranks.contains(&rank)
    }

    fn index_of(&self, rank: Rank) -> EditorResult<usize> {
        self.ranks
            .iter()
            .position(|r| *r == rank)
            .ok_or(EditorError::UnknownRow(rank))
    }

    /// Move `source` next to `target`.
    ///
    /// Returns `false` without touching the order when `source` already sits
    /// at the requested side of `target`, or when both are the same row.
    pub fn move_relative(
        &mut self,
        source: Rank,
        target: Rank,
        placement: Placement,
    ) -> EditorResult<bool> {
        let source_idx = self.index_of(source)?;
        let target_idx = self.index_of(target)?;
        if source == target {
            return Ok(false);
        }

        let in_place = match placement {
            Placement::Before => source_idx + 1 == target_idx,
            Placement::After => target_idx + 1 == source_idx,
        };
        if in_place {
            return Ok(false);
        }

        self.ranks.remove(source_idx);
        let target_idx = self.index_of(target)?;
        let insert_at = match placement {
            Placement::Before => target_idx,
            Placement::After => target_idx + 1,
        };
        self.ranks.insert(insert_at, source);
        Ok(true)
    }

    /// True when this order holds exactly the ranks of `original`
    pub fn is_permutation_of(&self, original: &[Rank]) -> bool {
        if self.ranks.len() != original.len() {
            return false;
        }
        let mut mine = self.ranks.clone();
        let mut theirs = original.to_vec();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }
}
