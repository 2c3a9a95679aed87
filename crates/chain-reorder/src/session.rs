//! Reorder Session
//!
//! Drag state of one task chain. Each table body in the page owns its
//! own session so several chains can be edited independently.
//!
//! States: `Idle` -> `Dragging` on [`ReorderSession::begin_drag`],
//! `Dragging` -> `Dirty` when the gesture ends, `Dirty` -> `Idle` once the
//! backend accepted the new order, and any state -> `Idle` on
//! [`ReorderSession::cancel`].

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::error::{ApplyError, EditorError, EditorResult};
use crate::order::{Placement, RowOrder};
use crate::request::{DeleteRequest, ReorderRequest};
use crate::row::{Rank, Row};

/// Observable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Dragging,
    Dirty,
}

/// Result of ending a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No gesture was open
    NoDrag,
    /// Gesture closed without marking the session dirty
    Clean,
    /// Session is now dirty
    Dirty,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    source: Rank,
    moved: bool,
}

/// Drag-and-drop editing session for one chain
#[derive(Debug, Clone)]
pub struct ReorderSession {
    rule_id: i64,
    chain: String,
    rows: Vec<Row>,
    baseline: RowOrder,
    order: RowOrder,
    gesture: Option<Gesture>,
    dirty: bool,
    /// Order sent by the pending apply, if any
    in_flight: Option<Vec<Rank>>,
}

impl ReorderSession {
    /// Build a session from rows in their rendered order.
    ///
    /// `rule_id` overrides the ID otherwise parsed from the first row.
    pub fn new(rows: Vec<Row>, rule_id: Option<i64>) -> EditorResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| EditorError::InvalidRow("chain has no rows".to_string()))?;
        let chain = first.chain.clone();

        if let Some(other) = rows.iter().find(|r| r.chain != chain) {
            return Err(EditorError::MixedGroup(chain, other.chain.clone()));
        }

        let rule_id = rule_id
            .or_else(|| first.rule_id())
            .ok_or_else(|| EditorError::MissingRuleId(chain.clone()))?;

        let baseline = RowOrder::new(rows.iter().map(|r| r.rank).collect())?;

        Ok(Self {
            rule_id,
            chain,
            rows,
            order: baseline.clone(),
            baseline,
            gesture: None,
            dirty: false,
            in_flight: None,
        })
    }

    pub fn rule_id(&self) -> i64 {
        self.rule_id
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Current visual order
    pub fn order(&self) -> &[Rank] {
        self.order.as_slice()
    }

    /// Order the server currently holds
    pub fn baseline(&self) -> &[Rank] {
        self.baseline.as_slice()
    }

    pub fn state(&self) -> EditorState {
        if self.dirty {
            EditorState::Dirty
        } else if self.gesture.is_some() {
            EditorState::Dragging
        } else {
            EditorState::Idle
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn dragged(&self) -> Option<Rank> {
        self.gesture.map(|g| g.source)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply/discard controls are shown while there are uncommitted changes
    pub fn controls_visible(&self) -> bool {
        self.dirty
    }

    pub fn begin_drag(&mut self, source: Rank) -> EditorResult<()> {
        if !self.order.contains(source) {
            return Err(EditorError::UnknownRow(source));
        }
        debug!("[{}] drag start on rank {}", self.chain, source);
        self.gesture = Some(Gesture { source, moved: false });
        Ok(())
    }

    /// Move the dragged row next to `target`. Returns whether the order changed.
    pub fn drag_over(&mut self, target: Rank, placement: Placement) -> EditorResult<bool> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(false);
        };
        if gesture.source == target {
            return Ok(false);
        }

        let moved = self.order.move_relative(gesture.source, target, placement)?;
        if moved {
            gesture.moved = true;
            debug!("[{}] order now {:?}", self.chain, self.order.as_slice());
        }
        Ok(moved)
    }

    /// Drop on `target`. A drop on the dragged row itself that never moved
    /// leaves the dirty flag alone.
    pub fn drop_on(&mut self, target: Rank) -> DropOutcome {
        let Some(gesture) = self.gesture.take() else {
            return DropOutcome::NoDrag;
        };
        if gesture.source == target && !gesture.moved {
            debug!("[{}] rank {} dropped onto itself", self.chain, target);
            return DropOutcome::Clean;
        }
        self.dirty = true;
        DropOutcome::Dirty
    }

    /// End of the gesture. Only marks dirty when no drop was handled.
    pub fn drag_end(&mut self) -> DropOutcome {
        match self.gesture.take() {
            Some(_) => {
                self.dirty = true;
                DropOutcome::Dirty
            }
            None => DropOutcome::NoDrag,
        }
    }

    /// Discard every uncommitted move
    pub fn cancel(&mut self) {
        debug!("[{}] discarding order {:?}", self.chain, self.order.as_slice());
        self.order = self.baseline.clone();
        self.gesture = None;
        self.dirty = false;
    }

    /// Start committing the current order.
    ///
    /// Fails with [`EditorError::ApplyInFlight`] while a previous request
    /// has not been answered.
    pub fn begin_apply(&mut self) -> EditorResult<ReorderRequest> {
        if self.in_flight.is_some() {
            warn!("[{}] apply ignored, a request is already in flight", self.chain);
            return Err(EditorError::ApplyInFlight);
        }
        if !self.order.is_permutation_of(self.baseline.as_slice()) {
            return Err(EditorError::BrokenPermutation {
                order: self.order.as_slice().to_vec(),
                original: self.baseline.as_slice().to_vec(),
            });
        }

        let ranks = self.order.as_slice().to_vec();
        self.in_flight = Some(ranks.clone());
        info!("[{}] committing order {:?}", self.chain, ranks);

        Ok(ReorderRequest {
            rule_id: self.rule_id,
            chain: self.chain.clone(),
            ranks,
        })
    }

    /// Record the backend's answer to the pending apply.
    ///
    /// On success the committed order becomes the new baseline and every
    /// row is renumbered to its index in it, like the server does. The
    /// returned pairs map each old rank to its new one. Moves made while
    /// the request was in flight are kept and still count as dirty.
    pub fn finish_apply(
        &mut self,
        result: Result<(), ApplyError>,
    ) -> EditorResult<Vec<(Rank, Rank)>> {
        let Some(committed) = self.in_flight.take() else {
            warn!("[{}] apply answer received with no request in flight", self.chain);
            return Ok(Vec::new());
        };

        if let Err(err) = result {
            warn!("[{}] commit failed: {}", self.chain, err);
            return Err(err.into());
        }

        let remap: HashMap<Rank, Rank> = committed
            .iter()
            .enumerate()
            .map(|(idx, old)| (*old, idx as Rank))
            .collect();
        let renumber = |rank: &Rank| remap.get(rank).copied().unwrap_or(*rank);

        let current: Vec<Rank> = self.order.as_slice().iter().map(renumber).collect();
        for row in &mut self.rows {
            row.rank = renumber(&row.rank);
        }
        self.baseline = RowOrder::new((0..committed.len() as Rank).collect())?;
        self.order = RowOrder::new(current)?;
        self.dirty = self.order != self.baseline;

        info!("[{}] order committed", self.chain);
        Ok(committed
            .iter()
            .enumerate()
            .map(|(idx, old)| (*old, idx as Rank))
            .collect())
    }

    /// Request deleting the row currently ranked `rank` on the server
    pub fn delete_request(&self, rank: Rank) -> EditorResult<DeleteRequest> {
        if self.in_flight.is_some() {
            return Err(EditorError::ApplyInFlight);
        }
        if !self.baseline.contains(rank) {
            return Err(EditorError::UnknownRow(rank));
        }
        Ok(DeleteRequest {
            rule_id: self.rule_id,
            chain: self.chain.clone(),
            rank,
        })
    }
}
