//! Undo history for point edits.

use crate::index::{GridPoint, SpatialIndex};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default maximum number of actions kept for undo.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// What a recorded action did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Add,
    Remove,
}

/// A reversible record of one point mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub target: GridPoint,
}

impl Action {
    pub fn add(target: GridPoint) -> Self {
        Self { kind: ActionKind::Add, target }
    }

    pub fn remove(target: GridPoint) -> Self {
        Self { kind: ActionKind::Remove, target }
    }

    /// Apply the inverse of this action to the index.
    /// Returns `true` if the index changed.
    fn revert(&self, index: &mut SpatialIndex) -> bool {
        match self.kind {
            ActionKind::Add => index.remove_point(self.target),
            ActionKind::Remove => index.add_point(self.target),
        }
    }
}

/// Chronological stack of user point edits, most recent last.
#[derive(Debug, Clone)]
pub struct ActionLog {
    actions: VecDeque<Action>,
    max_len: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_HISTORY)
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that keeps at most `max_len` actions (at least one).
    pub fn with_capacity_limit(max_len: usize) -> Self {
        Self {
            actions: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    /// Append an action, dropping the oldest one past the limit.
    pub fn push(&mut self, action: Action) {
        self.actions.push_back(action);
        if self.actions.len() > self.max_len {
            self.actions.pop_front();
        }
    }

    /// Pop the most recent action and apply its inverse to `index`.
    ///
    /// The undo itself is not recorded. Returns the undone action, or
    /// `None` when the log is empty.
    pub fn pop_and_undo(&mut self, index: &mut SpatialIndex) -> Option<Action> {
        let action = self.actions.pop_back()?;
        let changed = action.revert(index);
        log::debug!("undo {:?} at {} (changed: {changed})", action.kind, action.target);
        Some(action)
    }

    pub fn last(&self) -> Option<&Action> {
        self.actions.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> GridPoint {
        GridPoint::new(x, y)
    }

    /// Toggle a point the way a user click does and log it.
    fn click(index: &mut SpatialIndex, log: &mut ActionLog, point: GridPoint) {
        if index.toggle_point(point) {
            log.push(Action::add(point));
        } else {
            log.push(Action::remove(point));
        }
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut log = ActionLog::new();
        let mut index = SpatialIndex::new();
        assert!(!log.can_undo());
        assert!(log.pop_and_undo(&mut index).is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_undo_add() {
        let mut log = ActionLog::new();
        let mut index = SpatialIndex::new();
        click(&mut index, &mut log, p(3, 4));
        assert_eq!(log.last(), Some(&Action::add(p(3, 4))));

        assert_eq!(log.pop_and_undo(&mut index), Some(Action::add(p(3, 4))));
        assert!(!index.has_point(p(3, 4)));
        assert!(log.is_empty());
    }

    #[test]
    fn test_undo_remove() {
        let mut log = ActionLog::new();
        let mut index = SpatialIndex::new();
        index.add_point(p(1, 1));
        click(&mut index, &mut log, p(1, 1));
        assert!(!index.has_point(p(1, 1)));

        log.pop_and_undo(&mut index);
        assert!(index.has_point(p(1, 1)));
    }

    #[test]
    fn test_undo_sequence_restores_initial_state() {
        let mut log = ActionLog::new();
        let mut index = SpatialIndex::new();
        index.add_point(p(9, 9));
        let initial = index.clone();

        let clicks = [p(0, 0), p(1, 0), p(0, 0), p(9, 9), p(2, 2), p(1, 0)];
        for &point in &clicks {
            click(&mut index, &mut log, point);
        }
        assert_eq!(log.len(), clicks.len());

        for _ in 0..clicks.len() {
            assert!(log.pop_and_undo(&mut index).is_some());
        }
        assert_eq!(index, initial);

        // One more is a no-op.
        assert!(log.pop_and_undo(&mut index).is_none());
        assert_eq!(index, initial);
    }

    #[test]
    fn test_undo_is_not_recorded() {
        let mut log = ActionLog::new();
        let mut index = SpatialIndex::new();
        click(&mut index, &mut log, p(0, 0));
        click(&mut index, &mut log, p(1, 1));
        log.pop_and_undo(&mut index);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last(), Some(&Action::add(p(0, 0))));
    }

    #[test]
    fn test_history_limit_drops_oldest() {
        let mut log = ActionLog::with_capacity_limit(2);
        log.push(Action::add(p(0, 0)));
        log.push(Action::add(p(1, 0)));
        log.push(Action::add(p(2, 0)));
        assert_eq!(log.len(), 2);

        let mut index = SpatialIndex::new();
        assert_eq!(log.pop_and_undo(&mut index), Some(Action::add(p(2, 0))));
        assert_eq!(log.pop_and_undo(&mut index), Some(Action::add(p(1, 0))));
        assert!(log.pop_and_undo(&mut index).is_none());
    }
}
