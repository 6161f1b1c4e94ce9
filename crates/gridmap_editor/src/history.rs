//! Bounded undo history of full map snapshots

use gridmap_core::MapSnapshot;

/// Maximum number of snapshots kept; the oldest is dropped beyond this
pub const HISTORY_CAPACITY: usize = 100;

/// A stack of full save-state snapshots
///
/// The bottom entry is the baseline (the blank or freshly loaded map) and
/// is never undone past. In disabled mode (play/read-only maps) nothing is
/// ever recorded and `undo` is permanently a no-op.
#[derive(Debug, Clone)]
pub struct History {
    enabled: bool,
    stack: Vec<MapSnapshot>,
}

impl History {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            stack: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of snapshots currently held
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Check if there is anything to undo to
    pub fn can_undo(&self) -> bool {
        self.stack.len() > 1
    }

    /// Record a snapshot, evicting the oldest entry beyond capacity
    pub fn push(&mut self, snapshot: MapSnapshot) {
        if !self.enabled {
            return;
        }
        self.stack.push(snapshot);
        while self.stack.len() > HISTORY_CAPACITY {
            self.stack.remove(0);
        }
    }

    /// Pop the current state and return the one to restore
    ///
    /// Returns `None` at the baseline. The returned snapshot is NOT
    /// re-pushed; re-recording it would duplicate entries and make undo
    /// chains grow instead of shrink.
    pub fn undo(&mut self) -> Option<MapSnapshot> {
        if self.stack.len() > 1 {
            self.stack.pop();
            self.stack.last().cloned()
        } else {
            None
        }
    }

    /// Drop everything and start over from a single baseline entry
    pub fn reset(&mut self, baseline: MapSnapshot) {
        self.stack.clear();
        if self.enabled {
            self.stack.push(baseline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_core::{CollisionTile, EventTile};

    fn snapshot(marker: usize) -> MapSnapshot {
        MapSnapshot {
            tiles: vec![vec![vec![None]]],
            collision: vec![vec![CollisionTile::default()]],
            events: vec![vec![EventTile::default()]],
            player_layer: marker,
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new(true);
        for i in 0..150 {
            history.push(snapshot(i));
        }
        assert_eq!(history.depth(), HISTORY_CAPACITY);

        // Undoing all the way down lands on the oldest surviving entry
        let mut last = None;
        while let Some(restored) = history.undo() {
            last = Some(restored);
        }
        assert_eq!(history.depth(), 1);
        assert_eq!(last.unwrap().player_layer, 50);
    }

    #[test]
    fn test_undo_stops_at_baseline() {
        let mut history = History::new(true);
        history.push(snapshot(0));
        history.push(snapshot(1));
        history.push(snapshot(2));

        assert_eq!(history.undo().unwrap().player_layer, 1);
        assert_eq!(history.undo().unwrap().player_layer, 0);
        assert!(history.undo().is_none());
        assert!(history.undo().is_none());
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn test_disabled_history_records_nothing() {
        let mut history = History::new(false);
        history.push(snapshot(0));
        history.push(snapshot(1));
        assert_eq!(history.depth(), 0);
        assert!(history.undo().is_none());

        history.reset(snapshot(9));
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn test_reset_leaves_single_baseline() {
        let mut history = History::new(true);
        history.push(snapshot(0));
        history.push(snapshot(1));
        history.reset(snapshot(5));
        assert_eq!(history.depth(), 1);
        assert!(!history.can_undo());
    }
}
