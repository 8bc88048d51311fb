use super::{MatchEngine, MatchState};

/// How many scoring actions can be rolled back.
pub const UNDO_CAPACITY: usize = 5;

/// Bounded stack of pre-action state snapshots.
///
/// Every scoring operation pushes a clone of [`MatchState`] before mutating
/// anything; undoing pops the most recent clone and restores it wholesale.
/// When the stack is full the oldest snapshot is dropped. The log lives next
/// to the state rather than inside it, so snapshots never nest.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    snapshots: Vec<MatchState>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: MatchState) {
        if self.snapshots.len() == UNDO_CAPACITY {
            self.snapshots.remove(0);
        }
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<MatchState> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl MatchEngine {
    pub(crate) fn push_undo(&mut self) {
        self.undo.push(self.state.clone());
    }

    /// Roll back the last scoring action. Returns `false` (a no-op) when
    /// nothing is left to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(snapshot) => {
                log::debug!("undo: restoring state before the last scoring action");
                self.state = snapshot;
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
