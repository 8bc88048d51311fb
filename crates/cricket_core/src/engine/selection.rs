use super::{InningsPhase, MatchEngine};
use crate::error::{MatchError, Result};
use crate::models::{BatterSlot, DismissalKind};
use serde::{Deserialize, Serialize};

/// What a suspended selection is asking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    OpeningStriker,
    OpeningNonStriker,
    OpeningBowler,
    /// Replacement for a dismissed batter.
    NewBatter,
    /// Bowler for the over about to start.
    NewBowler,
    /// Fielder credited with a catch or run-out; the wicket is applied when
    /// this resolves.
    Fielder {
        dismissal: DismissalKind,
        out: BatterSlot,
    },
}

impl SelectionKind {
    /// Prompt text for whatever surface is driving the engine.
    pub fn prompt(&self) -> String {
        match self {
            SelectionKind::OpeningStriker => "Select opening striker".to_string(),
            SelectionKind::OpeningNonStriker => "Select opening non-striker".to_string(),
            SelectionKind::OpeningBowler => "Select opening bowler".to_string(),
            SelectionKind::NewBatter => "Select new batsman".to_string(),
            SelectionKind::NewBowler => "Select bowler for the next over".to_string(),
            SelectionKind::Fielder { dismissal, .. } => {
                format!("Select fielder ({})", dismissal.label())
            }
        }
    }
}

/// The single suspended selection request: what is being asked for and who
/// may be picked. At most one of these exists at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSelection {
    pub kind: SelectionKind,
    pub eligible: Vec<String>,
}

impl MatchEngine {
    pub fn pending_selection(&self) -> Option<&PendingSelection> {
        self.state.pending.as_ref()
    }

    /// Batting-side players who may come in: not out and not already at the
    /// crease, in roster order.
    fn batting_candidates(&self) -> Vec<String> {
        self.teams
            .side(self.state.batting_side)
            .players
            .iter()
            .filter(|name| {
                let is_out = self
                    .state
                    .stats
                    .player(name)
                    .map(|s| s.out)
                    .unwrap_or(false);
                !is_out && !self.state.at_crease(name)
            })
            .cloned()
            .collect()
    }

    /// Any bowling-side player may bowl or field.
    fn fielding_candidates(&self) -> Vec<String> {
        self.teams.side(self.state.bowling_side).players.clone()
    }

    pub(crate) fn open_selection(&mut self, kind: SelectionKind) {
        let eligible = match &kind {
            SelectionKind::OpeningStriker
            | SelectionKind::OpeningNonStriker
            | SelectionKind::NewBatter => self.batting_candidates(),
            SelectionKind::OpeningBowler
            | SelectionKind::NewBowler
            | SelectionKind::Fielder { .. } => self.fielding_candidates(),
        };
        log::debug!(
            "selection gate open: {:?} with {} eligible",
            kind,
            eligible.len()
        );
        self.state.pending = Some(PendingSelection { kind, eligible });
    }

    /// Answer the pending selection with a player name.
    ///
    /// An ineligible name leaves the gate open and returns an error; a valid
    /// one applies the selection and either resumes play or opens the next
    /// gate in the sequence.
    pub fn resolve_selection(&mut self, name: &str) -> Result<()> {
        let pending = self
            .state
            .pending
            .take()
            .ok_or(MatchError::NoSelectionPending)?;

        if !pending.eligible.iter().any(|candidate| candidate == name) {
            log::warn!("rejected ineligible selection: {}", name);
            self.state.pending = Some(pending);
            return Err(MatchError::IneligibleSelection {
                name: name.to_string(),
            });
        }

        match pending.kind {
            SelectionKind::OpeningStriker => {
                self.state.striker = Some(name.to_string());
                self.open_selection(SelectionKind::OpeningNonStriker);
            }
            SelectionKind::OpeningNonStriker => {
                self.state.non_striker = Some(name.to_string());
                self.open_selection(SelectionKind::OpeningBowler);
            }
            SelectionKind::OpeningBowler => {
                self.state.bowler = Some(name.to_string());
                self.state.phase = InningsPhase::InProgress;
                log::info!(
                    "innings {} under way, {} batting",
                    self.state.innings,
                    self.teams.side(self.state.batting_side).name
                );
            }
            SelectionKind::NewBatter => {
                if self.state.striker.is_none() {
                    self.state.striker = Some(name.to_string());
                } else {
                    self.state.non_striker = Some(name.to_string());
                }
                // When the wicket fell on the last ball of the over, the over
                // change still owes us a bowler; that gate runs second.
                if self.state.bowler.is_none() {
                    self.state.phase = InningsPhase::AwaitingNewBowler;
                    self.open_selection(SelectionKind::NewBowler);
                } else {
                    self.state.phase = InningsPhase::InProgress;
                }
            }
            SelectionKind::NewBowler => {
                self.state.bowler = Some(name.to_string());
                self.state.phase = InningsPhase::InProgress;
            }
            SelectionKind::Fielder { dismissal, out } => {
                self.apply_wicket(dismissal, out, Some(name.to_string()))?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
