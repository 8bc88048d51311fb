//! Ball-by-ball match engine.
//!
//! [`MatchEngine`] owns the complete live state of one match and exposes the
//! scoring operations as methods. Everything the engine mutates lives inside
//! [`MatchState`], so the undo log can capture and restore a whole scoring
//! action as one structural clone. The engine itself holds only the immutable
//! setup (config and rosters) next to that state.

pub mod ball;
pub mod flow;
pub mod innings;
pub mod selection;
pub mod undo;
pub mod view;

pub use selection::{PendingSelection, SelectionKind};
pub use undo::{UndoLog, UNDO_CAPACITY};

use crate::error::{MatchError, Result};
use crate::models::{
    BallRecord, InningsRecord, MatchConfig, MatchOutcome, MatchReport, StatsLedger, TeamSide,
    Teams, BALLS_PER_OVER,
};
use serde::{Deserialize, Serialize};

/// Where the current innings stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsPhase {
    /// Waiting for the opening striker, non-striker and bowler in turn.
    AwaitingOpeners,
    /// Scoring operations are accepted.
    InProgress,
    /// A wicket fell and the replacement batter has not been named yet.
    AwaitingNewBatsman,
    /// An over ended and the next bowler has not been named yet.
    AwaitingNewBowler,
    /// The final innings closed; the match result is set.
    Completed,
}

/// The complete mutable state of a match.
///
/// Undo snapshots clone this struct wholesale and restore it wholesale, so any
/// value a scoring action can touch must live here, including the selection
/// gate and the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// 1-based innings number.
    pub innings: u32,
    pub batting_side: TeamSide,
    pub bowling_side: TeamSide,
    pub score: u32,
    pub wickets: u32,
    /// Completed overs in the current innings.
    pub overs: u32,
    /// Legal balls bowled in the current over, 0..=5.
    pub balls_in_over: u32,
    /// Display tags of the current over, cleared when the over ends.
    #[serde(default)]
    pub over_log: Vec<String>,
    /// Ball-by-ball log across the whole match; entries carry their innings.
    #[serde(default)]
    pub balls: Vec<BallRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub striker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_striker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowler: Option<String>,
    /// Runs the side batting last needs to win; set only for the final innings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Per-innings ledger for every player of both teams.
    pub stats: StatsLedger,
    /// Snapshots of completed innings, in match order.
    #[serde(default)]
    pub records: Vec<InningsRecord>,
    /// Set by a declaration; consumed when the innings record is written.
    #[serde(default)]
    pub declared: bool,
    pub phase: InningsPhase,
    /// The single suspended player selection, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchOutcome>,
}

impl MatchState {
    pub fn match_over(&self) -> bool {
        self.result.is_some()
    }

    /// Legal balls bowled so far in the current innings.
    pub fn legal_balls_bowled(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls_in_over
    }

    /// Runs a side has banked in completed innings. The live innings is not
    /// included; callers that want it add `score` themselves.
    pub fn completed_runs(&self, side: TeamSide) -> u32 {
        self.records
            .iter()
            .filter(|r| r.batting_side == side)
            .map(|r| r.score)
            .sum()
    }

    pub fn at_crease(&self, name: &str) -> bool {
        self.striker.as_deref() == Some(name) || self.non_striker.as_deref() == Some(name)
    }

    /// Swap the batters between the ends. With a lone surviving batter the
    /// swap is suppressed so they keep the strike.
    pub(crate) fn swap_ends(&mut self) {
        if self.non_striker.is_none() && self.striker.is_some() {
            return;
        }
        std::mem::swap(&mut self.striker, &mut self.non_striker);
    }
}

/// The match engine: immutable setup plus live state plus the undo log.
#[derive(Debug)]
pub struct MatchEngine {
    config: MatchConfig,
    teams: Teams,
    state: MatchState,
    undo: UndoLog,
}

impl MatchEngine {
    /// Validate the setup and start the first innings, which opens the
    /// opening-striker selection gate.
    pub fn new(teams: Teams, config: MatchConfig) -> Result<Self> {
        let mut engine = Self::from_parts(config, teams, None)?;
        log::info!(
            "new {} match: {} vs {}",
            engine.config.format.label(),
            engine.teams.a.name,
            engine.teams.b.name
        );
        engine.start_innings();
        Ok(engine)
    }

    /// Rebuild an engine around restored state. The undo log always starts
    /// empty; snapshots do not carry it.
    pub fn from_parts(config: MatchConfig, teams: Teams, state: Option<MatchState>) -> Result<Self> {
        config.validate().map_err(MatchError::InvalidSetup)?;
        teams.validate().map_err(MatchError::InvalidSetup)?;

        let state = match state {
            Some(state) => state,
            None => {
                let mut stats = StatsLedger::new();
                for name in teams.all_players() {
                    stats.init_player(name);
                }
                MatchState {
                    innings: 1,
                    batting_side: TeamSide::A,
                    bowling_side: TeamSide::B,
                    score: 0,
                    wickets: 0,
                    overs: 0,
                    balls_in_over: 0,
                    over_log: Vec::new(),
                    balls: Vec::new(),
                    striker: None,
                    non_striker: None,
                    bowler: None,
                    target: None,
                    stats,
                    records: Vec::new(),
                    declared: false,
                    phase: InningsPhase::AwaitingOpeners,
                    pending: None,
                    result: None,
                }
            }
        };

        Ok(MatchEngine {
            config,
            teams,
            state,
            undo: UndoLog::new(),
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn result(&self) -> Option<&MatchOutcome> {
        self.state.result.as_ref()
    }

    pub fn match_over(&self) -> bool {
        self.state.match_over()
    }

    /// Build the end-of-match report from the completed innings records.
    /// Usable mid-match too, covering the innings finished so far.
    pub fn report(&self) -> MatchReport {
        MatchReport::build(&self.teams, &self.state.records, self.state.result.as_ref())
    }
}
