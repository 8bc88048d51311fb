use super::config::BALLS_PER_OVER;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-innings figures for one player, batting and bowling and fielding together.
///
/// Counters are reset at the start of every innings; cross-innings aggregation
/// works from the snapshots embedded in completed innings records instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub balls_bowled: u32,
    pub catches: u32,
    pub run_outs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_out: Option<String>,
    #[serde(default)]
    pub out: bool,
}

impl PlayerStat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_for_innings(&mut self) {
        *self = Self::default();
    }

    /// Credit runs off the bat, tracking boundary counts.
    pub fn add_bat_runs(&mut self, runs: u32) {
        self.runs += runs;
        if runs == 4 {
            self.fours += 1;
        }
        if runs == 6 {
            self.sixes += 1;
        }
    }

    /// Scoreboard shorthand, e.g. `34(21)`.
    pub fn batting_line(&self) -> String {
        format!("{}({})", self.runs, self.balls_faced)
    }

    pub fn strike_rate(&self) -> f64 {
        if self.balls_faced == 0 {
            0.0
        } else {
            self.runs as f64 / self.balls_faced as f64 * 100.0
        }
    }

    /// Scoreboard shorthand, e.g. `2-34` for two wickets conceding 34.
    pub fn bowling_figures(&self) -> String {
        format!("{}-{}", self.wickets, self.runs_conceded)
    }

    /// Overs bowled in `O.B` form, e.g. 22 balls is `3.4`.
    pub fn overs_bowled(&self) -> String {
        format!(
            "{}.{}",
            self.balls_bowled / BALLS_PER_OVER,
            self.balls_bowled % BALLS_PER_OVER
        )
    }

    /// Runs conceded per over; `None` until a legal ball has been bowled.
    pub fn economy(&self) -> Option<f64> {
        if self.balls_bowled == 0 {
            None
        } else {
            Some(self.runs_conceded as f64 / (self.balls_bowled as f64 / BALLS_PER_OVER as f64))
        }
    }
}

/// The mutable per-innings ledger, keyed by player name.
///
/// Every player of both rosters gets an entry at match setup, so lookups during
/// scoring always land on an initialized record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsLedger {
    players: BTreeMap<String, PlayerStat>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init_player(&mut self, name: &str) {
        self.players.entry(name.to_string()).or_default();
    }

    pub fn reset_all_for_innings(&mut self) {
        for stat in self.players.values_mut() {
            stat.reset_for_innings();
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerStat> {
        self.players.get(name)
    }

    pub fn player_mut(&mut self, name: &str) -> &mut PlayerStat {
        self.players.entry(name.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PlayerStat)> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
