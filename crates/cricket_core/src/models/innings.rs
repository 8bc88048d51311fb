use super::ball::BallRecord;
use super::player::StatsLedger;
use super::team::TeamSide;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one completed innings.
///
/// Records are the source of truth for everything cross-innings: targets,
/// results, lead/trail arithmetic and the final report all read from here,
/// never from the live scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsRecord {
    /// 1-based innings number within the match.
    pub number: u32,
    pub batting_side: TeamSide,
    pub score: u32,
    pub wickets: u32,
    /// Overs at close in `O.B` form, e.g. `18.3`.
    pub overs: String,
    #[serde(default)]
    pub declared: bool,
    /// Per-innings ledger frozen at close.
    pub stats: StatsLedger,
    /// The balls bowled in this innings only.
    pub balls: Vec<BallRecord>,
}

impl InningsRecord {
    /// Scoreline shorthand, e.g. `142/7 (18.3)` or `310/4 (d) (71.0)`.
    pub fn scoreline(&self) -> String {
        if self.declared {
            format!("{}/{} (d) ({})", self.score, self.wickets, self.overs)
        } else {
            format!("{}/{} ({})", self.score, self.wickets, self.overs)
        }
    }
}
