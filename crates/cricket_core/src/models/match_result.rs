use super::team::{Teams, TeamSide};
use serde::{Deserialize, Serialize};

/// Final verdict of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchOutcome {
    /// The side defending a total kept the chasers short.
    WonByRuns { side: TeamSide, margin: u32 },
    /// The chasing side passed the target with wickets in hand.
    WonByWickets { side: TeamSide, margin: u32 },
    /// Multi-innings early finish: the side due to bat last already led on
    /// aggregate with an innings to spare.
    WonByInnings { side: TeamSide, margin: u32 },
    Tied,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<TeamSide> {
        match self {
            MatchOutcome::WonByRuns { side, .. }
            | MatchOutcome::WonByWickets { side, .. }
            | MatchOutcome::WonByInnings { side, .. } => Some(*side),
            MatchOutcome::Tied => None,
        }
    }

    /// The announcement line shown when the match ends.
    pub fn describe(&self, teams: &Teams) -> String {
        match self {
            MatchOutcome::WonByRuns { side, margin } => {
                format!("{} won by {} runs!", teams.side(*side).name, margin)
            }
            MatchOutcome::WonByWickets { side, margin } => {
                format!("{} won by {} wickets!", teams.side(*side).name, margin)
            }
            MatchOutcome::WonByInnings { side, margin } => {
                format!(
                    "{} won by an Innings and {} runs!",
                    teams.side(*side).name, margin
                )
            }
            MatchOutcome::Tied => "Match Tied!".to_string(),
        }
    }
}
