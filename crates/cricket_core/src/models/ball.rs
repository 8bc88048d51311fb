use serde::{Deserialize, Serialize};

/// What kind of delivery (or dismissal) a ball log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallKind {
    /// A legal delivery scored off the bat, 0 to 6 runs.
    Runs,
    /// Illegal delivery: 1 penalty plus any runs taken, all against the bowler.
    Wide,
    /// Illegal delivery: 1 penalty plus any runs off the bat.
    NoBall,
    /// Legal delivery the batters ran on without bat contact, 1 to 4 runs.
    Bye,
    /// A legal delivery on which a batter was dismissed.
    Wicket,
}

impl BallKind {
    /// Wides and no-balls do not count toward the over.
    pub fn is_legal_delivery(&self) -> bool {
        matches!(self, BallKind::Runs | BallKind::Bye | BallKind::Wicket)
    }
}

/// One entry of the ball-by-ball log.
///
/// `over` and `ball` hold the over counters as they stood when the delivery was
/// bowled, so the first ball of the match is recorded as over 0, ball 0.
/// Display text is always derived from `kind` and `runs` via [`BallRecord::tag`],
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    pub innings: u32,
    pub over: u32,
    pub ball: u32,
    pub kind: BallKind,
    /// Total runs the delivery added to the team score.
    pub runs: u32,
    pub bowler: String,
    pub striker: String,
}

impl BallRecord {
    /// Scoreboard shorthand for the over strip: `0`..`6`, `WD`, `WD+2`, `NB`,
    /// `NB+4`, `B1`..`B4`, `W`.
    pub fn tag(&self) -> String {
        match self.kind {
            BallKind::Runs => self.runs.to_string(),
            BallKind::Wide => {
                if self.runs > 1 {
                    format!("WD+{}", self.runs - 1)
                } else {
                    "WD".to_string()
                }
            }
            BallKind::NoBall => {
                if self.runs > 1 {
                    format!("NB+{}", self.runs - 1)
                } else {
                    "NB".to_string()
                }
            }
            BallKind::Bye => format!("B{}", self.runs),
            BallKind::Wicket => "W".to_string(),
        }
    }
}

/// Which crease slot a batter occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatterSlot {
    Striker,
    NonStriker,
}

/// How a batter got out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum DismissalKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    /// Catch-all for handled-the-ball, retired out and similar rarities.
    Other,
}

impl DismissalKind {
    /// Caught and run-out need a fielder named before the wicket can be applied.
    pub fn needs_fielder(&self) -> bool {
        matches!(self, DismissalKind::Caught | DismissalKind::RunOut)
    }

    /// Run-outs are the one kind that never goes into the bowler's column.
    pub fn credits_bowler(&self) -> bool {
        !matches!(self, DismissalKind::RunOut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DismissalKind::Bowled => "Bowled",
            DismissalKind::Caught => "Caught",
            DismissalKind::Lbw => "LBW",
            DismissalKind::RunOut => "Run Out",
            DismissalKind::Stumped => "Stumped",
            DismissalKind::Other => "Other",
        }
    }

    /// Scorecard dismissal text. The fielder is supplied by the selection gate
    /// for the kinds that need one.
    pub fn describe(&self, bowler: &str, fielder: Option<&str>) -> String {
        match (self, fielder) {
            (DismissalKind::Caught, Some(f)) => format!("c {} b {}", f, bowler),
            (DismissalKind::Caught, None) => format!("c b {}", bowler),
            (DismissalKind::RunOut, Some(f)) => format!("run out ({})", f),
            (DismissalKind::RunOut, None) => "run out".to_string(),
            (DismissalKind::Bowled, _) => format!("b {}", bowler),
            (DismissalKind::Lbw, _) => format!("lbw b {}", bowler),
            (DismissalKind::Stumped, _) => format!("st b {}", bowler),
            (DismissalKind::Other, _) => "out".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
