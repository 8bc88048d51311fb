pub mod ball;
pub mod config;
pub mod innings;
pub mod match_result;
pub mod player;
pub mod report;
pub mod team;

pub use ball::{BallKind, BallRecord, BatterSlot, DismissalKind};
pub use config::{MatchConfig, MatchFormat, BALLS_PER_OVER, MULTI_INNINGS_OVERS};
pub use innings::InningsRecord;
pub use match_result::MatchOutcome;
pub use player::{PlayerStat, StatsLedger};
pub use report::{AwardLine, BattingRow, BowlingRow, InningsScorecard, MatchReport, PlayerTotals};
pub use team::{Team, TeamSide, Teams};
