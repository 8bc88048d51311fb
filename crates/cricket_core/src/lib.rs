//! # cricket_core - Ball-by-Ball Cricket Match Scoring Engine
//!
//! This library keeps the complete state of a cricket match as it is scored
//! ball by ball, from the opening player selections through to the final
//! result and the match report.
//!
//! ## Features
//! - Limited-overs and multi-innings formats, including last-man-standing rules
//! - Strike rotation, extras, dismissals and player selection gates enforced
//!   the way a scorebook enforces them
//! - Bounded undo of whole scoring actions
//! - Compressed, checksummed snapshots for save and resume

pub mod engine;
pub mod error;
pub mod models;
pub mod save;

// Re-export the engine surface
pub use engine::{
    InningsPhase, MatchEngine, MatchState, PendingSelection, SelectionKind, UndoLog, UNDO_CAPACITY,
};
pub use error::{MatchError, Result};

// Re-export the core model types
pub use models::{
    BallKind, BallRecord, BatterSlot, DismissalKind, InningsRecord, MatchConfig, MatchFormat,
    MatchOutcome, MatchReport, PlayerStat, StatsLedger, Team, TeamSide, Teams, BALLS_PER_OVER,
};

// Re-export the save system
pub use save::{MatchSnapshot, SaveError, SaveManager, SnapshotInfo, SNAPSHOT_VERSION};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
