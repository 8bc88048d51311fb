use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which of the two sides a team occupies for the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }

    /// Short label used in log lines and summaries.
    pub fn label(self) -> &'static str {
        match self {
            TeamSide::A => "A",
            TeamSide::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<String>, // batting order as entered at setup
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<String>) -> Self {
        Team {
            name: name.into(),
            players,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        // Team needs a display name
        if self.name.trim().is_empty() {
            return Err("Team name must not be empty".to_string());
        }

        // Two batters must be able to open together
        if self.players.len() < 2 {
            return Err(format!(
                "Team {} must have at least 2 players, found {}",
                self.name,
                self.players.len()
            ));
        }

        // Player names key the stats ledger, so they must be unique and non-empty
        let mut seen = BTreeSet::new();
        for player in &self.players {
            if player.trim().is_empty() {
                return Err(format!("Team {} has a player with an empty name", self.name));
            }
            if !seen.insert(player.as_str()) {
                return Err(format!(
                    "Duplicate player name in team {}: {}",
                    self.name, player
                ));
            }
        }

        Ok(())
    }

    pub fn roster_size(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }
}

/// The two rosters of a match, addressed by [`TeamSide`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    pub a: Team,
    pub b: Team,
}

impl Teams {
    pub fn new(a: Team, b: Team) -> Self {
        Teams { a, b }
    }

    pub fn side(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.a,
            TeamSide::B => &self.b,
        }
    }

    pub fn side_of(&self, player: &str) -> Option<TeamSide> {
        if self.a.has_player(player) {
            Some(TeamSide::A)
        } else if self.b.has_player(player) {
            Some(TeamSide::B)
        } else {
            None
        }
    }

    pub fn all_players(&self) -> impl Iterator<Item = &String> {
        self.a.players.iter().chain(self.b.players.iter())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.a.validate()?;
        self.b.validate()?;

        // Names key the shared stats ledger, so they must be unique across teams too
        for player in &self.a.players {
            if self.b.has_player(player) {
                return Err(format!("Player {} appears in both teams", player));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
