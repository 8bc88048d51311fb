use serde::{Deserialize, Serialize};

/// Legal deliveries that make up one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Over allowance per innings in the multi-innings format.
pub const MULTI_INNINGS_OVERS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    /// Two innings, one per side, with a caller-chosen over cap.
    Limited,
    /// An even number of alternating innings with a fixed over cap per innings.
    MultiInnings,
}

impl MatchFormat {
    pub fn label(&self) -> &'static str {
        match self {
            MatchFormat::Limited => "Limited Overs",
            MatchFormat::MultiInnings => "Multi-Innings",
        }
    }
}

/// Immutable rules a match is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub format: MatchFormat,
    pub overs_per_innings: u32,
    pub total_innings: u32,
    /// House rule: the last batter may bat on alone after the 10th wicket equivalent.
    #[serde(default)]
    pub last_man_standing: bool,
}

impl MatchConfig {
    pub fn limited(overs_per_innings: u32) -> Self {
        MatchConfig {
            format: MatchFormat::Limited,
            overs_per_innings,
            total_innings: 2,
            last_man_standing: false,
        }
    }

    pub fn multi_innings(total_innings: u32) -> Self {
        MatchConfig {
            format: MatchFormat::MultiInnings,
            overs_per_innings: MULTI_INNINGS_OVERS,
            total_innings,
            last_man_standing: false,
        }
    }

    pub fn with_last_man_standing(mut self) -> Self {
        self.last_man_standing = true;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        // A zero cap would end every innings before a ball is bowled
        if self.overs_per_innings == 0 {
            return Err("Overs per innings must be at least 1".to_string());
        }

        // Both sides must bat
        if self.total_innings < 2 {
            return Err(format!(
                "A match needs at least 2 innings, found {}",
                self.total_innings
            ));
        }

        match self.format {
            MatchFormat::Limited => {
                if self.total_innings != 2 {
                    return Err(format!(
                        "Limited-overs matches play exactly 2 innings, found {}",
                        self.total_innings
                    ));
                }
            }
            MatchFormat::MultiInnings => {
                // Sides alternate, so both bat the same number of times
                if self.total_innings % 2 != 0 {
                    return Err(format!(
                        "Total innings must be even, found {}",
                        self.total_innings
                    ));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_config_defaults() {
        let config = MatchConfig::limited(20);
        assert_eq!(config.format, MatchFormat::Limited);
        assert_eq!(config.overs_per_innings, 20);
        assert_eq!(config.total_innings, 2);
        assert!(!config.last_man_standing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multi_innings_uses_fixed_over_allowance() {
        let config = MatchConfig::multi_innings(4);
        assert_eq!(config.overs_per_innings, MULTI_INNINGS_OVERS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_last_man_standing_builder() {
        let config = MatchConfig::limited(10).with_last_man_standing();
        assert!(config.last_man_standing);
    }

    #[test]
    fn test_validation_rejects_zero_overs() {
        let config = MatchConfig::limited(0);
        let err = config.validate().unwrap_err();
        assert!(err.contains("at least 1"), "got: {}", err);
    }

    #[test]
    fn test_validation_rejects_odd_innings_count() {
        let config = MatchConfig::multi_innings(3);
        let err = config.validate().unwrap_err();
        assert!(err.contains("must be even"), "got: {}", err);

        let config = MatchConfig::multi_innings(0);
        assert!(config.validate().is_err());
    }
}
