use super::MatchEngine;
use crate::models::BALLS_PER_OVER;

/// Read-only figures derived from live state. Nothing in here is stored;
/// every value is recomputed from the scoreboard and the innings records.
impl MatchEngine {
    pub fn striker(&self) -> Option<&str> {
        self.state.striker.as_deref()
    }

    pub fn non_striker(&self) -> Option<&str> {
        self.state.non_striker.as_deref()
    }

    pub fn bowler(&self) -> Option<&str> {
        self.state.bowler.as_deref()
    }

    /// Display tags of the current over so far.
    pub fn current_over(&self) -> &[String] {
        &self.state.over_log
    }

    pub fn target(&self) -> Option<u32> {
        self.state.target
    }

    /// Overs bowled in `O.B` form, e.g. `14.2`.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.state.overs, self.state.balls_in_over)
    }

    /// Scoreline shorthand for the live innings, e.g. `124/3 (14.2)`.
    pub fn scoreline(&self) -> String {
        format!(
            "{}/{} ({})",
            self.state.score,
            self.state.wickets,
            self.overs_display()
        )
    }

    /// Runs per over so far; 0 before the first legal ball.
    pub fn current_run_rate(&self) -> f64 {
        let balls = self.state.legal_balls_bowled();
        if balls == 0 {
            0.0
        } else {
            self.state.score as f64 / balls as f64 * BALLS_PER_OVER as f64
        }
    }

    /// Runs still needed to win; clamped at zero once the target is passed.
    /// `None` outside a chase.
    pub fn runs_needed(&self) -> Option<u32> {
        self.state
            .target
            .map(|target| target.saturating_sub(self.state.score))
    }

    /// Legal balls left in the innings under the over cap.
    pub fn balls_remaining(&self) -> u32 {
        (self.config.overs_per_innings * BALLS_PER_OVER)
            .saturating_sub(self.state.legal_balls_bowled())
    }

    /// Runs per over the chase still demands. `None` when there is no live
    /// target, nothing is needed, or no balls remain.
    pub fn required_run_rate(&self) -> Option<f64> {
        let target = self.state.target?;
        let needed = target.saturating_sub(self.state.score);
        let remaining = self.balls_remaining();
        if needed == 0 || remaining == 0 {
            return None;
        }
        Some(needed as f64 / remaining as f64 * BALLS_PER_OVER as f64)
    }

    /// Batting side's aggregate lead over the other side, live innings
    /// included. Negative when trailing.
    pub fn lead(&self) -> i64 {
        let batting = self.state.batting_side;
        let mut ours = self.state.completed_runs(batting) as i64;
        if !self.state.match_over() {
            ours += self.state.score as i64;
        }
        let theirs = self.state.completed_runs(batting.opposite()) as i64;
        ours - theirs
    }

    /// The lead as scoreboard text: `Lead by 23`, `Trail by 5` or
    /// `Scores Level`.
    pub fn lead_text(&self) -> String {
        let lead = self.lead();
        if lead > 0 {
            format!("Lead by {}", lead)
        } else if lead < 0 {
            format!("Trail by {}", -lead)
        } else {
            "Scores Level".to_string()
        }
    }

    /// The announcement line once the match is over.
    pub fn result_text(&self) -> Option<String> {
        self.state
            .result
            .as_ref()
            .map(|outcome| outcome.describe(&self.teams))
    }

    pub fn batting_team_name(&self) -> &str {
        &self.teams.side(self.state.batting_side).name
    }

    pub fn bowling_team_name(&self) -> &str {
        &self.teams.side(self.state.batting_side.opposite()).name
    }

    /// The whole live state as pretty JSON, for frontends and debugging.
    pub fn state_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(&self.state)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
