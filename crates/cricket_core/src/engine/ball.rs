use super::{InningsPhase, MatchEngine, SelectionKind};
use crate::error::{MatchError, Result};
use crate::models::{BallKind, BallRecord, BatterSlot, DismissalKind, BALLS_PER_OVER};

impl MatchEngine {
    /// Common precondition for every scoring operation: no selection pending,
    /// the innings in progress, and both a striker and a bowler at work.
    /// Returns their names so callers can stop borrowing state.
    fn scoring_pair(&self) -> Result<(String, String)> {
        if self.state.match_over() {
            return Err(MatchError::ScoringBlocked("the match is over".to_string()));
        }
        if self.state.pending.is_some() {
            return Err(MatchError::ScoringBlocked(
                "a player selection is pending".to_string(),
            ));
        }
        if self.state.phase != InningsPhase::InProgress {
            return Err(MatchError::ScoringBlocked(
                "the innings is not in progress".to_string(),
            ));
        }
        match (&self.state.striker, &self.state.bowler) {
            (Some(striker), Some(bowler)) => Ok((striker.clone(), bowler.clone())),
            _ => Err(MatchError::ScoringBlocked(
                "select a striker and a bowler first".to_string(),
            )),
        }
    }

    /// Append one entry to the ball log and the current-over strip. Counters
    /// are captured before the delivery advances them, so the first ball of an
    /// over logs as ball 0.
    pub(crate) fn log_ball(&mut self, kind: BallKind, runs: u32, bowler: &str, striker: &str) {
        let record = BallRecord {
            innings: self.state.innings,
            over: self.state.overs,
            ball: self.state.balls_in_over,
            kind,
            runs,
            bowler: bowler.to_string(),
            striker: striker.to_string(),
        };
        self.state.over_log.push(record.tag());
        self.state.balls.push(record);
    }

    /// Count a legal delivery against the bowler and the over, rolling the
    /// over when this was the sixth.
    pub(crate) fn advance_ball(&mut self) {
        if let Some(bowler) = self.state.bowler.clone() {
            self.state.stats.player_mut(&bowler).balls_bowled += 1;
        }
        self.state.balls_in_over += 1;
        if self.state.balls_in_over >= BALLS_PER_OVER {
            self.end_over();
        }
    }

    /// In the final innings, reaching the target ends the match immediately,
    /// mid-over included.
    pub(crate) fn check_chase_win(&mut self) {
        if self.state.match_over() {
            return;
        }
        if let Some(target) = self.state.target {
            if self.state.innings == self.config.total_innings && self.state.score >= target {
                log::info!("target {} reached at {}/{}", target, self.state.score, self.state.wickets);
                self.complete_innings();
            }
        }
    }

    /// A legal delivery scored off the bat, 0 to 6 runs. Odd runs swap the
    /// striker; the ball counts toward the over and against the bowler.
    pub fn record_runs(&mut self, runs: u32) -> Result<()> {
        let (striker, bowler) = self.scoring_pair()?;
        if runs > 6 {
            return Err(MatchError::InvalidEvent(format!(
                "{} runs off a single ball",
                runs
            )));
        }
        self.push_undo();

        self.state.score += runs;
        {
            let stat = self.state.stats.player_mut(&striker);
            stat.add_bat_runs(runs);
            stat.balls_faced += 1;
        }
        self.state.stats.player_mut(&bowler).runs_conceded += runs;
        self.log_ball(BallKind::Runs, runs, &bowler, &striker);

        if runs % 2 == 1 {
            self.state.swap_ends();
        }
        self.advance_ball();
        self.check_chase_win();
        Ok(())
    }

    /// A wide: one penalty run plus any runs taken, all against the bowler
    /// and none to the striker. Not a legal delivery, so the over and the
    /// striker's balls faced stay put, and nobody changes ends.
    pub fn record_wide(&mut self, extra_runs: u32) -> Result<()> {
        let (striker, bowler) = self.scoring_pair()?;
        if extra_runs > 6 {
            return Err(MatchError::InvalidEvent(format!(
                "{} extra runs off a wide",
                extra_runs
            )));
        }
        self.push_undo();

        let total = 1 + extra_runs;
        self.state.score += total;
        self.state.stats.player_mut(&bowler).runs_conceded += total;
        self.log_ball(BallKind::Wide, total, &bowler, &striker);

        self.check_chase_win();
        Ok(())
    }

    /// A no-ball: one penalty run, plus any runs which go to the striker off
    /// the bat. The striker faces the ball (exactly one ball faced) and odd
    /// bat runs swap the ends, but the over does not advance.
    pub fn record_no_ball(&mut self, bat_runs: u32) -> Result<()> {
        let (striker, bowler) = self.scoring_pair()?;
        if bat_runs > 6 {
            return Err(MatchError::InvalidEvent(format!(
                "{} runs off a no-ball",
                bat_runs
            )));
        }
        self.push_undo();

        let total = 1 + bat_runs;
        self.state.score += total;
        self.state.stats.player_mut(&bowler).runs_conceded += total;
        {
            let stat = self.state.stats.player_mut(&striker);
            stat.add_bat_runs(bat_runs);
            stat.balls_faced += 1;
        }
        self.log_ball(BallKind::NoBall, total, &bowler, &striker);

        if bat_runs % 2 == 1 {
            self.state.swap_ends();
        }
        self.check_chase_win();
        Ok(())
    }

    /// Byes: 1 to 4 runs the batters ran without bat contact. A legal
    /// delivery the striker faces, but no runs against the bowler.
    pub fn record_byes(&mut self, byes: u32) -> Result<()> {
        let (striker, bowler) = self.scoring_pair()?;
        if !(1..=4).contains(&byes) {
            return Err(MatchError::InvalidEvent(format!(
                "byes must be 1 to 4, got {}",
                byes
            )));
        }
        self.push_undo();

        self.state.score += byes;
        self.state.stats.player_mut(&striker).balls_faced += 1;
        self.log_ball(BallKind::Bye, byes, &bowler, &striker);

        if byes % 2 == 1 {
            self.state.swap_ends();
        }
        self.advance_ball();
        self.check_chase_win();
        Ok(())
    }

    /// A wicket on a legal delivery. Kinds that need a fielder suspend into
    /// the fielder gate and apply when it resolves; the rest apply at once.
    /// Undo reverts to before the dismissal was entered either way.
    pub fn record_wicket(&mut self, kind: DismissalKind, who: BatterSlot) -> Result<()> {
        self.scoring_pair()?;
        let occupied = match who {
            BatterSlot::Striker => self.state.striker.is_some(),
            BatterSlot::NonStriker => self.state.non_striker.is_some(),
        };
        if !occupied {
            return Err(MatchError::InvalidEvent("no batter at that end".to_string()));
        }
        self.push_undo();

        if kind.needs_fielder() {
            self.open_selection(SelectionKind::Fielder {
                dismissal: kind,
                out: who,
            });
            return Ok(());
        }
        self.apply_wicket(kind, who, None)
    }
}

// ============================================================================
// Tests
// ============================================================================
