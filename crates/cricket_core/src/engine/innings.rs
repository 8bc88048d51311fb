use super::{InningsPhase, MatchEngine, SelectionKind};
use crate::error::{MatchError, Result};
use crate::models::{BallKind, BatterSlot, DismissalKind, BALLS_PER_OVER};

impl MatchEngine {
    /// Roll the over: reset the counters, swap the ends, then either close
    /// the innings at the over limit or ask for the next bowler.
    pub(crate) fn end_over(&mut self) {
        self.state.overs += 1;
        self.state.balls_in_over = 0;
        self.state.over_log.clear();
        self.state.swap_ends();
        log::debug!("over {} complete", self.state.overs);

        if self.state.overs >= self.config.overs_per_innings {
            self.complete_innings();
        } else {
            self.state.bowler = None;
            self.state.phase = InningsPhase::AwaitingNewBowler;
            self.open_selection(SelectionKind::NewBowler);
        }
    }

    /// Apply a confirmed dismissal: ledger entries, crediting, the ball log,
    /// then whichever follows from the wicket count: all out, a lone survivor
    /// under the house rule, or the new-batter gate.
    pub(crate) fn apply_wicket(
        &mut self,
        kind: DismissalKind,
        who: BatterSlot,
        fielder: Option<String>,
    ) -> Result<()> {
        let bowler = match &self.state.bowler {
            Some(bowler) => bowler.clone(),
            None => {
                return Err(MatchError::ScoringBlocked(
                    "no bowler on record".to_string(),
                ))
            }
        };
        let out_name = match who {
            BatterSlot::Striker => self.state.striker.clone(),
            BatterSlot::NonStriker => self.state.non_striker.clone(),
        }
        .ok_or_else(|| MatchError::InvalidEvent("no batter at that end".to_string()))?;

        let text = kind.describe(&bowler, fielder.as_deref());
        log::info!("wicket: {} {}", out_name, text);
        {
            let stat = self.state.stats.player_mut(&out_name);
            stat.out = true;
            stat.how_out = Some(text);
            stat.balls_faced += 1;
        }
        if let Some(fielder) = &fielder {
            match kind {
                DismissalKind::Caught => self.state.stats.player_mut(fielder).catches += 1,
                DismissalKind::RunOut => self.state.stats.player_mut(fielder).run_outs += 1,
                _ => {}
            }
        }
        if kind.credits_bowler() {
            self.state.stats.player_mut(&bowler).wickets += 1;
        }

        self.state.wickets += 1;
        // log against the striker who faced the delivery, before any vacating
        let facing = self
            .state
            .striker
            .clone()
            .unwrap_or_else(|| out_name.clone());
        self.log_ball(BallKind::Wicket, 0, &bowler, &facing);

        // the dismissed batter leaves the crease before any end-of-over swap
        match who {
            BatterSlot::Striker => self.state.striker = None,
            BatterSlot::NonStriker => self.state.non_striker = None,
        }

        let roster = self.teams.side(self.state.batting_side).roster_size() as u32;
        let allowed = if self.config.last_man_standing {
            roster
        } else {
            roster - 1
        };

        if self.state.wickets >= allowed {
            // the dismissing delivery still counts, but the innings is over:
            // no strike swap, no over strip reset, no bowler gate
            self.state.stats.player_mut(&bowler).balls_bowled += 1;
            self.state.balls_in_over += 1;
            if self.state.balls_in_over >= BALLS_PER_OVER {
                self.state.overs += 1;
                self.state.balls_in_over = 0;
            }
            log::info!("all out at {}/{}", self.state.score, self.state.wickets);
            self.complete_innings();
            return Ok(());
        }

        let innings_before = self.state.innings;
        self.advance_ball();
        // the over limit may have closed the innings on this very delivery
        if self.state.match_over() || self.state.innings != innings_before {
            return Ok(());
        }

        if self.config.last_man_standing && self.state.wickets == roster - 1 {
            // lone survivor: whoever is left keeps the strike from here on,
            // and any bowler gate opened by an over change stays pending
            let survivor = self
                .state
                .striker
                .take()
                .or_else(|| self.state.non_striker.take());
            log::info!(
                "{} bats on alone",
                survivor.as_deref().unwrap_or("nobody")
            );
            self.state.striker = survivor;
            self.state.non_striker = None;
            return Ok(());
        }

        // replacement batter first; a bowler owed by an over change runs second
        self.state.phase = InningsPhase::AwaitingNewBatsman;
        self.open_selection(SelectionKind::NewBatter);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfig, Team, Teams};

    fn teams() -> Teams {
        Teams::new(
            Team::new(
                "Ashton CC",
                vec!["Asha".to_string(), "Ben".to_string(), "Caro".to_string()],
            ),
            Team::new(
                "Birch XI",
                vec!["Dev".to_string(), "Esme".to_string(), "Farid".to_string()],
            ),
        )
    }

    fn ready_engine(config: MatchConfig) -> MatchEngine {
        let mut engine = MatchEngine::new(teams(), config).unwrap();
        engine.resolve_selection("Asha").unwrap();
        engine.resolve_selection("Ben").unwrap();
        engine.resolve_selection("Dev").unwrap();
        engine
    }

    #[test]
    fn test_over_completes_after_six_legal_balls() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        for _ in 0..6 {
            engine.record_runs(0).unwrap();
        }

        let state = engine.state();
        assert_eq!(state.overs, 1);
        assert_eq!(state.balls_in_over, 0);
        assert!(state.over_log.is_empty());
        // the batters changed ends for the new over
        assert_eq!(state.striker.as_deref(), Some("Ben"));
        assert_eq!(state.non_striker.as_deref(), Some("Asha"));
        // and the next over needs a bowler
        assert_eq!(state.bowler, None);
        assert_eq!(state.phase, InningsPhase::AwaitingNewBowler);
        let pending = engine.pending_selection().unwrap();
        assert_eq!(pending.kind, SelectionKind::NewBowler);
        assert_eq!(pending.eligible, vec!["Dev", "Esme", "Farid"]);
    }

    #[test]
    fn test_illegal_deliveries_do_not_advance_the_over() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        for _ in 0..5 {
            engine.record_runs(0).unwrap();
        }
        engine.record_wide(0).unwrap();
        engine.record_no_ball(0).unwrap();
        assert_eq!(engine.state().overs, 0);
        assert_eq!(engine.state().balls_in_over, 5);

        engine.record_runs(0).unwrap();
        assert_eq!(engine.state().overs, 1);
    }

    #[test]
    fn test_new_bowler_resumes_play() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        for _ in 0..6 {
            engine.record_runs(0).unwrap();
        }
        engine.resolve_selection("Esme").unwrap();

        assert_eq!(engine.state().phase, InningsPhase::InProgress);
        assert_eq!(engine.state().bowler.as_deref(), Some("Esme"));

        engine.record_runs(1).unwrap();
        assert_eq!(engine.state().stats.player("Esme").unwrap().balls_bowled, 1);
        assert_eq!(engine.state().stats.player("Esme").unwrap().runs_conceded, 1);
    }

    #[test]
    fn test_all_out_closes_the_innings() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // 2 wickets from a roster of 3 is all out
        let state = engine.state();
        assert_eq!(state.records.len(), 1);
        let record = &state.records[0];
        assert_eq!(record.wickets, 2);
        assert_eq!(record.overs, "0.2");
        // the match has moved on to the second innings
        assert_eq!(state.innings, 2);
        assert_eq!(state.phase, InningsPhase::AwaitingOpeners);
        assert_eq!(state.score, 0);

        // a further wicket event has nothing to act on
        let err = engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap_err();
        assert!(matches!(err, MatchError::ScoringBlocked(_)));
    }

    #[test]
    fn test_all_out_on_sixth_ball_rolls_the_over_quietly() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        for _ in 0..4 {
            engine.record_runs(0).unwrap();
        }
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // the dismissing sixth ball completed the over on the way out
        assert_eq!(engine.state().records[0].overs, "1.0");
        assert_eq!(engine.state().innings, 2);
    }

    #[test]
    fn test_wicket_on_final_ball_gates_batter_then_bowler() {
        let mut engine = ready_engine(MatchConfig::limited(5));
        for _ in 0..5 {
            engine.record_runs(0).unwrap();
        }
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // over rolled, but the replacement batter is asked for first
        assert_eq!(engine.state().overs, 1);
        assert_eq!(engine.state().phase, InningsPhase::AwaitingNewBatsman);
        let pending = engine.pending_selection().unwrap();
        assert_eq!(pending.kind, SelectionKind::NewBatter);

        engine.resolve_selection("Caro").unwrap();
        // only now is the owed bowler asked for
        assert_eq!(engine.state().phase, InningsPhase::AwaitingNewBowler);
        let pending = engine.pending_selection().unwrap();
        assert_eq!(pending.kind, SelectionKind::NewBowler);

        engine.resolve_selection("Esme").unwrap();
        assert_eq!(engine.state().phase, InningsPhase::InProgress);
        // Ben crossed at the over change and keeps the strike
        assert_eq!(engine.state().striker.as_deref(), Some("Ben"));
        assert_eq!(engine.state().non_striker.as_deref(), Some("Caro"));
    }

    #[test]
    fn test_last_man_standing_sole_survivor() {
        let mut engine = ready_engine(MatchConfig::limited(5).with_last_man_standing());
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // two down out of three: Ben bats on alone, no batter gate
        let state = engine.state();
        assert_eq!(state.striker.as_deref(), Some("Ben"));
        assert_eq!(state.non_striker, None);
        assert_eq!(state.phase, InningsPhase::InProgress);
        assert!(engine.pending_selection().is_none());

        // a wicket at the vacant end is rejected
        let err = engine
            .record_wicket(DismissalKind::RunOut, BatterSlot::NonStriker)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidEvent(_)));
    }

    #[test]
    fn test_lone_batter_keeps_strike_through_over_changes() {
        let mut engine = ready_engine(MatchConfig::limited(5).with_last_man_standing());
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // finish the over: two wickets used two balls already
        for _ in 0..4 {
            engine.record_runs(0).unwrap();
        }
        assert_eq!(engine.state().overs, 1);
        engine.resolve_selection("Esme").unwrap();

        // no partner to swap with
        assert_eq!(engine.state().striker.as_deref(), Some("Ben"));
        assert_eq!(engine.state().non_striker, None);

        // odd runs have nobody to swap with either
        engine.record_runs(1).unwrap();
        assert_eq!(engine.state().striker.as_deref(), Some("Ben"));
    }

    #[test]
    fn test_last_man_standing_plays_until_the_full_roster_falls() {
        let mut engine = ready_engine(MatchConfig::limited(5).with_last_man_standing());
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        assert!(engine.state().records.is_empty());

        // the third wicket of three ends it
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        assert_eq!(engine.state().records.len(), 1);
        assert_eq!(engine.state().records[0].wickets, 3);
        assert_eq!(engine.state().innings, 2);
    }

    #[test]
    fn test_wicket_on_sole_survivor_under_over_change() {
        // survivor appears on the last ball of an over: the owed bowler gate
        // must survive the transition
        let mut engine = ready_engine(MatchConfig::limited(5).with_last_man_standing());
        for _ in 0..4 {
            engine.record_runs(0).unwrap();
        }
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();
        engine.resolve_selection("Caro").unwrap();
        engine
            .record_wicket(DismissalKind::Bowled, BatterSlot::Striker)
            .unwrap();

        // over rolled on the dismissal; Ben is alone but a bowler is owed
        let state = engine.state();
        assert_eq!(state.overs, 1);
        assert_eq!(state.striker.as_deref(), Some("Ben"));
        assert_eq!(state.non_striker, None);
        assert_eq!(state.phase, InningsPhase::AwaitingNewBowler);
        let pending = engine.pending_selection().unwrap();
        assert_eq!(pending.kind, SelectionKind::NewBowler);

        engine.resolve_selection("Farid").unwrap();
        assert_eq!(engine.state().phase, InningsPhase::InProgress);
        engine.record_runs(2).unwrap();
        assert_eq!(engine.state().score, 2);
    }
}
