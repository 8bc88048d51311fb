use super::{InningsPhase, MatchEngine, SelectionKind};
use crate::error::{MatchError, Result};
use crate::models::{InningsRecord, MatchFormat, MatchOutcome, TeamSide};

/// Insert a completed innings record, replacing any earlier record with the
/// same innings number so a repeated close can never duplicate.
fn upsert_record(records: &mut Vec<InningsRecord>, record: InningsRecord) {
    if let Some(existing) = records.iter_mut().find(|r| r.number == record.number) {
        *existing = record;
    } else {
        records.push(record);
    }
}

impl MatchEngine {
    /// Open an innings: fresh per-innings ledger, then the opening-striker gate.
    pub(crate) fn start_innings(&mut self) {
        self.state.stats.reset_all_for_innings();
        self.state.phase = InningsPhase::AwaitingOpeners;
        log::info!(
            "innings {}: side {} ({}) to bat",
            self.state.innings,
            self.state.batting_side.label(),
            self.teams.side(self.state.batting_side).name
        );
        self.open_selection(SelectionKind::OpeningStriker);
    }

    /// Close the current innings: freeze its record, then either advance to
    /// the next innings (setting the chase target ahead of a final innings)
    /// or settle the match.
    pub(crate) fn complete_innings(&mut self) {
        let number = self.state.innings;
        let record = InningsRecord {
            number,
            batting_side: self.state.batting_side,
            score: self.state.score,
            wickets: self.state.wickets,
            overs: format!("{}.{}", self.state.overs, self.state.balls_in_over),
            declared: std::mem::take(&mut self.state.declared),
            stats: self.state.stats.clone(),
            balls: self
                .state
                .balls
                .iter()
                .filter(|b| b.innings == number)
                .cloned()
                .collect(),
        };
        log::info!("innings {} closed: {}", number, record.scoreline());
        upsert_record(&mut self.state.records, record);

        if self.state.innings < self.config.total_innings {
            self.advance_innings();
        } else {
            self.conclude_match();
        }
    }

    fn advance_innings(&mut self) {
        self.state.innings += 1;
        std::mem::swap(&mut self.state.batting_side, &mut self.state.bowling_side);
        self.state.score = 0;
        self.state.wickets = 0;
        self.state.overs = 0;
        self.state.balls_in_over = 0;
        self.state.over_log.clear();
        self.state.striker = None;
        self.state.non_striker = None;
        self.state.bowler = None;
        self.state.target = None;
        self.state.pending = None;

        if self.state.innings == self.config.total_innings {
            let chasing = self.state.completed_runs(self.state.batting_side);
            let defending = self.state.completed_runs(self.state.bowling_side);
            if chasing > defending {
                // the side due to bat last already leads with an innings in hand
                let outcome = MatchOutcome::WonByInnings {
                    side: self.state.batting_side,
                    margin: chasing - defending,
                };
                log::info!("match over early: {}", outcome.describe(&self.teams));
                self.state.result = Some(outcome);
                self.state.phase = InningsPhase::Completed;
                return;
            }
            // one more than the shortfall, so level scores still need a run
            self.state.target = Some(defending - chasing + 1);
        }

        self.start_innings();
    }

    /// Settle the match from the completed records after the last innings.
    fn conclude_match(&mut self) {
        let total_a = self.state.completed_runs(TeamSide::A);
        let total_b = self.state.completed_runs(TeamSide::B);

        let outcome = if total_a == total_b {
            MatchOutcome::Tied
        } else {
            let winner = if total_a > total_b {
                TeamSide::A
            } else {
                TeamSide::B
            };
            let margin = total_a.abs_diff(total_b);
            let last = self.state.records.last();
            let winner_batted_last = last.map(|r| r.batting_side == winner).unwrap_or(false);
            if winner_batted_last {
                // a successful chase is framed by wickets in hand
                let roster = self.teams.side(winner).roster_size() as u32;
                let wickets_lost = last.map(|r| r.wickets).unwrap_or(0);
                MatchOutcome::WonByWickets {
                    side: winner,
                    margin: (roster - 1).saturating_sub(wickets_lost),
                }
            } else {
                MatchOutcome::WonByRuns {
                    side: winner,
                    margin,
                }
            }
        };

        log::info!("match over: {}", outcome.describe(&self.teams));
        self.state.result = Some(outcome);
        self.state.phase = InningsPhase::Completed;
        self.state.pending = None;
    }

    /// Close the batting side's innings voluntarily. Multi-innings only.
    pub fn declare(&mut self) -> Result<()> {
        if self.config.format != MatchFormat::MultiInnings {
            return Err(MatchError::InvalidEvent(
                "declarations are only available in multi-innings matches".to_string(),
            ));
        }
        if self.state.match_over() {
            return Err(MatchError::ScoringBlocked("the match is over".to_string()));
        }
        log::info!(
            "innings {} declared at {}/{}",
            self.state.innings,
            self.state.score,
            self.state.wickets
        );
        self.state.declared = true;
        self.complete_innings();
        Ok(())
    }

    /// Force the current innings closed, any format.
    pub fn end_innings_early(&mut self) -> Result<()> {
        if self.state.match_over() {
            return Err(MatchError::ScoringBlocked("the match is over".to_string()));
        }
        self.complete_innings();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchConfig, StatsLedger, Team, Teams};

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

    fn resolve_openers(engine: &mut MatchEngine, striker: &str, non_striker: &str, bowler: &str) {
        engine.resolve_selection(striker).unwrap();
        engine.resolve_selection(non_striker).unwrap();
        engine.resolve_selection(bowler).unwrap();
    }

    fn bare_record(number: u32, score: u32) -> InningsRecord {
        InningsRecord {
            number,
            batting_side: TeamSide::A,
            score,
            wickets: 0,
            overs: "1.0".to_string(),
            declared: false,
            stats: StatsLedger::new(),
            balls: Vec::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_same_innings_number() {
        let mut records = Vec::new();
        upsert_record(&mut records, bare_record(1, 50));
        upsert_record(&mut records, bare_record(2, 30));
        upsert_record(&mut records, bare_record(1, 55));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 55);
        assert_eq!(records[1].score, 30);
    }

    #[test]
    fn test_innings_transition_resets_the_scoreboard() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(1)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        for _ in 0..6 {
            engine.record_runs(1).unwrap();
        }

        let state = engine.state();
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].score, 6);
        assert_eq!(state.records[0].overs, "1.0");
        assert_eq!(state.records[0].batting_side, TeamSide::A);
        // the frozen ledger keeps the innings figures
        assert!(state.records[0].stats.player("Asha").unwrap().runs > 0);

        // live scoreboard is fresh for the second innings
        assert_eq!(state.innings, 2);
        assert_eq!(state.batting_side, TeamSide::B);
        assert_eq!(state.score, 0);
        assert_eq!(state.wickets, 0);
        assert_eq!(state.overs, 0);
        assert_eq!(state.striker, None);
        assert_eq!(state.stats.player("Asha").unwrap().runs, 0);
        assert_eq!(state.phase, InningsPhase::AwaitingOpeners);
        assert_eq!(state.target, Some(7));

        let pending = engine.pending_selection().unwrap();
        assert_eq!(pending.kind, SelectionKind::OpeningStriker);
        assert_eq!(pending.eligible, vec!["Dev", "Esme", "Farid"]);
    }

    #[test]
    fn test_final_innings_target_uses_aggregates() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::multi_innings(4)).unwrap();

        // innings 1: Ashton 3
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(2).unwrap();
        engine.record_runs(1).unwrap();
        engine.end_innings_early().unwrap();

        // innings 2: Birch 1
        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        engine.record_runs(1).unwrap();
        engine.end_innings_early().unwrap();

        // innings 3: Ashton 2 more, 5 in total
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(2).unwrap();
        engine.end_innings_early().unwrap();

        // Birch needs the shortfall plus one
        assert_eq!(engine.state().innings, 4);
        assert_eq!(engine.state().target, Some(5));
    }

    #[test]
    fn test_chase_win_ends_the_match_mid_over() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(2)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(4).unwrap();
        engine.end_innings_early().unwrap();

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        assert_eq!(engine.state().target, Some(5));
        engine.record_runs(6).unwrap();

        assert!(engine.match_over());
        assert_eq!(engine.state().phase, InningsPhase::Completed);
        assert_eq!(
            engine.result(),
            Some(&MatchOutcome::WonByWickets {
                side: TeamSide::B,
                margin: 2
            })
        );
        assert_eq!(
            engine.result().unwrap().describe(engine.teams()),
            "Birch XI won by 2 wickets!"
        );

        // no further scoring is accepted
        let err = engine.record_runs(1).unwrap_err();
        assert!(matches!(err, MatchError::ScoringBlocked(_)));
    }

    #[test]
    fn test_defending_side_wins_by_runs() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(1)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        for _ in 0..6 {
            engine.record_runs(4).unwrap();
        }

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        for _ in 0..6 {
            engine.record_runs(0).unwrap();
        }

        assert_eq!(
            engine.result(),
            Some(&MatchOutcome::WonByRuns {
                side: TeamSide::A,
                margin: 24
            })
        );
        assert_eq!(
            engine.result().unwrap().describe(engine.teams()),
            "Ashton CC won by 24 runs!"
        );
    }

    #[test]
    fn test_level_scores_tie_the_match() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(1)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        for _ in 0..6 {
            engine.record_runs(1).unwrap();
        }

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        engine.record_runs(6).unwrap();
        for _ in 0..5 {
            engine.record_runs(0).unwrap();
        }

        assert_eq!(engine.result(), Some(&MatchOutcome::Tied));
        assert_eq!(
            engine.result().unwrap().describe(engine.teams()),
            "Match Tied!"
        );
    }

    #[test]
    fn test_early_finish_by_an_innings() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::multi_innings(4)).unwrap();

        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(2).unwrap();
        engine.end_innings_early().unwrap();

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        engine.record_runs(4).unwrap();
        engine.record_runs(6).unwrap();
        engine.end_innings_early().unwrap();

        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(1).unwrap();
        engine.end_innings_early().unwrap();

        // Birch lead 10 to 3 with an innings in hand: no fourth innings
        assert!(engine.match_over());
        assert_eq!(engine.state().records.len(), 3);
        assert!(engine.pending_selection().is_none());
        assert_eq!(
            engine.result(),
            Some(&MatchOutcome::WonByInnings {
                side: TeamSide::B,
                margin: 7
            })
        );
        assert_eq!(
            engine.result().unwrap().describe(engine.teams()),
            "Birch XI won by an Innings and 7 runs!"
        );
    }

    #[test]
    fn test_declaration_requires_multi_innings() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(5)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        let err = engine.declare().unwrap_err();
        assert!(matches!(err, MatchError::InvalidEvent(_)));

        let mut engine = MatchEngine::new(teams(), MatchConfig::multi_innings(4)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(4).unwrap();
        engine.declare().unwrap();

        assert!(engine.state().records[0].declared);
        // the flag does not leak into the next innings
        assert!(!engine.state().declared);
        assert_eq!(engine.state().innings, 2);
    }

    #[test]
    fn test_force_end_closes_innings_in_any_format() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(5)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        engine.record_runs(1).unwrap();
        engine.end_innings_early().unwrap();
        assert_eq!(engine.state().innings, 2);

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        engine.end_innings_early().unwrap();

        assert_eq!(
            engine.result(),
            Some(&MatchOutcome::WonByRuns {
                side: TeamSide::A,
                margin: 1
            })
        );
        // once the match is settled another force-end is refused
        assert!(matches!(
            engine.end_innings_early(),
            Err(MatchError::ScoringBlocked(_))
        ));
    }

    #[test]
    fn test_records_capture_only_their_innings_balls() {
        let mut engine = MatchEngine::new(teams(), MatchConfig::limited(1)).unwrap();
        resolve_openers(&mut engine, "Asha", "Ben", "Dev");
        for _ in 0..6 {
            engine.record_runs(1).unwrap();
        }

        resolve_openers(&mut engine, "Dev", "Esme", "Asha");
        engine.record_wide(0).unwrap();
        engine.record_wide(0).unwrap();
        for _ in 0..6 {
            engine.record_runs(0).unwrap();
        }

        let records = &engine.state().records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].balls.len(), 6);
        assert!(records[0].balls.iter().all(|b| b.innings == 1));
        assert_eq!(records[1].balls.len(), 8);
        assert!(records[1].balls.iter().all(|b| b.innings == 2));
        // the full cross-innings log is still on the state
        assert_eq!(engine.state().balls.len(), 14);
    }
}
