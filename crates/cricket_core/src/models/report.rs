use super::innings::InningsRecord;
use super::match_result::MatchOutcome;
use super::player::PlayerStat;
use super::team::{Teams, TeamSide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whole-match totals for one player, summed over every completed innings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub balls_bowled: u32,
    pub catches: u32,
    pub run_outs: u32,
}

impl PlayerTotals {
    fn absorb(&mut self, stat: &PlayerStat) {
        self.runs += stat.runs;
        self.balls_faced += stat.balls_faced;
        self.fours += stat.fours;
        self.sixes += stat.sixes;
        self.wickets += stat.wickets;
        self.runs_conceded += stat.runs_conceded;
        self.balls_bowled += stat.balls_bowled;
        self.catches += stat.catches;
        self.run_outs += stat.run_outs;
    }

    pub fn fielding_points(&self) -> u32 {
        self.catches + self.run_outs
    }

    /// Player-of-the-match points: half the runs, plus wickets, plus dismissals
    /// in the field.
    pub fn award_points(&self) -> u32 {
        self.runs / 2 + self.wickets + self.fielding_points()
    }
}

/// A named award with its display detail, e.g. `("Asha", "54 Runs (31)")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardLine {
    pub name: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingRow {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: String,
    pub dismissal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingRow {
    pub name: String,
    pub overs: String,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: String,
}

/// Full scorecard for one completed innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsScorecard {
    pub innings: u32,
    pub batting_team: String,
    pub bowling_team: String,
    pub headline: String,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
}

impl InningsScorecard {
    pub fn from_record(teams: &Teams, record: &InningsRecord) -> Self {
        let batting_team = teams.side(record.batting_side);
        let bowling_team = teams.side(record.batting_side.opposite());

        // Batting rows in roster order, skipping anyone who never took guard
        let batting = batting_team
            .players
            .iter()
            .filter_map(|name| {
                let stat = record.stats.player(name)?;
                if stat.balls_faced == 0 && !stat.out {
                    return None;
                }
                Some(BattingRow {
                    name: name.clone(),
                    runs: stat.runs,
                    balls: stat.balls_faced,
                    fours: stat.fours,
                    sixes: stat.sixes,
                    strike_rate: format!("{:.1}", stat.strike_rate()),
                    dismissal: match &stat.how_out {
                        Some(text) => text.clone(),
                        None if stat.out => "out".to_string(),
                        None => "not out".to_string(),
                    },
                })
            })
            .collect();

        // A bowler who only conceded wides has no legal balls but still gets a row
        let bowling = bowling_team
            .players
            .iter()
            .filter_map(|name| {
                let stat = record.stats.player(name)?;
                if stat.balls_bowled == 0 && stat.runs_conceded == 0 && stat.wickets == 0 {
                    return None;
                }
                Some(BowlingRow {
                    name: name.clone(),
                    overs: stat.overs_bowled(),
                    runs_conceded: stat.runs_conceded,
                    wickets: stat.wickets,
                    economy: match stat.economy() {
                        Some(econ) => format!("{:.2}", econ),
                        None => "-".to_string(),
                    },
                })
            })
            .collect();

        InningsScorecard {
            innings: record.number,
            batting_team: batting_team.name.clone(),
            bowling_team: bowling_team.name.clone(),
            headline: record.scoreline(),
            batting,
            bowling,
        }
    }
}

/// End-of-match report: totals, awards and per-innings scorecards, all derived
/// from the immutable innings records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub totals: BTreeMap<String, PlayerTotals>,
    pub best_batter: Option<AwardLine>,
    pub best_bowler: Option<AwardLine>,
    pub best_fielder: Option<AwardLine>,
    pub player_of_match: Option<AwardLine>,
    pub innings_summary_a: String,
    pub innings_summary_b: String,
    pub scorecards: Vec<InningsScorecard>,
    pub result: Option<String>,
}

impl MatchReport {
    pub fn build(teams: &Teams, records: &[InningsRecord], result: Option<&MatchOutcome>) -> Self {
        let mut totals: BTreeMap<String, PlayerTotals> = BTreeMap::new();
        for name in teams.all_players() {
            totals.insert(name.clone(), PlayerTotals::default());
        }
        for record in records {
            for (name, stat) in record.stats.iter() {
                totals.entry(name.clone()).or_default().absorb(stat);
            }
        }

        // Awards walk the rosters in entry order so earlier players win exact ties.
        // Before any innings has closed there is nothing to award.
        let mut best_batter: Option<(&String, &PlayerTotals)> = None;
        let mut best_bowler: Option<(&String, &PlayerTotals)> = None;
        let mut best_fielder: Option<(&String, u32)> = None;
        let mut mom_points: Option<u32> = None;
        let mut mom_names: Vec<&String> = Vec::new();

        let award_pool: Vec<&String> = if records.is_empty() {
            Vec::new()
        } else {
            teams.all_players().collect()
        };
        for name in award_pool {
            let Some(t) = totals.get(name) else { continue };

            let better_bat = match best_batter {
                None => true,
                Some((_, b)) => t.runs > b.runs || (t.runs == b.runs && t.balls_faced < b.balls_faced),
            };
            if better_bat {
                best_batter = Some((name, t));
            }

            let better_bowl = match best_bowler {
                None => true,
                Some((_, b)) => {
                    t.wickets > b.wickets
                        || (t.wickets == b.wickets && t.runs_conceded < b.runs_conceded)
                }
            };
            if better_bowl {
                best_bowler = Some((name, t));
            }

            // Fielding award only exists when somebody actually took a dismissal
            let points = t.fielding_points();
            if points > 0 && best_fielder.map_or(true, |(_, b)| points > b) {
                best_fielder = Some((name, points));
            }

            let award = t.award_points();
            match mom_points {
                Some(top) if award > top => {
                    mom_points = Some(award);
                    mom_names = vec![name];
                }
                Some(top) if award == top => mom_names.push(name),
                Some(_) => {}
                None => {
                    mom_points = Some(award);
                    mom_names = vec![name];
                }
            }
        }

        let best_batter = best_batter.map(|(name, t)| AwardLine {
            name: name.clone(),
            detail: format!("{} Runs ({})", t.runs, t.balls_faced),
        });
        let best_bowler = best_bowler.map(|(name, t)| AwardLine {
            name: name.clone(),
            detail: format!("{} Wkts ({} R)", t.wickets, t.runs_conceded),
        });
        let best_fielder = best_fielder.map(|(name, points)| AwardLine {
            name: name.clone(),
            detail: format!("{} Dismissals", points),
        });
        let player_of_match = mom_points.map(|points| AwardLine {
            name: mom_names
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(" & "),
            detail: format!("{} Pts", points),
        });

        MatchReport {
            totals,
            best_batter,
            best_bowler,
            best_fielder,
            player_of_match,
            innings_summary_a: innings_summary(records, TeamSide::A),
            innings_summary_b: innings_summary(records, TeamSide::B),
            scorecards: records
                .iter()
                .map(|r| InningsScorecard::from_record(teams, r))
                .collect(),
            result: result.map(|outcome| outcome.describe(teams)),
        }
    }

    pub fn innings_summary(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::A => &self.innings_summary_a,
            TeamSide::B => &self.innings_summary_b,
        }
    }
}

fn innings_summary(records: &[InningsRecord], side: TeamSide) -> String {
    let lines: Vec<String> = records
        .iter()
        .filter(|r| r.batting_side == side)
        .map(|r| {
            format!(
                "Inn {}: {}/{}{} ({})",
                r.number,
                r.score,
                r.wickets,
                if r.declared { " (d)" } else { "" },
                r.overs
            )
        })
        .collect();
    if lines.is_empty() {
        "Did not bat".to_string()
    } else {
        lines.join(" | ")
    }
}

// ============================================================================
// Tests
// ============================================================================
