//! Point calculation and league table ordering.
//!
//! A [`RankingStrategy`] converts game outcomes into points through its
//! [`PointTable`], sums them per team and sorts the teams into standings:
//! points descending, then team name ascending, then id ascending.

use crate::domain::model::{Game, Outcome, Standing, Team};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Points awarded for each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointTable {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl PointTable {
    pub const fn new(win: u32, draw: u32, loss: u32) -> Self {
        Self { win, draw, loss }
    }

    pub fn points_for(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Draw => self.draw,
            Outcome::Loss => self.loss,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingStrategy {
    #[default]
    Basic,
    Alternate,
}

impl RankingStrategy {
    pub const ALL: [RankingStrategy; 2] = [RankingStrategy::Basic, RankingStrategy::Alternate];

    pub fn name(&self) -> &'static str {
        match self {
            RankingStrategy::Basic => "basic",
            RankingStrategy::Alternate => "alternate",
        }
    }

    pub fn point_table(&self) -> PointTable {
        match self {
            RankingStrategy::Basic => PointTable::new(3, 1, 0),
            RankingStrategy::Alternate => PointTable::new(2, 1, 0),
        }
    }

    /// Resolves a user-supplied strategy name. Missing or unknown names fall
    /// back to [`RankingStrategy::Basic`].
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::parse::<RankingStrategy>) {
            Some(Ok(strategy)) => strategy,
            Some(Err(unknown)) => {
                tracing::debug!("Unknown ranking strategy '{}', using basic", unknown);
                RankingStrategy::Basic
            }
            None => RankingStrategy::Basic,
        }
    }

    pub fn points_for(&self, outcome: Outcome) -> u32 {
        self.point_table().points_for(outcome)
    }

    /// Points `team` earns from a single game.
    pub fn calculate_points(&self, game: &Game, team: &Team) -> u32 {
        self.points_for(game.outcome_for(team))
    }

    pub fn calculate_team_points(&self, team: &Team, games: &[Game]) -> u32 {
        games_for_team(games, team)
            .map(|game| self.calculate_points(game, team))
            .sum()
    }

    /// Computes every team's points and orders the table. Teams without games
    /// are kept with zero points.
    pub fn calculate_rankings(&self, teams: &[Team], games: &[Game]) -> Vec<Standing> {
        let mut standings: Vec<Standing> = teams
            .iter()
            .map(|team| Standing {
                team: team.clone(),
                points: self.calculate_team_points(team, games),
            })
            .collect();

        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.team.name.cmp(&b.team.name))
                .then_with(|| a.team.id.cmp(&b.team.id))
        });

        standings
    }
}

impl fmt::Display for RankingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RankingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(RankingStrategy::Basic),
            "alternate" => Ok(RankingStrategy::Alternate),
            _ => Err(s.to_string()),
        }
    }
}

/// Every game in which `team` played home or away, each yielded once.
pub fn games_for_team<'a>(
    games: &'a [Game],
    team: &'a Team,
) -> impl Iterator<Item = &'a Game> + 'a {
    games.iter().filter(move |game| game.involves(team))
}
