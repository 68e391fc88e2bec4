use serde::{Deserialize, Serialize};

pub type TeamId = i64;
pub type GameId = i64;

/// A named participant in the league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Teams are the same team when they share an identity, regardless of name.
    pub fn is(&self, other: &Team) -> bool {
        self.id == other.id
    }
}

/// Result of a game seen from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A single match result between two teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub home_team: Team,
    pub home_team_score: u32,
    pub away_team: Team,
    pub away_team_score: u32,
}

impl Game {
    pub fn is_draw(&self) -> bool {
        self.home_team_score == self.away_team_score
    }

    /// The side with the strictly greater score, `None` on a draw.
    pub fn winner_team(&self) -> Option<&Team> {
        if self.is_draw() {
            return None;
        }

        if self.home_team_score > self.away_team_score {
            Some(&self.home_team)
        } else {
            Some(&self.away_team)
        }
    }

    pub fn loser_team(&self) -> Option<&Team> {
        if self.is_draw() {
            return None;
        }

        if self.home_team_score > self.away_team_score {
            Some(&self.away_team)
        } else {
            Some(&self.home_team)
        }
    }

    pub fn is_winner(&self, team: &Team) -> bool {
        self.winner_team().is_some_and(|winner| winner.is(team))
    }

    pub fn involves(&self, team: &Team) -> bool {
        self.home_team.is(team) || self.away_team.is(team)
    }

    pub fn outcome_for(&self, team: &Team) -> Outcome {
        if self.is_draw() {
            Outcome::Draw
        } else if self.is_winner(team) {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}--{}:{}",
            self.home_team.name, self.home_team_score, self.away_team.name, self.away_team_score
        )
    }
}

/// A validated game that has not been persisted yet. Teams are referenced by
/// name and get created on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub home_team_name: String,
    pub home_team_score: u32,
    pub away_team_name: String,
    pub away_team_score: u32,
}

/// A team's aggregate points under one ranking strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub team: Team,
    pub points: u32,
}

/// Summary of a finished CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub games_imported: usize,
    pub teams_created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home: u32, away: u32) -> Game {
        Game {
            id: 1,
            home_team: Team::new(1, "Barcelona"),
            home_team_score: home,
            away_team: Team::new(2, "Real Madrid"),
            away_team_score: away,
        }
    }

    #[test]
    fn test_home_win() {
        let g = game(2, 1);
        assert!(!g.is_draw());
        assert_eq!(g.winner_team().map(|t| t.id), Some(1));
        assert_eq!(g.loser_team().map(|t| t.id), Some(2));
        assert!(g.is_winner(&Team::new(1, "Barcelona")));
        assert_eq!(g.outcome_for(&g.away_team), Outcome::Loss);
    }

    #[test]
    fn test_away_win() {
        let g = game(0, 3);
        assert_eq!(g.winner_team().map(|t| t.id), Some(2));
        assert_eq!(g.outcome_for(&g.away_team), Outcome::Win);
    }

    #[test]
    fn test_draw_has_no_winner() {
        let g = game(1, 1);
        assert!(g.is_draw());
        assert!(g.winner_team().is_none());
        assert!(g.loser_team().is_none());
        assert!(!g.is_winner(&g.home_team));
        assert_eq!(g.outcome_for(&g.home_team), Outcome::Draw);
    }

    #[test]
    fn test_winner_compares_identity_not_name() {
        let g = game(2, 0);
        assert!(!g.is_winner(&Team::new(7, "Barcelona")));
    }

    #[test]
    fn test_display() {
        assert_eq!(game(2, 1).to_string(), "Barcelona:2--Real Madrid:1");
    }
}
