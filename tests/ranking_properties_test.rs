use league_table::{Game, RankingStrategy, Team};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["Athletic", "Barcelona", "Betis", "Girona", "Real Madrid", "Sevilla"];

fn teams() -> Vec<Team> {
    NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| Team::new(index as i64 + 1, *name))
        .collect()
}

/// Games between distinct teams drawn from `teams()`.
fn games_strategy() -> impl Strategy<Value = Vec<Game>> {
    prop::collection::vec((0..NAMES.len(), 1..NAMES.len(), 0u32..6, 0u32..6), 0..30).prop_map(
        |rows| {
            let teams = teams();
            rows.into_iter()
                .enumerate()
                .map(|(index, (home, offset, home_score, away_score))| Game {
                    id: index as i64 + 1,
                    home_team: teams[home].clone(),
                    home_team_score: home_score,
                    away_team: teams[(home + offset) % NAMES.len()].clone(),
                    away_team_score: away_score,
                })
                .collect()
        },
    )
}

fn strategy() -> impl Strategy<Value = RankingStrategy> {
    prop::sample::select(RankingStrategy::ALL.to_vec())
}

proptest! {
    #[test]
    fn exactly_one_outcome_holds(games in games_strategy()) {
        for game in &games {
            let home_wins = game.winner_team().is_some_and(|t| t.is(&game.home_team));
            let away_wins = game.winner_team().is_some_and(|t| t.is(&game.away_team));
            let holds = [game.is_draw(), home_wins, away_wins];
            prop_assert_eq!(holds.iter().filter(|h| **h).count(), 1);
        }
    }

    #[test]
    fn rankings_ignore_input_order(
        games in games_strategy(),
        strategy in strategy(),
        order in Just(teams()).prop_shuffle(),
    ) {
        let expected = strategy.calculate_rankings(&teams(), &games);
        let shuffled = strategy.calculate_rankings(&order, &games);
        prop_assert_eq!(expected, shuffled);
    }

    #[test]
    fn rankings_are_sorted_with_name_tiebreak(games in games_strategy(), strategy in strategy()) {
        let standings = strategy.calculate_rankings(&teams(), &games);
        prop_assert_eq!(standings.len(), NAMES.len());

        for pair in standings.windows(2) {
            prop_assert!(pair[0].points >= pair[1].points);
            if pair[0].points == pair[1].points {
                prop_assert!(pair[0].team.name < pair[1].team.name);
            }
        }
    }

    #[test]
    fn points_add_up_per_game(games in games_strategy(), strategy in strategy()) {
        let table = strategy.point_table();
        let total: u32 = strategy
            .calculate_rankings(&teams(), &games)
            .iter()
            .map(|s| s.points)
            .sum();
        let expected: u32 = games
            .iter()
            .map(|g| if g.is_draw() { 2 * table.draw } else { table.win + table.loss })
            .sum();
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn teams_without_games_score_zero(strategy in strategy()) {
        for team in teams() {
            prop_assert_eq!(strategy.calculate_team_points(&team, &[]), 0);
        }
    }
}
