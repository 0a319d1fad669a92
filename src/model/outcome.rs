//! Pre-match outcome calculator.
//!
//! Expected goals for each side come from a multiplicative strength model:
//!
//!   home_xg = home_attack × away_defense × league_avg_home
//!   away_xg = away_attack × home_defense × league_avg_away
//!
//! Goal counts are treated as independent Poisson variables. Every scoreline
//! in the `max_goals × max_goals` grid is weighted by the product of the two
//! marginals and bucketed into home win / draw / away win. Scorelines at or
//! beyond the cutoff are dropped, so the three buckets are rescaled by the
//! captured mass to add back up to 100%.

use std::fmt;

use serde::Serialize;

use super::error::PredictError;
use super::poisson::poisson_pmf;
use super::strength::{StrengthTable, TeamRating};

/// Upper bound (inclusive) for the goal-estimate form.
pub const MAX_GOAL_ESTIMATE: u8 = 10;

/// Largest supported grid cutoff.
const MAX_GRID_GOALS: usize = 10;

/// League-wide scoring context for the strength model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueParams {
    /// Average goals per game scored by the home side.
    pub avg_home_goals: f64,
    /// Average goals per game scored by the away side.
    pub avg_away_goals: f64,
    /// Goals per side are enumerated over `0..max_goals`.
    pub max_goals: usize,
}

impl Default for LeagueParams {
    fn default() -> Self {
        LeagueParams {
            avg_home_goals: 1.6,
            avg_away_goals: 1.2,
            max_goals: 10,
        }
    }
}

impl LeagueParams {
    pub fn validate(&self) -> Result<(), PredictError> {
        for (label, v) in [
            ("avg_home_goals", self.avg_home_goals),
            ("avg_away_goals", self.avg_away_goals),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PredictError::InvalidParams(format!(
                    "{label} must be a positive number, got {v}"
                )));
            }
        }
        if !(1..=MAX_GRID_GOALS).contains(&self.max_goals) {
            return Err(PredictError::InvalidParams(format!(
                "max_goals must be between 1 and {MAX_GRID_GOALS}, got {}",
                self.max_goals
            )));
        }
        Ok(())
    }
}

/// An exact final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreline {
    pub home: usize,
    pub away: usize,
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Result of a single prediction. Probabilities are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPrediction {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub most_likely_score: Scoreline,
    pub home_xg: f64,
    pub away_xg: f64,
    /// Share of the joint distribution inside the grid, before rescaling.
    pub captured_mass: f64,
}

impl MatchPrediction {
    /// Fallback when a team is drawn against itself: a certain 0-0 draw.
    pub fn identical_teams() -> Self {
        MatchPrediction {
            home_win: 0.0,
            draw: 100.0,
            away_win: 0.0,
            most_likely_score: Scoreline { home: 0, away: 0 },
            home_xg: 0.0,
            away_xg: 0.0,
            captured_mass: 1.0,
        }
    }

    /// One-line display form with probabilities rounded to one decimal.
    pub fn summary(&self) -> String {
        format!(
            "Most likely score {} | Home win {:.1}% | Draw {:.1}% | Away win {:.1}%",
            self.most_likely_score, self.home_win, self.draw, self.away_win
        )
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Expected goals `(home, away)` under the multiplicative strength model.
pub fn expected_goals(home: TeamRating, away: TeamRating, params: &LeagueParams) -> (f64, f64) {
    let home_xg = (home.attack * away.defense) * params.avg_home_goals;
    let away_xg = (away.attack * home.defense) * params.avg_away_goals;
    (home_xg, away_xg)
}

/// Predict from two teams' coefficients.
pub fn predict(
    home: TeamRating,
    away: TeamRating,
    params: &LeagueParams,
) -> Result<MatchPrediction, PredictError> {
    params.validate()?;
    let (home_xg, away_xg) = expected_goals(home, away, params);
    predict_from_xg(home_xg, away_xg, params.max_goals)
}

/// Predict a fixture by team name.
///
/// Both names must exist in the table, even when they are the same string.
/// A team drawn against itself gets [`MatchPrediction::identical_teams`].
pub fn predict_match(
    table: &StrengthTable,
    home: &str,
    away: &str,
    params: &LeagueParams,
) -> Result<MatchPrediction, PredictError> {
    let (home_name, home_rating) = table.lookup(home)?;
    let (away_name, away_rating) = table.lookup(away)?;
    if home_name == away_name {
        return Ok(MatchPrediction::identical_teams());
    }
    predict(home_rating, away_rating, params)
}

/// Predict from integer goal estimates, used directly as Poisson rates.
pub fn predict_from_goals(
    home_goals: i64,
    away_goals: i64,
    params: &LeagueParams,
) -> Result<MatchPrediction, PredictError> {
    params.validate()?;
    for (side, value) in [("home", home_goals), ("away", away_goals)] {
        if !(0..=i64::from(MAX_GOAL_ESTIMATE)).contains(&value) {
            return Err(PredictError::InvalidGoalInput {
                side,
                value,
                max: MAX_GOAL_ESTIMATE,
            });
        }
    }
    predict_from_xg(home_goals as f64, away_goals as f64, params.max_goals)
}

/// Enumerate the scoreline grid for two Poisson rates.
pub fn predict_from_xg(
    home_xg: f64,
    away_xg: f64,
    max_goals: usize,
) -> Result<MatchPrediction, PredictError> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if !valid(home_xg) || !valid(away_xg) {
        return Err(PredictError::InvalidExpectedGoals {
            home: home_xg,
            away: away_xg,
        });
    }
    if max_goals == 0 || max_goals > MAX_GRID_GOALS {
        return Err(PredictError::InvalidParams(format!(
            "max_goals must be between 1 and {MAX_GRID_GOALS}, got {max_goals}"
        )));
    }

    let home_pmf = poisson_pmf(home_xg, max_goals);
    let away_pmf = poisson_pmf(away_xg, max_goals);

    let mut home_mass = 0.0;
    let mut draw_mass = 0.0;
    let mut away_mass = 0.0;
    let mut best = Scoreline { home: 0, away: 0 };
    let mut best_p = -1.0;

    for (h, ph) in home_pmf.iter().enumerate() {
        for (a, pa) in away_pmf.iter().enumerate() {
            let p = ph * pa;
            if h > a {
                home_mass += p;
            } else if h == a {
                draw_mass += p;
            } else {
                away_mass += p;
            }
            // Strict comparison keeps the first cell on ties.
            if p > best_p {
                best_p = p;
                best = Scoreline { home: h, away: a };
            }
        }
    }

    let captured = home_mass + draw_mass + away_mass;
    // Rates far past the cutoff leave nothing inside the grid to rescale.
    if captured <= 0.0 {
        return Err(PredictError::InvalidExpectedGoals {
            home: home_xg,
            away: away_xg,
        });
    }
    Ok(MatchPrediction {
        home_win: home_mass / captured * 100.0,
        draw: draw_mass / captured * 100.0,
        away_win: away_mass / captured * 100.0,
        most_likely_score: best,
        home_xg,
        away_xg,
        captured_mass: captured,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rating(attack: f64, defense: f64) -> TeamRating {
        TeamRating { attack, defense }
    }

    fn params(max_goals: usize) -> LeagueParams {
        LeagueParams {
            max_goals,
            ..LeagueParams::default()
        }
    }

    fn total(p: &MatchPrediction) -> f64 {
        p.home_win + p.draw + p.away_win
    }

    #[test]
    fn reference_fixture_is_pinned() {
        // Manchester City (2.5, 0.8) vs Liverpool (2.3, 1.0), grid 0..8
        let p = predict(rating(2.5, 0.8), rating(2.3, 1.0), &params(8)).unwrap();
        assert_relative_eq!(p.home_xg, 4.0, epsilon = 1e-12);
        assert_relative_eq!(p.away_xg, 2.208, epsilon = 1e-12);
        assert_relative_eq!(p.home_win, 68.24045690347849, epsilon = 1e-9);
        assert_relative_eq!(p.draw, 13.57404093208438, epsilon = 1e-9);
        assert_relative_eq!(p.away_win, 18.185502164437136, epsilon = 1e-9);
        assert_relative_eq!(p.captured_mass, 0.9469479511300739, epsilon = 1e-9);
        assert_eq!(p.most_likely_score, Scoreline { home: 3, away: 2 });
        assert_eq!(p.most_likely_score.to_string(), "3-2");
        assert_eq!(
            p.summary(),
            "Most likely score 3-2 | Home win 68.2% | Draw 13.6% | Away win 18.2%"
        );
    }

    #[test]
    fn reference_fixture_default_grid() {
        let table = StrengthTable::builtin().unwrap();
        let p = predict_match(&table, "Manchester City", "Liverpool", &LeagueParams::default())
            .unwrap();
        assert_relative_eq!(p.home_win, 69.48587690578871, epsilon = 1e-9);
        assert_relative_eq!(p.draw, 12.965771748021732, epsilon = 1e-9);
        assert_relative_eq!(p.away_win, 17.548351346189555, epsilon = 1e-9);
        assert_eq!(p.most_likely_score.to_string(), "3-2");
    }

    #[test]
    fn probabilities_sum_to_100_for_every_fixture() {
        let table = StrengthTable::builtin().unwrap();
        let teams: Vec<&str> = table.teams().collect();
        for max_goals in [1, 4, 8, 10] {
            for home in &teams {
                for away in &teams {
                    if home == away {
                        continue;
                    }
                    let p = predict_match(&table, home, away, &params(max_goals)).unwrap();
                    assert_relative_eq!(total(&p), 100.0, epsilon = 0.1);
                    assert!(p.home_win >= 0.0 && p.draw >= 0.0 && p.away_win >= 0.0);
                    assert!(p.most_likely_score.home < max_goals);
                    assert!(p.most_likely_score.away < max_goals);
                }
            }
        }
    }

    #[test]
    fn captured_mass_shrinks_with_cutoff() {
        // With 4.0 expected home goals the 0..8 grid misses ~5% of outcomes;
        // the default 0..10 grid keeps the loss under 1%.
        let home = rating(2.5, 0.8);
        let away = rating(2.3, 1.0);
        let short = predict(home, away, &params(8)).unwrap();
        let long = predict(home, away, &params(10)).unwrap();
        assert!(short.captured_mass < 0.95);
        assert!(long.captured_mass > 0.99);
        assert!(short.captured_mass < long.captured_mass);
    }

    #[test]
    fn identical_teams_fall_back_to_certain_draw() {
        let table = StrengthTable::builtin().unwrap();
        let p = predict_match(&table, "Arsenal", "arsenal", &LeagueParams::default()).unwrap();
        assert_eq!(p, MatchPrediction::identical_teams());
        assert_eq!(p.home_win, 0.0);
        assert_eq!(p.draw, 100.0);
        assert_eq!(p.away_win, 0.0);
        assert_eq!(p.most_likely_score.to_string(), "0-0");
    }

    #[test]
    fn unknown_team_is_never_defaulted() {
        let table = StrengthTable::builtin().unwrap();
        let params = LeagueParams::default();
        assert_eq!(
            predict_match(&table, "Arsenal", "Leeds", &params),
            Err(PredictError::UnknownTeam("Leeds".into()))
        );
        assert_eq!(
            predict_match(&table, "Leeds", "Leeds", &params),
            Err(PredictError::UnknownTeam("Leeds".into()))
        );
    }

    #[test]
    fn more_attack_never_lowers_win_probability() {
        let away = rating(1.8, 1.1);
        let mut prev = 0.0;
        for step in 0..30 {
            let attack = 0.5 + step as f64 * 0.1;
            let p = predict(rating(attack, 1.0), away, &LeagueParams::default()).unwrap();
            assert!(
                p.home_win + 1e-9 >= prev,
                "attack {attack:.1}: {:.4} < {:.4}",
                p.home_win,
                prev
            );
            prev = p.home_win;
        }
    }

    #[test]
    fn swapping_sides_swaps_outcomes() {
        let city = rating(2.5, 0.8);
        let pool = rating(2.3, 1.0);
        let forward = predict(city, pool, &params(8)).unwrap();
        let swapped_params = LeagueParams {
            avg_home_goals: 1.2,
            avg_away_goals: 1.6,
            max_goals: 8,
        };
        let reverse = predict(pool, city, &swapped_params).unwrap();
        assert_relative_eq!(forward.home_win, reverse.away_win, epsilon = 1e-9);
        assert_relative_eq!(forward.away_win, reverse.home_win, epsilon = 1e-9);
        assert_relative_eq!(forward.draw, reverse.draw, epsilon = 1e-9);
        assert_eq!(reverse.most_likely_score, Scoreline { home: 2, away: 3 });
    }

    #[test]
    fn ties_keep_first_scoreline() {
        // λ = 1 for both: 0-0, 0-1, 1-0 and 1-1 share the top mass
        let p = predict_from_goals(1, 1, &LeagueParams::default()).unwrap();
        assert_eq!(p.most_likely_score, Scoreline { home: 0, away: 0 });
        assert_relative_eq!(p.home_win, p.away_win, epsilon = 1e-9);
    }

    #[test]
    fn goal_estimates_drive_the_grid() {
        let p = predict_from_goals(2, 1, &LeagueParams::default()).unwrap();
        assert_relative_eq!(p.home_win, 60.56848737032601, epsilon = 1e-9);
        assert_relative_eq!(p.draw, 21.17219522113466, epsilon = 1e-9);
        assert_relative_eq!(p.away_win, 18.259317408539342, epsilon = 1e-9);
        assert_eq!(p.most_likely_score.to_string(), "1-0");
    }

    #[test]
    fn zero_goal_estimates_are_a_certain_goalless_draw() {
        let p = predict_from_goals(0, 0, &LeagueParams::default()).unwrap();
        assert_relative_eq!(p.draw, 100.0);
        assert_relative_eq!(p.captured_mass, 1.0);
        assert_eq!(p.most_likely_score.to_string(), "0-0");
    }

    #[test]
    fn goal_estimates_out_of_range_rejected() {
        let params = LeagueParams::default();
        assert_eq!(
            predict_from_goals(11, 1, &params),
            Err(PredictError::InvalidGoalInput {
                side: "home",
                value: 11,
                max: 10
            })
        );
        assert!(matches!(
            predict_from_goals(1, -1, &params),
            Err(PredictError::InvalidGoalInput { side: "away", .. })
        ));
        assert!(predict_from_goals(10, 10, &params).is_ok());
    }

    #[test]
    fn invalid_params_rejected() {
        let home = rating(1.0, 1.0);
        let away = rating(1.0, 1.0);
        assert!(predict(home, away, &params(0)).is_err());
        assert!(predict(home, away, &params(11)).is_err());
        let bad_avg = LeagueParams {
            avg_home_goals: -1.0,
            ..LeagueParams::default()
        };
        assert!(matches!(
            predict(home, away, &bad_avg),
            Err(PredictError::InvalidParams(_))
        ));
    }

    #[test]
    fn non_finite_rates_rejected() {
        assert!(matches!(
            predict_from_xg(f64::INFINITY, 1.0, 10),
            Err(PredictError::InvalidExpectedGoals { .. })
        ));
        assert!(predict_from_xg(1.0, -0.5, 10).is_err());
        assert!(predict_from_xg(1.0e4, 1.0, 10).is_err());
    }
}
