use thiserror::Error;

/// Failures surfaced by the strength table and the outcome calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("team not found: {0}")]
    UnknownTeam(String),

    /// Goal estimates for the goal-estimate form must be integers in [0, 10].
    #[error("{side} goal estimate {value} is outside 0..={max}")]
    InvalidGoalInput {
        side: &'static str,
        value: i64,
        max: u8,
    },

    #[error("expected goals must be finite and non-negative (home {home}, away {away})")]
    InvalidExpectedGoals { home: f64, away: f64 },

    #[error("invalid rating for {team}: attack {attack}, defense {defense}")]
    InvalidRating {
        team: String,
        attack: f64,
        defense: f64,
    },

    #[error("team listed twice: {0}")]
    DuplicateTeam(String),

    #[error("invalid league parameters: {0}")]
    InvalidParams(String),
}
