pub mod error;
pub mod outcome;
pub mod poisson;
pub mod strength;

pub use error::PredictError;
pub use outcome::{predict_from_goals, predict_match, LeagueParams, MatchPrediction, MAX_GOAL_ESTIMATE};
pub use strength::StrengthTable;
