//! Static team strength table.
//!
//! Each team carries an attack and a defense coefficient relative to the
//! league average (1.0 = average). Higher attack means more goals scored;
//! higher defense means more goals *conceded*, so 0.8 is a tight back line.

use serde::Serialize;

use super::error::PredictError;

/// Attack/defense multipliers for a single team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamRating {
    pub attack: f64,
    pub defense: f64,
}

impl TeamRating {
    fn checked(team: &str, attack: f64, defense: f64) -> Result<Self, PredictError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(attack) || !valid(defense) {
            return Err(PredictError::InvalidRating {
                team: team.to_string(),
                attack,
                defense,
            });
        }
        Ok(TeamRating { attack, defense })
    }
}

/// Demo ratings: (name, attack, defense). Order is the display order.
const BUILTIN_RATINGS: [(&str, f64, f64); 6] = [
    ("Manchester City", 2.5, 0.8),
    ("Liverpool", 2.3, 1.0),
    ("Arsenal", 2.1, 0.9),
    ("Chelsea", 1.8, 1.1),
    ("Manchester United", 1.7, 1.2),
    ("Tottenham Hotspur", 1.9, 1.4),
];

/// Read-only mapping from team name to rating, in insertion order.
#[derive(Debug, Clone)]
pub struct StrengthTable {
    entries: Vec<(String, TeamRating)>,
}

impl StrengthTable {
    /// The hardcoded demo table.
    pub fn builtin() -> Result<Self, PredictError> {
        Self::from_entries(BUILTIN_RATINGS)
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self, PredictError>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let mut out: Vec<(String, TeamRating)> = Vec::new();
        for (name, attack, defense) in entries {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(PredictError::InvalidParams(
                    "team name must not be empty".into(),
                ));
            }
            if out.iter().any(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                return Err(PredictError::DuplicateTeam(name));
            }
            let rating = TeamRating::checked(&name, attack, defense)?;
            out.push((name, rating));
        }
        Ok(StrengthTable { entries: out })
    }

    /// Look up a team, returning its canonical name and rating.
    ///
    /// Exact matches win; otherwise an ASCII case-insensitive match is
    /// accepted so CLI input like `arsenal` resolves.
    pub fn lookup(&self, name: &str) -> Result<(&str, TeamRating), PredictError> {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|(n, _)| n == wanted)
            .or_else(|| self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(wanted)))
            .map(|(n, r)| (n.as_str(), *r))
            .ok_or_else(|| PredictError::UnknownTeam(wanted.to_string()))
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
