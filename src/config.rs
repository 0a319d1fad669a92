use clap::{Parser, Subcommand};

use crate::model::{LeagueParams, MAX_GOAL_ESTIMATE};

/// Football match outcome predictor (Poisson scoreline model)
#[derive(Parser, Debug, Clone)]
#[command(name = "football-predictor", version, about)]
pub struct Config {
    /// Average goals scored per game by home sides
    #[arg(long, global = true, env = "LEAGUE_AVG_HOME", default_value = "1.6")]
    pub league_avg_home: f64,

    /// Average goals scored per game by away sides
    #[arg(long, global = true, env = "LEAGUE_AVG_AWAY", default_value = "1.2")]
    pub league_avg_away: f64,

    /// Goals per side are enumerated over 0..MAX_GOALS
    #[arg(long, global = true, env = "MAX_GOALS", default_value = "10")]
    pub max_goals: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the teams in the strength table
    Teams,

    /// Predict a fixture between two teams
    Predict {
        /// Home team name
        #[arg(long)]
        home: String,

        /// Away team name
        #[arg(long)]
        away: String,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict from integer goal estimates (0-10) for each side
    Goals {
        /// Expected goals for the home side
        #[arg(long, allow_negative_numbers = true)]
        home: i64,

        /// Expected goals for the away side
        #[arg(long, allow_negative_numbers = true)]
        away: i64,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the prediction form over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

impl Config {
    pub fn league_params(&self) -> LeagueParams {
        LeagueParams {
            avg_home_goals: self.league_avg_home,
            avg_away_goals: self.league_avg_away,
            max_goals: self.max_goals,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.league_params().validate()?;
        if let Command::Goals { home, away, .. } = &self.command {
            let max = i64::from(MAX_GOAL_ESTIMATE);
            if !(0..=max).contains(home) || !(0..=max).contains(away) {
                anyhow::bail!("goal estimates must be whole numbers between 0 and {}", max);
            }
        }
        Ok(())
    }
}
