use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::{debug, info};

mod config;
mod dashboard;
mod model;

use config::{Command, Config};
use dashboard::AppState;
use model::{predict_from_goals, predict_match, MatchPrediction, StrengthTable};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;
    let params = config.league_params();

    // The strength table is built once and only read afterwards
    let table = StrengthTable::builtin()?;
    debug!(
        "Loaded {} teams (league avg {:.2}/{:.2}, max goals {})",
        table.teams().count(),
        params.avg_home_goals,
        params.avg_away_goals,
        params.max_goals
    );

    match config.command {
        Command::Teams => {
            for team in table.teams() {
                println!("{}", team);
            }
        }
        Command::Predict { home, away, json } => {
            let prediction = predict_match(&table, &home, &away, &params)?;
            let (home_name, _) = table.lookup(&home)?;
            let (away_name, _) = table.lookup(&away)?;
            report(&format!("{} vs {}", home_name, away_name), &prediction, json)?;
        }
        Command::Goals { home, away, json } => {
            let prediction = predict_from_goals(home, away, &params)?;
            report(&format!("Goal estimates {} : {}", home, away), &prediction, json)?;
        }
        Command::Serve { addr } => {
            let app = dashboard::router(AppState { table, params });
            let addr: SocketAddr = addr.parse()?;
            info!("Prediction form listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            // Run the form server (blocks until shutdown)
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn report(title: &str, prediction: &MatchPrediction, json: bool) -> Result<()> {
    debug!(
        "{}: xG {:.2}-{:.2}, captured mass {:.4}",
        title, prediction.home_xg, prediction.away_xg, prediction.captured_mass
    );
    if json {
        println!("{}", serde_json::to_string_pretty(prediction)?);
    } else {
        println!("{}", title);
        println!("{}", prediction.summary());
    }
    Ok(())
}
