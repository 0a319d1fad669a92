use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::model::{
    predict_from_goals, predict_match, LeagueParams, MatchPrediction, PredictError, StrengthTable,
};

#[derive(Clone)]
pub struct AppState {
    pub table: StrengthTable,
    pub params: LeagueParams,
}

/// Build the Axum router for the prediction form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/predict", get(predict_handler))
        .route("/api/predict/goals", get(goals_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Deserialize)]
struct FixtureQuery {
    home: String,
    away: String,
}

#[derive(Debug, Deserialize)]
struct GoalsQuery {
    home: i64,
    away: i64,
}

#[derive(Debug, Serialize)]
struct FixtureResponse {
    home_team: String,
    away_team: String,
    #[serde(flatten)]
    prediction: MatchPrediction,
}

fn reject(err: PredictError) -> (StatusCode, String) {
    warn!("Rejected prediction request: {}", err);
    let status = match err {
        PredictError::UnknownTeam(_) => StatusCode::NOT_FOUND,
        PredictError::InvalidGoalInput { .. }
        | PredictError::InvalidExpectedGoals { .. }
        | PredictError::InvalidRating { .. }
        | PredictError::DuplicateTeam(_) => StatusCode::BAD_REQUEST,
        PredictError::InvalidParams(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

/// Serve the form page.
async fn index_handler() -> impl IntoResponse {
    Html(FORM_HTML)
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "OK" }))
}

/// GET /api/teams
async fn teams_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.table.teams().map(str::to_string).collect::<Vec<_>>())
}

/// GET /api/predict?home=Arsenal&away=Chelsea
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FixtureQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let prediction = predict_match(&state.table, &q.home, &q.away, &state.params).map_err(reject)?;
    debug!(
        "{} vs {}: xG {:.2}-{:.2}, captured mass {:.4}",
        q.home, q.away, prediction.home_xg, prediction.away_xg, prediction.captured_mass
    );
    let (home_team, _) = state.table.lookup(&q.home).map_err(reject)?;
    let (away_team, _) = state.table.lookup(&q.away).map_err(reject)?;
    Ok(Json(FixtureResponse {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        prediction,
    }))
}

/// GET /api/predict/goals?home=2&away=1
async fn goals_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GoalsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    predict_from_goals(q.home, q.away, &state.params)
        .map(Json)
        .map_err(reject)
}

/// Embedded single-file form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Football Match Predictor</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #ff4b4b;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  header p { color: var(--muted); font-size: .85rem; margin-top: .3rem; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; max-width: 760px; margin: 0 auto; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .panel h2 { font-size: 1rem; margin-bottom: .8rem; }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  .three-col { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
  label { display: block; color: var(--muted); font-size: .75rem; text-transform: uppercase; margin-bottom: .3rem; }
  select, input { width: 100%; padding: .5rem; background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; }
  button { margin-top: 1rem; background: var(--accent); border: none; color: #fff; padding: .55rem 1.2rem; border-radius: 6px; cursor: pointer; font-weight: 600; }
  .stat .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; margin-bottom: .4rem; }
  .stat .value { font-size: 1.7rem; font-weight: 700; }
  .bar-row { display: grid; grid-template-columns: 90px 1fr 60px; align-items: center; gap: .6rem; margin: .4rem 0; font-size: .85rem; }
  .bar { height: 14px; background: var(--accent); border-radius: 4px; }
  .hidden { display: none; }
  .error { color: var(--accent); }
  footer { color: var(--muted); font-size: .75rem; text-align: center; padding: 1rem; }
</style>
</head>
<body>
<header>
  <h1>Football Match Predictor</h1>
  <p>Poisson scoreline model over a small hardcoded strength table. Demo data only.</p>
</header>

<main>
  <form class="panel" id="team-form">
    <h2>Pick two teams</h2>
    <div class="two-col">
      <div><label for="home">Home Team</label><select id="home"></select></div>
      <div><label for="away">Away Team</label><select id="away"></select></div>
    </div>
    <button type="submit">Predict Outcome</button>
  </form>

  <form class="panel" id="goals-form">
    <h2>Or enter goal estimates</h2>
    <div class="two-col">
      <div><label for="home-goals">Home Goals</label><input id="home-goals" type="number" min="0" max="10" step="1" value="2"></div>
      <div><label for="away-goals">Away Goals</label><input id="away-goals" type="number" min="0" max="10" step="1" value="1"></div>
    </div>
    <button type="submit">Predict Outcome</button>
  </form>

  <div class="panel hidden" id="result">
    <h2 id="fixture"></h2>
    <div class="stat"><div class="label">Most Likely Score</div><div class="value" id="score">–</div></div>
    <div class="three-col" style="margin-top:1rem">
      <div class="stat"><div class="label">Home Win</div><div class="value" id="p-home">–</div></div>
      <div class="stat"><div class="label">Draw</div><div class="value" id="p-draw">–</div></div>
      <div class="stat"><div class="label">Away Win</div><div class="value" id="p-away">–</div></div>
    </div>
    <h2 style="margin-top:1.2rem">Probability Breakdown</h2>
    <div id="bars"></div>
  </div>

  <div class="panel hidden error" id="error">Something went wrong while predicting this match. Please try again.</div>
</main>

<footer>Model based on the Poisson distribution. This is a simulation for demonstration purposes.</footer>

<script>
const $ = id => document.getElementById(id);
const pct = v => v.toFixed(1) + '%';

async function loadTeams() {
  const teams = await (await fetch('/api/teams')).json();
  for (const [id, idx] of [['home', 0], ['away', 1]]) {
    const sel = $(id);
    teams.forEach((t, i) => {
      const opt = document.createElement('option');
      opt.value = t; opt.textContent = t;
      if (i === idx) opt.selected = true;
      sel.appendChild(opt);
    });
  }
}

function render(title, p) {
  $('error').classList.add('hidden');
  $('fixture').textContent = title;
  $('score').textContent = p.most_likely_score.home + '-' + p.most_likely_score.away;
  $('p-home').textContent = pct(p.home_win);
  $('p-draw').textContent = pct(p.draw);
  $('p-away').textContent = pct(p.away_win);
  $('bars').innerHTML = [['Home Win', p.home_win], ['Draw', p.draw], ['Away Win', p.away_win]]
    .map(([label, v]) => `<div class="bar-row"><span>${label}</span><div class="bar" style="width:${v}%"></div><span>${pct(v)}</span></div>`)
    .join('');
  $('result').classList.remove('hidden');
}

async function request(url, title) {
  try {
    const r = await fetch(url);
    if (!r.ok) throw new Error(await r.text());
    render(title, await r.json());
  } catch (e) {
    $('result').classList.add('hidden');
    $('error').classList.remove('hidden');
  }
}

$('team-form').addEventListener('submit', ev => {
  ev.preventDefault();
  const home = $('home').value, away = $('away').value;
  const qs = new URLSearchParams({ home, away });
  request('/api/predict?' + qs, home + ' vs ' + away);
});

$('goals-form').addEventListener('submit', ev => {
  ev.preventDefault();
  const qs = new URLSearchParams({ home: $('home-goals').value, away: $('away-goals').value });
  request('/api/predict/goals?' + qs, 'Goal estimates ' + qs.get('home') + ' : ' + qs.get('away'));
});

loadTeams();
</script>
</body>
</html>
"#;

// ── Tests ────────────────────────────────────────────────────────────────────
