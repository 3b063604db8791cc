use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::{
    self, create_pool, get_latest_odds_update_time, get_latest_props_for_game, get_matchup_by_id,
};
use crate::models::{ApiResponse, BaselineMetric, Matchup, PlayerStatsSummary};
use crate::services::props_overview::{build_props_overview, PropsOverview};
use crate::services::stats_summarizer::{summarize, summarize_from_db};
use crate::utils::TtlCache;

/// Summaries are cached per (game, season, season type); the roster is
/// cached under a single key since team assignments change rarely.
type SummaryKey = (String, String, String);

#[derive(Clone)]
struct AppState {
    pool: SqlitePool,
    roster_cache: Arc<Mutex<TtlCache<&'static str, HashMap<String, String>>>>,
    summary_cache: Arc<Mutex<TtlCache<SummaryKey, HashMap<String, PlayerStatsSummary>>>>,
}

pub async fn serve(port: u16) -> anyhow::Result<()> {
    let pool = create_pool().await?;
    db::init_database_with_pool(&pool).await?;

    let state = AppState {
        pool,
        roster_cache: Arc::new(Mutex::new(TtlCache::new(Duration::from_secs(6 * 3600)))),
        summary_cache: Arc::new(Mutex::new(TtlCache::new(Duration::from_secs(3600)))),
    };

    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("props-hub API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/matchups/upcoming", get(get_upcoming_matchups_handler))
        .route("/matchups/{game_id}/props", get(get_matchup_props_handler))
        .route("/players/{name}/summary", get(get_player_summary_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("props-hub API is running"))
}

// GET /matchups/upcoming - future matchups keyed by derived game name
async fn get_upcoming_matchups_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HashMap<String, Matchup>>>, StatusCode> {
    match db::get_future_matchups(&state.pool).await {
        Ok(matchups) => {
            let by_derived_name = matchups
                .into_iter()
                .map(|m| (m.derived_game_name.clone(), m))
                .collect();
            Ok(Json(ApiResponse::success(by_derived_name)))
        }
        Err(e) => {
            tracing::error!("Failed to fetch upcoming matchups: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// GET /matchups/{game_id}/props - the matchup-centric value overview
#[derive(Deserialize)]
struct MatchupPropsQuery {
    prop_type: Option<String>,
    metric: Option<String>,
    season: Option<String>,
    season_type: Option<String>,
}

async fn get_matchup_props_handler(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(params): Query<MatchupPropsQuery>,
) -> Result<Json<ApiResponse<PropsOverview>>, StatusCode> {
    let prop_type = params.prop_type.unwrap_or_else(|| "Points".to_string());
    let season = params.season.unwrap_or_else(|| "2025".to_string());
    let season_type = params
        .season_type
        .unwrap_or_else(|| "Regular Season".to_string());

    let metric_raw = params.metric.unwrap_or_else(|| "last_5_avg".to_string());
    let Some(metric) = BaselineMetric::parse(&metric_raw) else {
        return Ok(Json(ApiResponse::error(format!(
            "Unknown metric: {}",
            metric_raw
        ))));
    };

    let matchup = match get_matchup_by_id(&state.pool, &game_id).await {
        Ok(Some(matchup)) => matchup,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to fetch matchup {}: {}", game_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (quotes, odds_updated_at) = match tokio::try_join!(
        get_latest_props_for_game(&state.pool, &game_id),
        get_latest_odds_update_time(&state.pool, &game_id),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to fetch props for {}: {}", game_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let roster = match cached_roster(&state).await {
        Ok(roster) => roster,
        Err(e) => {
            tracing::error!("Failed to fetch roster: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let summary_key = (game_id.clone(), season.clone(), season_type.clone());
    let summaries = {
        let cached = state.summary_cache.lock().await.get(&summary_key);
        match cached {
            Some(summaries) => summaries,
            None => {
                let mut player_names: Vec<String> =
                    quotes.iter().map(|q| q.player_name.clone()).collect();
                player_names.sort();
                player_names.dedup();

                let summaries =
                    summarize_from_db(&state.pool, &player_names, &season, &season_type).await;
                state
                    .summary_cache
                    .lock()
                    .await
                    .insert(summary_key, summaries.clone());
                summaries
            }
        }
    };

    let overview = build_props_overview(
        matchup,
        odds_updated_at,
        quotes,
        &roster,
        &summaries,
        &prop_type,
        metric,
    );
    Ok(Json(ApiResponse::success(overview)))
}

// GET /players/{name}/summary - one player's baseline summary
#[derive(Deserialize)]
struct PlayerSummaryQuery {
    season: Option<String>,
    season_type: Option<String>,
}

async fn get_player_summary_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PlayerSummaryQuery>,
) -> Result<Json<ApiResponse<PlayerStatsSummary>>, StatusCode> {
    let season = params.season.unwrap_or_else(|| "2025".to_string());
    let season_type = params
        .season_type
        .unwrap_or_else(|| "Regular Season".to_string());

    match db::query_player_game_logs(&state.pool, &name, &season, &season_type).await {
        Ok(rows) => match summarize(&name, &rows) {
            Some(summary) => Ok(Json(ApiResponse::success(summary))),
            // Absent, not zero: the client shows "no data available".
            None => Ok(Json(ApiResponse::error(format!(
                "No game log data for {} in {} {}",
                name, season, season_type
            )))),
        },
        Err(e) => {
            tracing::error!("Failed to fetch game logs for {}: {}", name, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn cached_roster(state: &AppState) -> anyhow::Result<HashMap<String, String>> {
    if let Some(roster) = state.roster_cache.lock().await.get(&"roster") {
        return Ok(roster);
    }

    let roster = db::query_team_by_player(&state.pool).await?;
    state
        .roster_cache
        .lock()
        .await
        .insert("roster", roster.clone());
    Ok(roster)
}
