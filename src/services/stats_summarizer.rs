use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db::query_player_game_logs;
use crate::models::{GameLogRow, PlayerStatsSummary, StatCategory};
use crate::utils::round2;

/// Reduces a player's game log to baseline metrics: season average, season
/// median, last-5 average, and last-10 average per stat category.
///
/// All outputs are rounded to 2 decimal places, half away from zero. The
/// last-N windows fall back to the season average (exact equality, not an
/// average over fewer rows) when fewer than N games exist.
pub fn summarize(player_name: &str, rows: &[GameLogRow]) -> Option<PlayerStatsSummary> {
    if rows.is_empty() {
        // Absent summary, never a zero-valued one: callers must treat this
        // as "skip this player", not "baseline is zero".
        return None;
    }

    let player_id = rows[0].player_id;

    // Most recent first, so the last-N windows are simple prefixes.
    let mut sorted: Vec<&GameLogRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.game_date.cmp(&a.game_date));

    let mut season_avg_by_stat = HashMap::new();
    let mut season_median_by_stat = HashMap::new();
    let mut last_5_avg_by_stat = HashMap::new();
    let mut last_10_avg_by_stat = HashMap::new();

    for stat in StatCategory::ALL {
        let values: Vec<f64> = sorted.iter().map(|r| stat.value_in(r) as f64).collect();

        let season_avg = round2(mean(&values));
        season_avg_by_stat.insert(stat, season_avg);
        season_median_by_stat.insert(stat, round2(median(&values)));

        let last_5 = if values.len() >= 5 {
            round2(mean(&values[..5]))
        } else {
            season_avg
        };
        last_5_avg_by_stat.insert(stat, last_5);

        let last_10 = if values.len() >= 10 {
            round2(mean(&values[..10]))
        } else {
            season_avg
        };
        last_10_avg_by_stat.insert(stat, last_10);
    }

    Some(PlayerStatsSummary {
        player_id,
        player_name: player_name.to_string(),
        season_avg_by_stat,
        season_median_by_stat,
        last_5_avg_by_stat,
        last_10_avg_by_stat,
    })
}

/// Summarize many players' game logs, one summary per player.
///
/// Players are processed independently: an empty game log is omitted from
/// the output and logged, the rest of the batch continues.
pub fn summarize_players(
    rows_by_player: &HashMap<String, Vec<GameLogRow>>,
) -> HashMap<String, PlayerStatsSummary> {
    let mut summaries = HashMap::new();

    for (player_name, rows) in rows_by_player {
        match summarize(player_name, rows) {
            Some(summary) => {
                summaries.insert(player_name.clone(), summary);
            }
            None => {
                tracing::warn!("No game log rows for {}, skipping summary", player_name);
            }
        }
    }

    summaries
}

/// Query each player's game log and summarize it. Players are independent:
/// a query failure is logged and the player omitted, the batch continues.
pub async fn summarize_from_db(
    pool: &SqlitePool,
    player_names: &[String],
    season: &str,
    season_type: &str,
) -> HashMap<String, PlayerStatsSummary> {
    let mut rows_by_player = HashMap::new();

    for player_name in player_names {
        match query_player_game_logs(pool, player_name, season, season_type).await {
            Ok(rows) => {
                rows_by_player.insert(player_name.clone(), rows);
            }
            Err(e) => {
                tracing::error!("Error querying stats for {}: {}", player_name, e);
            }
        }
    }

    summarize_players(&rows_by_player)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median over a non-empty slice; even counts average the two middle values.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
