pub mod seed;
pub use seed::seed_data;

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};

use crate::models::{GameLogRow, Matchup, PropQuote};
use crate::utils::parse_minutes;

/// The pool is created once at process start and passed by reference to
/// every repository function; there is no hidden global handle.
pub async fn create_pool() -> Result<SqlitePool> {
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/props_hub.db".to_string());

    // Strip the "sqlite:" prefix to get the file path, create parent dir if needed
    let file_path = database_url
        .strip_prefix("sqlite:///")
        .or_else(|| database_url.strip_prefix("sqlite://"))
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(&database_url);

    if let Some(parent) = std::path::Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;
    Ok(pool)
}

/// Called from the CLI where no pool exists yet.
pub async fn init_database() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await
}

pub async fn init_database_with_pool(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            player_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            team TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_stats (
            id TEXT PRIMARY KEY,
            player_id INTEGER NOT NULL,
            game_id TEXT NOT NULL,
            game_date TEXT NOT NULL,
            matchup TEXT NOT NULL,
            season TEXT NOT NULL,
            season_type TEXT NOT NULL,
            points INTEGER NOT NULL DEFAULT 0,
            assists INTEGER NOT NULL DEFAULT 0,
            rebounds INTEGER NOT NULL DEFAULT 0,
            three_pointers_made INTEGER NOT NULL DEFAULT 0,
            minutes TEXT,
            FOREIGN KEY (player_id) REFERENCES players (player_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            sport_key TEXT NOT NULL,
            commence_time_utc TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            derived_game_name TEXT NOT NULL,
            created_at_utc TEXT NOT NULL,
            updated_at_utc TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // player_props keeps every scraping batch; readers filter to the most
    // recent batch_time_utc per game so stale quotes never mix with current
    // ones.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS player_props (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id TEXT NOT NULL,
            player_name TEXT NOT NULL,
            prop_type TEXT NOT NULL,
            line REAL NOT NULL,
            over_odds REAL,
            under_odds REAL,
            bookmaker TEXT NOT NULL,
            collected_at_utc TEXT NOT NULL,
            batch_time_utc TEXT NOT NULL,
            FOREIGN KEY (game_id) REFERENCES events (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_game_stats_player ON game_stats(player_id, season, season_type)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_props_game_batch ON player_props(game_id, batch_time_utc)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_commence ON events(commence_time_utc)")
        .execute(pool)
        .await?;

    tracing::info!("Database initialized successfully");
    Ok(())
}

// Player / roster operations

pub async fn insert_player(pool: &SqlitePool, player_id: i64, name: &str, team: &str) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO players (player_id, name, team) VALUES (?, ?, ?)")
        .bind(player_id)
        .bind(name)
        .bind(team)
        .execute(pool)
        .await?;
    Ok(())
}

/// Roster provider: player name → team name for every known player.
pub async fn query_team_by_player(pool: &SqlitePool) -> Result<HashMap<String, String>> {
    let rows = sqlx::query("SELECT name, team FROM players")
        .fetch_all(pool)
        .await?;

    let mut roster = HashMap::new();
    for row in rows {
        roster.insert(row.get("name"), row.get("team"));
    }
    Ok(roster)
}

// Game log operations

pub async fn insert_game_log(
    pool: &SqlitePool,
    row: &GameLogRow,
    raw_minutes: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO game_stats
        (id, player_id, game_id, game_date, matchup, season, season_type,
         points, assists, rebounds, three_pointers_made, minutes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(row.player_id)
    .bind(&row.game_id)
    .bind(row.game_date.format("%Y-%m-%d").to_string())
    .bind(&row.matchup)
    .bind(&row.season)
    .bind(&row.season_type)
    .bind(row.points)
    .bind(row.assists)
    .bind(row.rebounds)
    .bind(row.three_pointers_made)
    .bind(raw_minutes)
    .execute(pool)
    .await?;
    Ok(())
}

/// Game-log provider: all of one player's games for a season and season
/// type. Rows with malformed fields (unparseable minutes or dates) are
/// skipped with a warning so one bad row never sinks the player.
pub async fn query_player_game_logs(
    pool: &SqlitePool,
    player_name: &str,
    season: &str,
    season_type: &str,
) -> Result<Vec<GameLogRow>> {
    let rows = sqlx::query(
        r#"
        SELECT p.player_id, p.name, g.game_id, g.game_date, g.matchup,
               g.season, g.season_type, g.points, g.assists, g.rebounds,
               g.three_pointers_made, g.minutes
        FROM game_stats g
        JOIN players p ON p.player_id = g.player_id
        WHERE p.name = ? AND g.season = ? AND g.season_type = ?
        "#,
    )
    .bind(player_name)
    .bind(season)
    .bind(season_type)
    .fetch_all(pool)
    .await?;

    let mut logs = Vec::new();
    for row in rows {
        let game_id: String = row.get("game_id");

        let raw_date: String = row.get("game_date");
        let game_date = match NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Skipping game {} for {}: bad date {:?} ({})", game_id, player_name, raw_date, e);
                continue;
            }
        };

        let raw_minutes: Option<String> = row.get("minutes");
        let minutes = match parse_minutes(raw_minutes.as_deref().unwrap_or("0")) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping game {} for {}: {}", game_id, player_name, e);
                continue;
            }
        };

        logs.push(GameLogRow {
            player_id: row.get("player_id"),
            player_name: row.get("name"),
            game_id,
            game_date,
            matchup: row.get("matchup"),
            season: row.get("season"),
            season_type: row.get("season_type"),
            points: row.get("points"),
            assists: row.get("assists"),
            rebounds: row.get("rebounds"),
            three_pointers_made: row.get("three_pointers_made"),
            minutes,
        });
    }

    Ok(logs)
}

// Event / matchup operations

pub async fn insert_event(pool: &SqlitePool, matchup: &Matchup, sport_key: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO events
        (id, sport_key, commence_time_utc, home_team, away_team, derived_game_name,
         created_at_utc, updated_at_utc)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&matchup.game_id)
    .bind(sport_key)
    .bind(matchup.commence_time_utc.to_rfc3339())
    .bind(&matchup.home_team)
    .bind(&matchup.away_team)
    .bind(&matchup.derived_game_name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Matchup provider: events whose commence time is still in the future.
pub async fn get_future_matchups(pool: &SqlitePool) -> Result<Vec<Matchup>> {
    let now = Utc::now().to_rfc3339();
    let rows = sqlx::query(
        "SELECT id, home_team, away_team, commence_time_utc, derived_game_name
         FROM events WHERE commence_time_utc > ? ORDER BY commence_time_utc ASC",
    )
    .bind(&now)
    .fetch_all(pool)
    .await?;

    let mut matchups = Vec::new();
    for row in rows {
        matchups.push(matchup_from_row(&row)?);
    }
    Ok(matchups)
}

pub async fn get_matchup_by_id(pool: &SqlitePool, game_id: &str) -> Result<Option<Matchup>> {
    let row = sqlx::query(
        "SELECT id, home_team, away_team, commence_time_utc, derived_game_name
         FROM events WHERE id = ?",
    )
    .bind(game_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| matchup_from_row(&r)).transpose()
}

fn matchup_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Matchup> {
    Ok(Matchup {
        game_id: row.get("id"),
        home_team: row.get("home_team"),
        away_team: row.get("away_team"),
        commence_time_utc: DateTime::parse_from_rfc3339(&row.get::<String, _>("commence_time_utc"))?
            .with_timezone(&Utc),
        derived_game_name: row.get("derived_game_name"),
    })
}

// Prop quote operations

pub async fn insert_prop_quote(pool: &SqlitePool, quote: &PropQuote) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO player_props
        (game_id, player_name, prop_type, line, over_odds, under_odds, bookmaker,
         collected_at_utc, batch_time_utc)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&quote.game_id)
    .bind(&quote.player_name)
    .bind(&quote.prop_type)
    .bind(quote.line)
    .bind(quote.over_odds)
    .bind(quote.under_odds)
    .bind(&quote.bookmaker)
    .bind(quote.collected_at_utc.to_rfc3339())
    .bind(quote.batch_time_utc.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

/// Quote provider: all quotes for a game from its most recent scraping
/// batch only. Earlier batches never reach the aggregation layer.
pub async fn get_latest_props_for_game(
    pool: &SqlitePool,
    game_id: &str,
) -> Result<Vec<PropQuote>> {
    let rows = sqlx::query(
        r#"
        SELECT game_id, player_name, prop_type, line, over_odds, under_odds,
               bookmaker, collected_at_utc, batch_time_utc
        FROM player_props
        WHERE game_id = ?
          AND batch_time_utc = (
              SELECT MAX(batch_time_utc) FROM player_props WHERE game_id = ?
          )
        "#,
    )
    .bind(game_id)
    .bind(game_id)
    .fetch_all(pool)
    .await?;

    let mut quotes = Vec::new();
    for row in rows {
        quotes.push(PropQuote {
            game_id: row.get("game_id"),
            player_name: row.get("player_name"),
            prop_type: row.get("prop_type"),
            line: row.get("line"),
            over_odds: row.get("over_odds"),
            under_odds: row.get("under_odds"),
            bookmaker: row.get("bookmaker"),
            collected_at_utc: DateTime::parse_from_rfc3339(
                &row.get::<String, _>("collected_at_utc"),
            )?
            .with_timezone(&Utc),
            batch_time_utc: DateTime::parse_from_rfc3339(&row.get::<String, _>("batch_time_utc"))?
                .with_timezone(&Utc),
        });
    }
    Ok(quotes)
}

/// When the latest scraping batch for a game ran, or None when no quotes
/// exist for it.
pub async fn get_latest_odds_update_time(
    pool: &SqlitePool,
    game_id: &str,
) -> Result<Option<DateTime<Utc>>> {
    let latest: Option<String> =
        sqlx::query_scalar("SELECT MAX(batch_time_utc) FROM player_props WHERE game_id = ?")
            .bind(game_id)
            .fetch_one(pool)
            .await?;

    Ok(latest
        .map(|ts| DateTime::parse_from_rfc3339(&ts).map(|d| d.with_timezone(&Utc)))
        .transpose()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        init_database_with_pool(&pool).await.unwrap();
        pool
    }

    fn quote_at_batch(bookmaker: &str, batch: DateTime<Utc>) -> PropQuote {
        PropQuote {
            game_id: "game-1".to_string(),
            player_name: "Test Player".to_string(),
            prop_type: "Points".to_string(),
            line: 18.5,
            over_odds: Some(-110.0),
            under_odds: Some(-110.0),
            bookmaker: bookmaker.to_string(),
            collected_at_utc: batch,
            batch_time_utc: batch,
        }
    }

    #[tokio::test]
    async fn test_latest_props_exclude_stale_batches() {
        let pool = memory_pool().await;
        let stale = Utc.with_ymd_and_hms(2025, 6, 14, 6, 0, 0).unwrap();
        let current = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();

        insert_prop_quote(&pool, &quote_at_batch("draftkings", stale))
            .await
            .unwrap();
        insert_prop_quote(&pool, &quote_at_batch("fanduel", stale))
            .await
            .unwrap();
        insert_prop_quote(&pool, &quote_at_batch("betmgm", current))
            .await
            .unwrap();

        let quotes = get_latest_props_for_game(&pool, "game-1").await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].bookmaker, "betmgm");
        assert_eq!(quotes[0].batch_time_utc, current);

        let latest = get_latest_odds_update_time(&pool, "game-1")
            .await
            .unwrap();
        assert_eq!(latest, Some(current));
    }

    #[tokio::test]
    async fn test_no_quotes_means_no_update_time() {
        let pool = memory_pool().await;
        let latest = get_latest_odds_update_time(&pool, "missing-game")
            .await
            .unwrap();
        assert_eq!(latest, None);
    }

    #[tokio::test]
    async fn test_game_log_roundtrip_and_minutes_normalization() {
        let pool = memory_pool().await;
        insert_player(&pool, 7, "Test Player", "Liberty")
            .await
            .unwrap();

        let row = GameLogRow {
            player_id: 7,
            player_name: "Test Player".to_string(),
            game_id: "g1".to_string(),
            game_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            matchup: "NYL vs. LVA".to_string(),
            season: "2025".to_string(),
            season_type: "Regular Season".to_string(),
            points: 24,
            assists: 5,
            rebounds: 8,
            three_pointers_made: 3,
            minutes: 0.0,
        };
        insert_game_log(&pool, &row, "34:30").await.unwrap();

        let logs = query_player_game_logs(&pool, "Test Player", "2025", "Regular Season")
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].minutes, 34.5);
        assert_eq!(logs[0].points, 24);
    }

    #[tokio::test]
    async fn test_malformed_minutes_row_is_skipped() {
        let pool = memory_pool().await;
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        insert_player(&pool, 7, "Test Player", "Liberty")
            .await
            .unwrap();

        let good = GameLogRow {
            player_id: 7,
            player_name: "Test Player".to_string(),
            game_id: "g1".to_string(),
            game_date: date,
            matchup: "NYL vs. LVA".to_string(),
            season: "2025".to_string(),
            season_type: "Regular Season".to_string(),
            points: 24,
            assists: 5,
            rebounds: 8,
            three_pointers_made: 3,
            minutes: 0.0,
        };
        let bad = GameLogRow {
            game_id: "g2".to_string(),
            ..good.clone()
        };

        insert_game_log(&pool, &good, "30").await.unwrap();
        insert_game_log(&pool, &bad, "DNP").await.unwrap();

        let logs = query_player_game_logs(&pool, "Test Player", "2025", "Regular Season")
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].game_id, "g1");
    }
}
