use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::db::{insert_event, insert_game_log, insert_player, insert_prop_quote};
use crate::models::{GameLogRow, Matchup, PropQuote};

struct SeedPlayer {
    player_id: i64,
    name: &'static str,
    team: &'static str,
    /// One entry per game, oldest first: (points, rebounds, assists, threes, minutes).
    games: &'static [(i64, i64, i64, i64, &'static str)],
}

const SEED_PLAYERS: &[SeedPlayer] = &[
    SeedPlayer {
        player_id: 1,
        name: "Breanna Stewart",
        team: "New York Liberty",
        games: &[
            (18, 9, 3, 1, "33:12"),
            (24, 7, 4, 2, "35:40"),
            (21, 10, 5, 1, "34:02"),
            (27, 8, 3, 3, "36:15"),
            (15, 11, 6, 0, "31:48"),
            (22, 9, 4, 2, "34:30"),
            (30, 12, 2, 4, "38:01"),
            (19, 8, 5, 1, "33:55"),
            (25, 10, 3, 2, "35:22"),
            (20, 7, 4, 1, "32:44"),
            (28, 9, 6, 3, "37:10"),
            (23, 11, 4, 2, "34:58"),
        ],
    },
    SeedPlayer {
        player_id: 2,
        name: "Sabrina Ionescu",
        team: "New York Liberty",
        games: &[
            (16, 4, 7, 2, "32:20"),
            (22, 5, 8, 4, "34:11"),
            (19, 3, 6, 3, "33:05"),
            (25, 6, 9, 5, "36:40"),
            (14, 4, 5, 2, "29:58"),
            (20, 5, 7, 3, "33:30"),
            (18, 3, 8, 2, "32:46"),
        ],
    },
    SeedPlayer {
        player_id: 3,
        name: "A'ja Wilson",
        team: "Las Vegas Aces",
        games: &[
            (26, 11, 2, 0, "34:50"),
            (31, 13, 3, 1, "36:22"),
            (24, 10, 4, 0, "33:15"),
            (28, 12, 2, 0, "35:08"),
            (33, 14, 3, 1, "37:41"),
            (27, 11, 5, 0, "34:33"),
            (29, 12, 2, 1, "35:56"),
            (22, 9, 3, 0, "32:19"),
            (30, 13, 4, 0, "36:02"),
            (26, 10, 2, 1, "34:27"),
            (35, 15, 3, 0, "38:14"),
        ],
    },
    // Only three games logged: exercises the last-5/last-10 fallback to
    // the season average.
    SeedPlayer {
        player_id: 4,
        name: "Jackie Young",
        team: "Las Vegas Aces",
        games: &[
            (17, 4, 5, 2, "31:02"),
            (21, 5, 6, 3, "33:47"),
            (13, 3, 4, 1, "28:30"),
        ],
    },
    SeedPlayer {
        player_id: 5,
        name: "Napheesa Collier",
        team: "Minnesota Lynx",
        games: &[
            (23, 9, 3, 1, "34:18"),
            (27, 10, 4, 2, "35:52"),
            (21, 8, 3, 1, "33:09"),
            (25, 11, 5, 2, "36:25"),
            (19, 7, 2, 0, "31:36"),
            (24, 9, 4, 1, "34:44"),
        ],
    },
    SeedPlayer {
        player_id: 6,
        name: "Nneka Ogwumike",
        team: "Seattle Storm",
        games: &[
            (15, 7, 2, 0, "29:40"),
            (18, 8, 3, 1, "31:25"),
            (14, 6, 2, 0, "28:52"),
            (20, 9, 4, 1, "32:37"),
            (16, 7, 3, 0, "30:14"),
        ],
    },
];

async fn seed_game_logs(pool: &SqlitePool) -> Result<()> {
    let last_game_date = NaiveDate::from_ymd_opt(2025, 6, 12).expect("valid seed date");

    for player in SEED_PLAYERS {
        insert_player(pool, player.player_id, player.name, player.team).await?;

        let total = player.games.len() as i64;
        for (i, &(points, rebounds, assists, threes, minutes)) in player.games.iter().enumerate() {
            // Oldest game first; every other game on the road.
            let game_date = last_game_date - chrono::Days::new((total as u64 - 1 - i as u64) * 2);
            let matchup = if i % 2 == 0 {
                format!("{} vs. OPP", player.team)
            } else {
                format!("{} @ OPP", player.team)
            };

            let row = GameLogRow {
                player_id: player.player_id,
                player_name: player.name.to_string(),
                game_id: format!("log-{}-{}", player.player_id, i),
                game_date,
                matchup,
                season: "2025".to_string(),
                season_type: "Regular Season".to_string(),
                points,
                assists,
                rebounds,
                three_pointers_made: threes,
                minutes: 0.0, // stored raw below, normalized on read
            };
            insert_game_log(pool, &row, minutes).await?;
        }
    }

    Ok(())
}

async fn seed_events(pool: &SqlitePool) -> Result<(Matchup, Matchup)> {
    let game_1 = Matchup {
        game_id: "wnba-nyl-lva-20250615".to_string(),
        home_team: "New York Liberty".to_string(),
        away_team: "Las Vegas Aces".to_string(),
        commence_time_utc: Utc::now() + Duration::hours(30),
        derived_game_name: Matchup::derive_game_name("Las Vegas Aces", "New York Liberty"),
    };
    let game_2 = Matchup {
        game_id: "wnba-min-sea-20250616".to_string(),
        home_team: "Minnesota Lynx".to_string(),
        away_team: "Seattle Storm".to_string(),
        commence_time_utc: Utc::now() + Duration::hours(54),
        derived_game_name: Matchup::derive_game_name("Seattle Storm", "Minnesota Lynx"),
    };

    insert_event(pool, &game_1, "basketball_wnba").await?;
    insert_event(pool, &game_2, "basketball_wnba").await?;
    Ok((game_1, game_2))
}

async fn seed_props(pool: &SqlitePool, game_1: &Matchup, game_2: &Matchup) -> Result<()> {
    let current_batch = Utc::now() - Duration::hours(2);
    let stale_batch = current_batch - Duration::hours(6);

    // (player, line, over, under, bookmaker) for the current batch.
    let current_quotes: &[(&str, f64, Option<f64>, Option<f64>, &str)] = &[
        ("Breanna Stewart", 21.5, Some(-110.0), Some(-110.0), "draftkings"),
        ("Breanna Stewart", 21.5, Some(-105.0), Some(-115.0), "fanduel"),
        ("Breanna Stewart", 22.5, Some(102.0), Some(-122.0), "betmgm"),
        ("Sabrina Ionescu", 18.5, Some(-112.0), Some(-108.0), "draftkings"),
        ("Sabrina Ionescu", 19.5, Some(105.0), None, "betmgm"),
        ("A'ja Wilson", 27.5, Some(-108.0), Some(-112.0), "draftkings"),
        ("A'ja Wilson", 27.5, Some(-108.0), Some(-110.0), "fanduel"),
        ("A'ja Wilson", 28.5, None, Some(-104.0), "betmgm"),
        ("Jackie Young", 16.5, Some(-110.0), Some(-110.0), "fanduel"),
        // No roster entry for this player: exercises the grouping warning.
        ("Chelsea Gray", 11.5, Some(-115.0), Some(-105.0), "draftkings"),
    ];

    for &(player, line, over, under, bookmaker) in current_quotes {
        insert_prop_quote(
            pool,
            &PropQuote {
                game_id: game_1.game_id.clone(),
                player_name: player.to_string(),
                prop_type: "Points".to_string(),
                line,
                over_odds: over,
                under_odds: under,
                bookmaker: bookmaker.to_string(),
                collected_at_utc: current_batch,
                batch_time_utc: current_batch,
            },
        )
        .await?;
    }

    // A stale batch with deliberately different prices; the reader must
    // never surface these.
    insert_prop_quote(
        pool,
        &PropQuote {
            game_id: game_1.game_id.clone(),
            player_name: "Breanna Stewart".to_string(),
            prop_type: "Points".to_string(),
            line: 20.5,
            over_odds: Some(-140.0),
            under_odds: Some(120.0),
            bookmaker: "draftkings".to_string(),
            collected_at_utc: stale_batch,
            batch_time_utc: stale_batch,
        },
    )
    .await?;

    insert_prop_quote(
        pool,
        &PropQuote {
            game_id: game_2.game_id.clone(),
            player_name: "Napheesa Collier".to_string(),
            prop_type: "Points".to_string(),
            line: 23.5,
            over_odds: Some(-110.0),
            under_odds: Some(-110.0),
            bookmaker: "draftkings".to_string(),
            collected_at_utc: current_batch,
            batch_time_utc: current_batch,
        },
    )
    .await?;

    insert_prop_quote(
        pool,
        &PropQuote {
            game_id: game_2.game_id.clone(),
            player_name: "Nneka Ogwumike".to_string(),
            prop_type: "Points".to_string(),
            line: 15.5,
            over_odds: Some(-118.0),
            under_odds: Some(-102.0),
            bookmaker: "fanduel".to_string(),
            collected_at_utc: current_batch,
            batch_time_utc: current_batch,
        },
    )
    .await?;

    Ok(())
}

pub async fn seed_data(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::info!("Seed skipped: {} players already present", count);
        return Ok(());
    }

    seed_game_logs(pool).await?;
    let (game_1, game_2) = seed_events(pool).await?;
    seed_props(pool, &game_1, &game_2).await?;

    tracing::info!(
        "Seeded {} players with game logs, 2 matchups, and sample prop quotes",
        SEED_PLAYERS.len()
    );
    Ok(())
}
