use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::models::{BaselineMetric, Matchup, PlayerStatsSummary, PropQuote, StatCategory};
use crate::services::best_price::best_prices;
use crate::services::prop_grouping::{group_by_team, group_props_by_player};
use crate::services::stats_summarizer::summarize_from_db;
use crate::services::value_indicator::{ValueDirection, ValueIndicator};

/// One classified (line, side) entry in a player's props table.
#[derive(Debug, Clone, Serialize)]
pub struct PropValueRow {
    pub line: f64,
    pub over_under: String,
    pub bookmaker: String,
    pub price: f64,
    pub value_direction: ValueDirection,
    pub glyph: &'static str,
}

/// One player's baseline and ranked prop rows. `baseline` is None when no
/// summary exists for the player — an explicit insufficient-data state the
/// UI must show as such, never as a zero.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPropsView {
    pub player_name: String,
    pub baseline: Option<f64>,
    pub rows: Vec<PropValueRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamPropsView {
    pub team: String,
    pub players: Vec<PlayerPropsView>,
}

/// The matchup-centric value overview: both teams' players with best
/// prices and value indicators, plus operator-visible warnings.
#[derive(Debug, Serialize)]
pub struct PropsOverview {
    pub matchup: Matchup,
    pub prop_type: String,
    pub metric: BaselineMetric,
    pub odds_updated_at: Option<DateTime<Utc>>,
    pub home: TeamPropsView,
    pub away: TeamPropsView,
    pub warnings: Vec<String>,
}

/// Assemble the overview from already-fetched data. Pure: no I/O, no
/// clocks, safe to cache or recompute at will.
pub fn build_props_overview(
    matchup: Matchup,
    odds_updated_at: Option<DateTime<Utc>>,
    quotes: Vec<PropQuote>,
    roster: &HashMap<String, String>,
    summaries: &HashMap<String, PlayerStatsSummary>,
    prop_type: &str,
    metric: BaselineMetric,
) -> PropsOverview {
    let props_by_player = group_props_by_player(quotes);
    let groups = group_by_team(
        props_by_player,
        roster,
        &matchup.home_team,
        &matchup.away_team,
    );

    let mut warnings: Vec<String> = groups
        .missing_roster
        .iter()
        .map(|name| format!("No player team available for {}", name))
        .collect();

    let home = team_view(
        &matchup.home_team,
        groups.home,
        summaries,
        prop_type,
        metric,
        &mut warnings,
    );
    let away = team_view(
        &matchup.away_team,
        groups.away,
        summaries,
        prop_type,
        metric,
        &mut warnings,
    );

    PropsOverview {
        matchup,
        prop_type: prop_type.to_string(),
        metric,
        odds_updated_at,
        home,
        away,
        warnings,
    }
}

fn team_view(
    team: &str,
    team_players: HashMap<String, Vec<PropQuote>>,
    summaries: &HashMap<String, PlayerStatsSummary>,
    prop_type: &str,
    metric: BaselineMetric,
    warnings: &mut Vec<String>,
) -> TeamPropsView {
    let stat = StatCategory::parse(prop_type);

    let mut players = Vec::new();
    for (player_name, props) in team_players {
        let selected: Vec<PropQuote> = props
            .into_iter()
            .filter(|p| p.prop_type.eq_ignore_ascii_case(prop_type))
            .collect();
        if selected.is_empty() {
            continue;
        }

        let baseline = summaries
            .get(&player_name)
            .and_then(|s| stat.and_then(|stat| s.baseline(stat, metric)));

        let Some(baseline) = baseline else {
            warnings.push(format!("No stats available for {}", player_name));
            players.push(PlayerPropsView {
                player_name,
                baseline: None,
                rows: Vec::new(),
            });
            continue;
        };

        let (best_over, best_under) = best_prices(&selected);

        let mut rows = Vec::new();
        for (side, best_by_line) in [("over", best_over), ("under", best_under)] {
            for (line, best) in best_by_line {
                let indicator = ValueIndicator::new(prop_type, line.0, side, baseline);
                let direction = indicator.value_direction();
                rows.push(PropValueRow {
                    line: line.0,
                    over_under: side.to_string(),
                    bookmaker: best.bookmaker,
                    price: best.price,
                    value_direction: direction,
                    glyph: indicator.glyph(),
                });
            }
        }

        // Best value first, then by line for stable display.
        rows.sort_by(|a, b| {
            a.value_direction
                .sort_rank()
                .cmp(&b.value_direction.sort_rank())
                .then(a.line.total_cmp(&b.line))
        });

        players.push(PlayerPropsView {
            player_name,
            baseline: Some(baseline),
            rows,
        });
    }

    players.sort_by(|a, b| a.player_name.cmp(&b.player_name));

    TeamPropsView {
        team: team.to_string(),
        players,
    }
}

/// Fetch everything the overview needs and assemble it. Returns None when
/// the matchup is unknown.
pub async fn fetch_props_overview(
    pool: &SqlitePool,
    game_id: &str,
    prop_type: &str,
    metric: BaselineMetric,
    season: &str,
    season_type: &str,
) -> Result<Option<PropsOverview>> {
    let Some(matchup) = db::get_matchup_by_id(pool, game_id).await? else {
        return Ok(None);
    };

    let quotes = db::get_latest_props_for_game(pool, game_id).await?;
    let odds_updated_at = db::get_latest_odds_update_time(pool, game_id).await?;
    let roster = db::query_team_by_player(pool).await?;

    let player_names: Vec<String> = {
        let mut names: Vec<String> = quotes.iter().map(|q| q.player_name.clone()).collect();
        names.sort();
        names.dedup();
        names
    };
    let summaries = summarize_from_db(pool, &player_names, season, season_type).await;

    Ok(Some(build_props_overview(
        matchup,
        odds_updated_at,
        quotes,
        &roster,
        &summaries,
        prop_type,
        metric,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stats_summarizer::summarize;
    use chrono::{NaiveDate, TimeZone};
    use crate::models::GameLogRow;

    fn matchup() -> Matchup {
        Matchup {
            game_id: "game-1".to_string(),
            home_team: "Liberty".to_string(),
            away_team: "Aces".to_string(),
            commence_time_utc: Utc.with_ymd_and_hms(2025, 6, 15, 23, 0, 0).unwrap(),
            derived_game_name: "Aces @ Liberty".to_string(),
        }
    }

    fn quote(player: &str, line: f64, over: Option<f64>, under: Option<f64>) -> PropQuote {
        let batch = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        PropQuote {
            game_id: "game-1".to_string(),
            player_name: player.to_string(),
            prop_type: "Points".to_string(),
            line,
            over_odds: over,
            under_odds: under,
            bookmaker: "draftkings".to_string(),
            collected_at_utc: batch,
            batch_time_utc: batch,
        }
    }

    fn summary_with_points(player: &str, points: &[i64]) -> PlayerStatsSummary {
        let rows: Vec<GameLogRow> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| GameLogRow {
                player_id: 1,
                player_name: player.to_string(),
                game_id: format!("g{}", i),
                game_date: NaiveDate::from_ymd_opt(2025, 6, 1 + i as u32).unwrap(),
                matchup: "X vs. Y".to_string(),
                season: "2025".to_string(),
                season_type: "Regular Season".to_string(),
                points: p,
                assists: 0,
                rebounds: 0,
                three_pointers_made: 0,
                minutes: 30.0,
            })
            .collect();
        summarize(player, &rows).unwrap()
    }

    #[test]
    fn test_overview_classifies_and_ranks_rows() {
        // Baseline 20.0 points; the 17.5-over line is strong value, the
        // 20.5-over line is neutral.
        let roster = HashMap::from([("Home Star".to_string(), "Liberty".to_string())]);
        let summaries = HashMap::from([(
            "Home Star".to_string(),
            summary_with_points("Home Star", &[20, 20, 20, 20, 20]),
        )]);
        let quotes = vec![
            quote("Home Star", 20.5, Some(-110.0), None),
            quote("Home Star", 17.5, Some(-125.0), None),
        ];

        let overview = build_props_overview(
            matchup(),
            None,
            quotes,
            &roster,
            &summaries,
            "Points",
            BaselineMetric::SeasonAverage,
        );

        assert_eq!(overview.home.players.len(), 1);
        let player = &overview.home.players[0];
        assert_eq!(player.baseline, Some(20.0));
        assert_eq!(player.rows.len(), 2);
        // Strong positive ranks ahead of neutral.
        assert_eq!(player.rows[0].line, 17.5);
        assert_eq!(
            player.rows[0].value_direction,
            ValueDirection::StrongPositive
        );
        assert_eq!(player.rows[1].value_direction, ValueDirection::Neutral);
        assert!(overview.away.players.is_empty());
    }

    #[test]
    fn test_overview_reports_roster_miss_once() {
        let roster = HashMap::new();
        let summaries = HashMap::new();
        let quotes = vec![
            quote("Mystery Player", 20.5, Some(-110.0), None),
            quote("Mystery Player", 21.5, Some(-110.0), None),
        ];

        let overview = build_props_overview(
            matchup(),
            None,
            quotes,
            &roster,
            &summaries,
            "Points",
            BaselineMetric::Last5Average,
        );

        assert!(overview.home.players.is_empty());
        assert!(overview.away.players.is_empty());
        assert_eq!(
            overview.warnings,
            vec!["No player team available for Mystery Player".to_string()]
        );
    }

    #[test]
    fn test_overview_marks_missing_stats_explicitly() {
        let roster = HashMap::from([("Home Star".to_string(), "Liberty".to_string())]);
        let summaries = HashMap::new();
        let quotes = vec![quote("Home Star", 20.5, Some(-110.0), Some(-110.0))];

        let overview = build_props_overview(
            matchup(),
            None,
            quotes,
            &roster,
            &summaries,
            "Points",
            BaselineMetric::SeasonMedian,
        );

        let player = &overview.home.players[0];
        assert_eq!(player.baseline, None);
        assert!(player.rows.is_empty());
        assert!(overview
            .warnings
            .iter()
            .any(|w| w.contains("No stats available for Home Star")));
    }

    #[test]
    fn test_overview_skips_players_without_selected_prop_type() {
        let roster = HashMap::from([("Home Star".to_string(), "Liberty".to_string())]);
        let summaries = HashMap::from([(
            "Home Star".to_string(),
            summary_with_points("Home Star", &[20, 20]),
        )]);
        let quotes = vec![quote("Home Star", 20.5, Some(-110.0), None)];

        let overview = build_props_overview(
            matchup(),
            None,
            quotes,
            &roster,
            &summaries,
            "Rebounds",
            BaselineMetric::SeasonAverage,
        );

        assert!(overview.home.players.is_empty());
    }
}
