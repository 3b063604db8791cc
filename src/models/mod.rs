use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One player's performance in one game, already filtered to a single
/// season and season type by the repository that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogRow {
    pub player_id: i64,
    pub player_name: String,
    pub game_id: String,
    pub game_date: NaiveDate,
    /// "NYL vs. LVA" for a home game, "NYL @ LVA" for an away game.
    pub matchup: String,
    pub season: String,
    pub season_type: String, // "Regular Season", "Playoffs", "Preseason"
    pub points: i64,
    pub assists: i64,
    pub rebounds: i64,
    pub three_pointers_made: i64,
    /// Normalized from the stored "MM:SS" or plain-numeric form.
    pub minutes: f64,
}

/// The four stat categories tracked for baselines and prop classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
    ThreePointersMade,
}

impl StatCategory {
    pub const ALL: [StatCategory; 4] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Assists,
        StatCategory::ThreePointersMade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::Points => "points",
            StatCategory::Rebounds => "rebounds",
            StatCategory::Assists => "assists",
            StatCategory::ThreePointersMade => "three_pointers_made",
        }
    }

    /// Lenient mapping from prop-type strings as stored by sportsbooks
    /// ("Points", "rebounds", "Three Pointers Made"). Unknown → None.
    pub fn parse(s: &str) -> Option<StatCategory> {
        let norm = s.trim().to_lowercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "points" => Some(StatCategory::Points),
            "rebounds" => Some(StatCategory::Rebounds),
            "assists" => Some(StatCategory::Assists),
            "three_pointers_made" | "threes" | "3pm" => Some(StatCategory::ThreePointersMade),
            _ => None,
        }
    }

    pub fn value_in(&self, row: &GameLogRow) -> i64 {
        match self {
            StatCategory::Points => row.points,
            StatCategory::Rebounds => row.rebounds,
            StatCategory::Assists => row.assists,
            StatCategory::ThreePointersMade => row.three_pointers_made,
        }
    }
}

/// Which baseline to read out of a summary. An exhaustive enum so there is
/// no silent zero fallback for an unrecognized metric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMetric {
    SeasonAverage,
    SeasonMedian,
    Last5Average,
    Last10Average,
}

impl BaselineMetric {
    pub fn parse(s: &str) -> Option<BaselineMetric> {
        let norm = s.trim().to_lowercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "season_average" | "season_avg" => Some(BaselineMetric::SeasonAverage),
            "season_median" => Some(BaselineMetric::SeasonMedian),
            "last_5_games_average" | "last_5_avg" | "last_5" => Some(BaselineMetric::Last5Average),
            "last_10_games_average" | "last_10_avg" | "last_10" => {
                Some(BaselineMetric::Last10Average)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BaselineMetric::SeasonAverage => "Season Average",
            BaselineMetric::SeasonMedian => "Season Median",
            BaselineMetric::Last5Average => "Last 5 Games Average",
            BaselineMetric::Last10Average => "Last 10 Games Average",
        }
    }
}

/// Derived, read-only aggregate of one player's game log.
///
/// Invariant: for players with fewer than 5 (resp. 10) games, the last-5
/// (resp. last-10) value equals the season average for that stat. That is a
/// deliberate fallback, not a bug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsSummary {
    pub player_id: i64,
    pub player_name: String,
    pub season_avg_by_stat: HashMap<StatCategory, f64>,
    pub season_median_by_stat: HashMap<StatCategory, f64>,
    pub last_5_avg_by_stat: HashMap<StatCategory, f64>,
    pub last_10_avg_by_stat: HashMap<StatCategory, f64>,
}

impl PlayerStatsSummary {
    /// Baseline for one stat under one metric. None when the stat is absent
    /// from the summary, never a stand-in zero.
    pub fn baseline(&self, stat: StatCategory, metric: BaselineMetric) -> Option<f64> {
        let map = match metric {
            BaselineMetric::SeasonAverage => &self.season_avg_by_stat,
            BaselineMetric::SeasonMedian => &self.season_median_by_stat,
            BaselineMetric::Last5Average => &self.last_5_avg_by_stat,
            BaselineMetric::Last10Average => &self.last_10_avg_by_stat,
        };
        map.get(&stat).copied()
    }
}

/// One sportsbook's quote for one player/prop-type/line at a point in time.
///
/// Only quotes sharing the maximum `batch_time_utc` for a game are current;
/// the odds repository filters out earlier batches before quotes reach any
/// aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropQuote {
    pub game_id: String,
    pub player_name: String,
    pub prop_type: String, // e.g. "Points"
    pub line: f64,
    pub over_odds: Option<f64>,
    pub under_odds: Option<f64>,
    pub bookmaker: String,
    pub collected_at_utc: DateTime<Utc>,
    /// Identifies which scraping run produced the quote.
    pub batch_time_utc: DateTime<Utc>,
}

/// The bookmaker offering the numerically highest price at one (line, side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestBookieOdds {
    pub bookmaker: String,
    pub price: f64,
}

/// A scheduled game. Source of truth for "is this game in the future".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time_utc: DateTime<Utc>,
    pub derived_game_name: String,
}

impl Matchup {
    pub fn derive_game_name(away_team: &str, home_team: &str) -> String {
        format!("{} @ {}", away_team, home_team)
    }
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_category_parse_is_lenient() {
        assert_eq!(StatCategory::parse("Points"), Some(StatCategory::Points));
        assert_eq!(
            StatCategory::parse("Three Pointers Made"),
            Some(StatCategory::ThreePointersMade)
        );
        assert_eq!(StatCategory::parse("steals"), None);
    }

    #[test]
    fn test_baseline_metric_parse() {
        assert_eq!(
            BaselineMetric::parse("Last 5 Games Average"),
            Some(BaselineMetric::Last5Average)
        );
        assert_eq!(
            BaselineMetric::parse("season_median"),
            Some(BaselineMetric::SeasonMedian)
        );
        assert_eq!(BaselineMetric::parse("career_high"), None);
    }

    #[test]
    fn test_baseline_absent_stat_is_none() {
        let summary = PlayerStatsSummary {
            player_id: 1,
            player_name: "Test Player".to_string(),
            season_avg_by_stat: HashMap::new(),
            season_median_by_stat: HashMap::new(),
            last_5_avg_by_stat: HashMap::new(),
            last_10_avg_by_stat: HashMap::new(),
        };
        assert_eq!(
            summary.baseline(StatCategory::Points, BaselineMetric::SeasonAverage),
            None
        );
    }

    #[test]
    fn test_derive_game_name() {
        assert_eq!(
            Matchup::derive_game_name("Las Vegas Aces", "New York Liberty"),
            "Las Vegas Aces @ New York Liberty"
        );
    }

    #[test]
    fn test_summary_serializes_with_string_stat_keys() {
        let summary = PlayerStatsSummary {
            player_id: 1,
            player_name: "Test Player".to_string(),
            season_avg_by_stat: HashMap::from([(StatCategory::Points, 21.5)]),
            season_median_by_stat: HashMap::new(),
            last_5_avg_by_stat: HashMap::new(),
            last_10_avg_by_stat: HashMap::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["season_avg_by_stat"]["points"], 21.5);
    }

    #[test]
    fn test_api_response_shapes() {
        let ok: ApiResponse<i32> = ApiResponse::success(7);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 7);
        assert!(json["error"].is_null());

        let err: ApiResponse<i32> = ApiResponse::error("boom".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
