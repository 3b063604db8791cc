use std::collections::HashMap;

use crate::models::PropQuote;

/// Result of partitioning a matchup's players into home and away buckets.
///
/// Players missing from the roster mapping land in `missing_roster` (once
/// each) instead of either bucket, so callers can surface the omission as
/// an operator-visible warning.
#[derive(Debug, Default)]
pub struct TeamGroups {
    pub home: HashMap<String, Vec<PropQuote>>,
    pub away: HashMap<String, Vec<PropQuote>>,
    pub missing_roster: Vec<String>,
}

/// Group a matchup's quotes by player name, preserving each player's quote
/// order.
pub fn group_props_by_player(quotes: Vec<PropQuote>) -> HashMap<String, Vec<PropQuote>> {
    let mut by_player: HashMap<String, Vec<PropQuote>> = HashMap::new();
    for quote in quotes {
        by_player
            .entry(quote.player_name.clone())
            .or_default()
            .push(quote);
    }
    by_player
}

/// Partition players into home/away buckets using the roster mapping.
///
/// A player on neither team (e.g. traded since the roster refresh) is also
/// excluded from both buckets but is not reported missing — the roster knew
/// the player, the matchup just doesn't involve their team.
pub fn group_by_team(
    props_by_player: HashMap<String, Vec<PropQuote>>,
    roster: &HashMap<String, String>,
    home_team: &str,
    away_team: &str,
) -> TeamGroups {
    let mut groups = TeamGroups::default();

    for (player_name, props) in props_by_player {
        let Some(player_team) = roster.get(&player_name) else {
            tracing::warn!("No team found in roster for {}", player_name);
            groups.missing_roster.push(player_name);
            continue;
        };

        if player_team == home_team {
            groups.home.insert(player_name, props);
        } else if player_team == away_team {
            groups.away.insert(player_name, props);
        }
    }

    groups.missing_roster.sort();
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn quote_for(player: &str) -> PropQuote {
        let batch = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        PropQuote {
            game_id: "game-1".to_string(),
            player_name: player.to_string(),
            prop_type: "Points".to_string(),
            line: 18.5,
            over_odds: Some(-110.0),
            under_odds: Some(-110.0),
            bookmaker: "draftkings".to_string(),
            collected_at_utc: batch,
            batch_time_utc: batch,
        }
    }

    fn props_for(players: &[&str]) -> HashMap<String, Vec<PropQuote>> {
        players
            .iter()
            .map(|p| (p.to_string(), vec![quote_for(p)]))
            .collect()
    }

    #[test]
    fn test_players_split_by_team() {
        let props = props_for(&["Home Star", "Away Star"]);
        let roster = HashMap::from([
            ("Home Star".to_string(), "Liberty".to_string()),
            ("Away Star".to_string(), "Aces".to_string()),
        ]);

        let groups = group_by_team(props, &roster, "Liberty", "Aces");
        assert!(groups.home.contains_key("Home Star"));
        assert!(groups.away.contains_key("Away Star"));
        assert!(groups.missing_roster.is_empty());
    }

    #[test]
    fn test_roster_miss_excluded_and_warned_once() {
        let props = props_for(&["Home Star", "Mystery Player"]);
        let roster = HashMap::from([("Home Star".to_string(), "Liberty".to_string())]);

        let groups = group_by_team(props, &roster, "Liberty", "Aces");
        assert!(!groups.home.contains_key("Mystery Player"));
        assert!(!groups.away.contains_key("Mystery Player"));
        assert_eq!(groups.missing_roster, vec!["Mystery Player".to_string()]);
    }

    #[test]
    fn test_third_team_player_excluded_silently() {
        let props = props_for(&["Traded Player"]);
        let roster = HashMap::from([("Traded Player".to_string(), "Storm".to_string())]);

        let groups = group_by_team(props, &roster, "Liberty", "Aces");
        assert!(groups.home.is_empty());
        assert!(groups.away.is_empty());
        assert!(groups.missing_roster.is_empty());
    }

    #[test]
    fn test_group_props_by_player_keeps_all_quotes() {
        let quotes = vec![
            quote_for("Home Star"),
            quote_for("Home Star"),
            quote_for("Away Star"),
        ];
        let by_player = group_props_by_player(quotes);
        assert_eq!(by_player["Home Star"].len(), 2);
        assert_eq!(by_player["Away Star"].len(), 1);
    }
}
