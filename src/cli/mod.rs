use anyhow::Result;

use crate::db::{create_pool, get_future_matchups, init_database_with_pool, query_player_game_logs};
use crate::models::{BaselineMetric, StatCategory};
use crate::services::props_overview::{fetch_props_overview, TeamPropsView};
use crate::services::stats_summarizer::summarize;

pub async fn list_matchups() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    println!("🏀 Upcoming matchups:\n");

    let matchups = get_future_matchups(&pool).await?;
    if matchups.is_empty() {
        println!("📭 No upcoming matchups found. Try seeding data first: props-hub seed");
        return Ok(());
    }

    for matchup in matchups {
        println!(
            "   • {} ({}) — {}",
            matchup.derived_game_name,
            matchup.commence_time_utc.format("%Y-%m-%d %H:%M UTC"),
            matchup.game_id
        );
    }

    println!("\n💡 Use 'props-hub props --game <game_id>' to see the value overview");
    Ok(())
}

pub async fn show_props(game_id: &str, prop_type: &str, metric_raw: &str) -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    let Some(metric) = BaselineMetric::parse(metric_raw) else {
        println!(
            "❌ Unknown metric: {}. Use season_avg, season_median, last_5_avg, or last_10_avg",
            metric_raw
        );
        return Ok(());
    };

    let overview =
        fetch_props_overview(&pool, game_id, prop_type, metric, "2025", "Regular Season").await?;

    let Some(overview) = overview else {
        println!("❌ No matchup found with id '{}'", game_id);
        return Ok(());
    };

    println!(
        "💰 Player Props Overview: {}\n   Game time: {} UTC",
        overview.matchup.derived_game_name,
        overview.matchup.commence_time_utc.format("%A, %B %d, %Y, %I:%M %p")
    );

    match overview.odds_updated_at {
        Some(ts) => println!(
            "   Odds last retrieved: {} UTC\n",
            ts.format("%A, %B %d, %Y, %I:%M %p")
        ),
        None => println!("   ⚠️ No odds data available for this matchup\n"),
    }

    print_team(&overview.home, prop_type, metric, "Home");
    print_team(&overview.away, prop_type, metric, "Away");

    for warning in &overview.warnings {
        println!("⚠️  {}", warning);
    }

    Ok(())
}

fn print_team(team: &TeamPropsView, prop_type: &str, metric: BaselineMetric, side: &str) {
    println!("📊 {} ({})", team.team, side);

    if team.players.is_empty() {
        println!("   No player props available\n");
        return;
    }

    for player in &team.players {
        match player.baseline {
            Some(baseline) => {
                println!(
                    "   {} — {} {}: {:.1}",
                    player.player_name,
                    prop_type,
                    metric.label(),
                    baseline
                );
                for row in &player.rows {
                    println!(
                        "      {:>5.1} {:<5} {:>8.2} @ {:<12} {} {}",
                        row.line,
                        row.over_under,
                        row.price,
                        row.bookmaker,
                        row.glyph,
                        row.value_direction.label()
                    );
                }
            }
            None => println!("   {} — no stats available", player.player_name),
        }
    }
    println!();
}

pub async fn show_player(name: &str, season: &str, season_type: &str) -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    let rows = query_player_game_logs(&pool, name, season, season_type).await?;
    let Some(summary) = summarize(name, &rows) else {
        println!(
            "📭 No game log data for {} in {} {}",
            name, season, season_type
        );
        return Ok(());
    };

    println!(
        "📊 {} — {} {} ({} games)\n",
        name,
        season,
        season_type,
        rows.len()
    );
    println!(
        "   {:<22} {:>10} {:>10} {:>10} {:>10}",
        "Stat", "Season Avg", "Median", "Last 5", "Last 10"
    );

    for stat in StatCategory::ALL {
        println!(
            "   {:<22} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            stat.as_str(),
            summary.season_avg_by_stat[&stat],
            summary.season_median_by_stat[&stat],
            summary.last_5_avg_by_stat[&stat],
            summary.last_10_avg_by_stat[&stat],
        );
    }

    Ok(())
}

pub async fn seed() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;
    crate::db::seed_data(&pool).await?;
    println!("✅ Sample data seeded");
    Ok(())
}
