pub mod best_price;
pub mod prop_grouping;
pub mod props_overview;
pub mod stats_summarizer;
pub mod value_indicator;

pub use best_price::{best_prices, BestOddsByLine};
pub use prop_grouping::{group_by_team, group_props_by_player, TeamGroups};
pub use props_overview::{build_props_overview, fetch_props_overview, PropsOverview};
pub use stats_summarizer::{summarize, summarize_from_db, summarize_players};
pub use value_indicator::{ValueDirection, ValueIndicator};
