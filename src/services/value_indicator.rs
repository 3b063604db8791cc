use serde::{Deserialize, Serialize};

pub const DEFAULT_STRONG_THRESHOLD: f64 = 0.10;
pub const DEFAULT_LOWER_THRESHOLD: f64 = 0.03;

/// One of the four ordered value-classification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDirection {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
}

impl ValueDirection {
    pub fn glyph(&self) -> &'static str {
        match self {
            ValueDirection::StrongPositive => "🔥",
            ValueDirection::Positive => "👍",
            ValueDirection::Neutral => "🔮",
            ValueDirection::Negative => "❌",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueDirection::StrongPositive => "strong positive",
            ValueDirection::Positive => "positive",
            ValueDirection::Neutral => "neutral",
            ValueDirection::Negative => "negative",
        }
    }

    /// Best value first, for ranking rows in a props table.
    pub fn sort_rank(&self) -> u8 {
        match self {
            ValueDirection::StrongPositive => 1,
            ValueDirection::Positive => 2,
            ValueDirection::Neutral => 3,
            ValueDirection::Negative => 4,
        }
    }
}

/// Compares a betting line with a player's statistical baseline.
///
/// Over bets (baseline B):
///
/// ```text
/// Strong Positive  |     Positive    |    Neutral     |     Negative
/// <----------------|-----------------|----------------|------------------>
///             B(1-strong)        B(1-lower)       B(1+lower)
/// ```
///
/// Under bets mirror this: higher lines relative to the baseline are the
/// attractive ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueIndicator {
    pub prop_type: String, // points, rebounds, assists
    pub line: f64,
    pub over_under: String, // "over" or "under"
    pub stats_baseline: f64,
    /// Edge fraction marking strong value (default 10%).
    pub strong_threshold: f64,
    /// Edge fraction marking moderate value (default 3%).
    pub lower_threshold: f64,
}

impl ValueIndicator {
    pub fn new(prop_type: &str, line: f64, over_under: &str, stats_baseline: f64) -> Self {
        Self {
            prop_type: prop_type.to_string(),
            line,
            over_under: over_under.to_string(),
            stats_baseline,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
        }
    }

    /// Classify the line against the baseline.
    ///
    /// Boundary operators are deliberate: a line exactly at B(1-strong) on
    /// an over bet is "positive", not "strong positive". A bet direction
    /// other than "over"/"under" degrades to neutral without error — a
    /// documented permissive fallback.
    ///
    /// Preconditions (not validated here): strong_threshold >
    /// lower_threshold, baseline non-negative. Violations yield whatever
    /// the arithmetic yields.
    pub fn value_direction(&self) -> ValueDirection {
        let b = self.stats_baseline;

        match self.over_under.as_str() {
            "over" => {
                if self.line < b * (1.0 - self.strong_threshold) {
                    ValueDirection::StrongPositive // line significantly below baseline
                } else if self.line < b * (1.0 - self.lower_threshold) {
                    ValueDirection::Positive
                } else if self.line <= b * (1.0 + self.lower_threshold) {
                    ValueDirection::Neutral
                } else {
                    ValueDirection::Negative
                }
            }
            "under" => {
                if self.line > b * (1.0 + self.strong_threshold) {
                    ValueDirection::StrongPositive // line significantly above baseline
                } else if self.line > b * (1.0 + self.lower_threshold) {
                    ValueDirection::Positive
                } else if self.line >= b * (1.0 - self.lower_threshold) {
                    ValueDirection::Neutral
                } else {
                    ValueDirection::Negative
                }
            }
            _ => ValueDirection::Neutral,
        }
    }

    pub fn glyph(&self) -> &'static str {
        self.value_direction().glyph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: f64, over_under: &str, baseline: f64) -> ValueDirection {
        ValueIndicator::new("points", line, over_under, baseline).value_direction()
    }

    #[test]
    fn test_over_bet_tiers() {
        assert_eq!(classify(17.0, "over", 20.0), ValueDirection::StrongPositive);
        assert_eq!(classify(19.0, "over", 20.0), ValueDirection::Positive);
        assert_eq!(classify(20.0, "over", 20.0), ValueDirection::Neutral);
        assert_eq!(classify(21.0, "over", 20.0), ValueDirection::Negative);
    }

    #[test]
    fn test_over_bet_exact_strong_boundary_is_positive() {
        // 18.0 == 20 * (1 - 0.10): strict < excludes it from the strong
        // tier, so it lands in the next one.
        assert_eq!(classify(18.0, "over", 20.0), ValueDirection::Positive);
    }

    #[test]
    fn test_over_bet_neutral_boundaries_inclusive() {
        // 19.4 == 20 * 0.97 is the first neutral line; 20.6 == 20 * 1.03
        // is the last.
        assert_eq!(classify(19.4, "over", 20.0), ValueDirection::Neutral);
        assert_eq!(classify(20.6, "over", 20.0), ValueDirection::Neutral);
    }

    #[test]
    fn test_under_bet_tiers() {
        assert_eq!(
            classify(23.0, "under", 20.0),
            ValueDirection::StrongPositive
        );
        assert_eq!(classify(21.0, "under", 20.0), ValueDirection::Positive);
        assert_eq!(classify(20.0, "under", 20.0), ValueDirection::Neutral);
        assert_eq!(classify(19.0, "under", 20.0), ValueDirection::Negative);
    }

    #[test]
    fn test_under_bet_exact_strong_boundary_is_positive() {
        // 22.0 == 20 * (1 + 0.10): strict > excludes it from the strong
        // tier, mirroring the over side.
        assert_eq!(classify(22.0, "under", 20.0), ValueDirection::Positive);
    }

    #[test]
    fn test_unknown_direction_degrades_to_neutral() {
        // Permissive fallback preserved on purpose: an unrecognized bet
        // direction classifies as neutral rather than erroring.
        assert_eq!(classify(5.0, "push", 20.0), ValueDirection::Neutral);
        assert_eq!(classify(5.0, "", 20.0), ValueDirection::Neutral);
    }

    #[test]
    fn test_glyph_mapping_is_total() {
        assert_eq!(ValueDirection::StrongPositive.glyph(), "🔥");
        assert_eq!(ValueDirection::Positive.glyph(), "👍");
        assert_eq!(ValueDirection::Neutral.glyph(), "🔮");
        assert_eq!(ValueDirection::Negative.glyph(), "❌");
    }

    #[test]
    fn test_custom_thresholds() {
        let indicator = ValueIndicator {
            prop_type: "rebounds".to_string(),
            line: 8.0,
            over_under: "over".to_string(),
            stats_baseline: 10.0,
            strong_threshold: 0.25,
            lower_threshold: 0.05,
        };
        // 8.0 > 10 * 0.75 but < 10 * 0.95 → positive under the wider band.
        assert_eq!(indicator.value_direction(), ValueDirection::Positive);
    }

    #[test]
    fn test_sort_rank_orders_best_first() {
        assert!(ValueDirection::StrongPositive.sort_rank() < ValueDirection::Positive.sort_rank());
        assert!(ValueDirection::Positive.sort_rank() < ValueDirection::Neutral.sort_rank());
        assert!(ValueDirection::Neutral.sort_rank() < ValueDirection::Negative.sort_rank());
    }
}
