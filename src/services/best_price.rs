use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::models::{BestBookieOdds, PropQuote};

/// Best price per distinct line, keyed for the over and under sides
/// separately. Lines are keyed on a total-ordering f64 wrapper so the maps
/// iterate in ascending line order.
pub type BestOddsByLine = BTreeMap<OrderedFloat<f64>, BestBookieOdds>;

/// Reduce a set of quotes to the single best price per (line, side).
///
/// Input must already be filtered to one matchup, one prop type, and the
/// most recent batch timestamp — staleness filtering is the caller's
/// responsibility (the odds repository does it).
///
/// A quote contributes to a side only when that side's price is present and
/// non-zero. Within each (line, side) partition the numerically greatest
/// price wins; exact price ties go to the lexicographically smallest
/// bookmaker identifier, so repeated calls over the same quotes return the
/// same winner regardless of input order. Lines with no qualifying quotes
/// on a side produce no entry for that side.
pub fn best_prices(quotes: &[PropQuote]) -> (BestOddsByLine, BestOddsByLine) {
    let mut best_over: BestOddsByLine = BTreeMap::new();
    let mut best_under: BestOddsByLine = BTreeMap::new();

    for quote in quotes {
        if let Some(price) = quote.over_odds.filter(|p| *p != 0.0) {
            consider(&mut best_over, quote, price);
        }
        if let Some(price) = quote.under_odds.filter(|p| *p != 0.0) {
            consider(&mut best_under, quote, price);
        }
    }

    (best_over, best_under)
}

fn consider(side: &mut BestOddsByLine, quote: &PropQuote, price: f64) {
    let entry = side.entry(OrderedFloat(quote.line));
    match entry {
        std::collections::btree_map::Entry::Vacant(v) => {
            v.insert(BestBookieOdds {
                bookmaker: quote.bookmaker.clone(),
                price,
            });
        }
        std::collections::btree_map::Entry::Occupied(mut o) => {
            let current = o.get();
            let better = price > current.price
                || (price == current.price && quote.bookmaker < current.bookmaker);
            if better {
                o.insert(BestBookieOdds {
                    bookmaker: quote.bookmaker.clone(),
                    price,
                });
            }
        }
    }
}
