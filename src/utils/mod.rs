use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("unparseable minutes value: {0:?}")]
pub struct MinutesParseError(pub String);

/// Normalize a stored minutes value to a float.
///
/// Stats feeds store minutes either as "MM:SS" or as a plain number
/// ("34:10", "22", "18.5"). Everything else is a malformed-input condition
/// for the row that carried it.
pub fn parse_minutes(raw: &str) -> Result<f64, MinutesParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MinutesParseError(raw.to_string()));
    }

    if let Some((mins, secs)) = raw.split_once(':') {
        let m: f64 = mins
            .parse()
            .map_err(|_| MinutesParseError(raw.to_string()))?;
        let s: f64 = secs
            .parse()
            .map_err(|_| MinutesParseError(raw.to_string()))?;
        if !(0.0..60.0).contains(&s) {
            return Err(MinutesParseError(raw.to_string()));
        }
        return Ok(m + s / 60.0);
    }

    raw.parse().map_err(|_| MinutesParseError(raw.to_string()))
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A minimal (key → (value, expiry)) cache owned by the calling layer.
///
/// The core components stay pure; freshness windows around them (roster
/// refreshed every few hours, summaries every hour) live here instead.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, Instant)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => Some(value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now() + self.ttl));
    }
}
