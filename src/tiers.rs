//! Score tiers and the text shown for them.
//!
//! A [`TierTable`] maps a distance (or rank) to a [`Tier`]: explicit entries for
//! `0..=max_key`, and a floor tier for everything further out. The same table
//! answers the reverse question (score → label/message) for the result panel.

use crate::error::ConfigError;
use crate::rng::LuckRng;
use serde::{Deserialize, Serialize};

/// One score bucket with its overlay tag and flavor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub score: i32,
    /// CSS-ish tag the page uses to paint the tile ("bullseye", "warm", ...).
    #[serde(default)]
    pub overlay: String,
    pub label: String,
    pub message: String,
    /// Zone priority; higher wins when lucky and unlucky zones overlap.
    #[serde(default)]
    pub priority: u8,
}

impl Tier {
    pub fn new(score: i32, overlay: &str, label: &str, message: &str, priority: u8) -> Self {
        Self {
            score,
            overlay: overlay.to_string(),
            label: label.to_string(),
            message: message.to_string(),
            priority,
        }
    }
}

#[derive(Deserialize)]
struct RawTierTable {
    tiers: Vec<Tier>,
    floor: Tier,
}

/// Which way scores move as distance from the centre grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slope {
    /// Lucky zones: best at the centre.
    Falling,
    /// Unlucky zones: worst at the centre.
    Rising,
}

/// Distance-indexed tiers with a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTierTable")]
pub struct TierTable {
    tiers: Vec<Tier>,
    floor: Tier,
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = ConfigError;

    fn try_from(raw: RawTierTable) -> Result<Self, Self::Error> {
        TierTable::new(raw.tiers, raw.floor)
    }
}

impl TierTable {
    /// `tiers[d]` is the tier at distance `d`; `floor` covers the rest.
    pub fn new(tiers: Vec<Tier>, floor: Tier) -> Result<Self, ConfigError> {
        for tier in tiers.iter().chain(std::iter::once(&floor)) {
            if tier.label.trim().is_empty() || tier.message.trim().is_empty() {
                return Err(ConfigError::BlankLabel(tier.score));
            }
        }
        Ok(Self { tiers, floor })
    }

    /// Tables baked into the crate; their labels are covered by tests.
    pub(crate) fn builtin(tiers: Vec<Tier>, floor: Tier) -> Self {
        Self { tiers, floor }
    }

    /// Check that scores move monotonically with distance, floor included.
    pub fn check_slope(&self, slope: Slope) -> Result<(), ConfigError> {
        let scores: Vec<i32> = self.tiers().map(|t| t.score).collect();
        for pair in scores.windows(2) {
            let ok = match slope {
                Slope::Falling => pair[0] >= pair[1],
                Slope::Rising => pair[0] <= pair[1],
            };
            if !ok {
                return Err(ConfigError::TierOrder { from: pair[0], to: pair[1] });
            }
        }
        Ok(())
    }

    /// Largest distance with an explicit tier, or `None` if only the floor exists.
    pub fn max_key(&self) -> Option<usize> {
        self.tiers.len().checked_sub(1)
    }

    /// Explicit tier at `distance`, if any.
    #[inline(always)]
    pub fn explicit(&self, distance: usize) -> Option<&Tier> {
        self.tiers.get(distance)
    }

    /// Tier at `distance`, falling back to the floor.
    #[inline(always)]
    pub fn for_distance(&self, distance: usize) -> &Tier {
        self.tiers.get(distance).unwrap_or(&self.floor)
    }

    pub fn floor(&self) -> &Tier {
        &self.floor
    }

    pub fn tiers(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter().chain(std::iter::once(&self.floor))
    }

    /// Highest score any cell can get.
    pub fn top_score(&self) -> i32 {
        self.tiers().map(|t| t.score).max().unwrap_or(self.floor.score)
    }

    /// Tier whose score matches exactly; otherwise the closest lower one;
    /// otherwise the floor.
    pub fn tier_for_score(&self, score: i32) -> &Tier {
        if let Some(exact) = self.tiers().find(|t| t.score == score) {
            return exact;
        }
        self.tiers()
            .filter(|t| t.score < score)
            .max_by_key(|t| t.score)
            .unwrap_or(&self.floor)
    }

    pub fn label_for(&self, score: i32) -> &str {
        &self.tier_for_score(score).label
    }

    pub fn message_for(&self, score: i32) -> &str {
        &self.tier_for_score(score).message
    }
}

// ─── Weighted picks ─────────────────────────────────────────────────────────

/// Categorical distribution with integer weights.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T> WeightedTable<T> {
    pub fn new(entries: Vec<(T, u32)>) -> Result<Self, ConfigError> {
        let total = entries
            .iter()
            .try_fold(0u32, |acc, (_, w)| acc.checked_add(*w))
            .ok_or(ConfigError::WeightOverflow)?;
        if total == 0 {
            return Err(ConfigError::ZeroWeight);
        }
        Ok(Self { entries, total })
    }

    /// Weights baked into the crate; always non-zero.
    pub(crate) fn builtin(entries: Vec<(T, u32)>) -> Self {
        let total = entries.iter().fold(0u32, |acc, (_, w)| acc.saturating_add(*w));
        Self { entries, total }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    /// Draw one entry; same as picking uniformly from the expanded multiset.
    pub fn pick(&self, rng: &mut LuckRng) -> &T {
        let mut roll = rng.gen_range(self.total as usize) as u32;
        for (item, weight) in &self.entries {
            if roll < *weight {
                return item;
            }
            roll -= weight;
        }
        // total > 0 guarantees the loop returns; last entry keeps this total
        &self.entries[self.entries.len() - 1].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants;
    use std::collections::HashMap;

    fn sample_table() -> TierTable {
        TierTable::new(
            vec![
                Tier::new(10, "bullseye", "BULLSEYE", "Dead centre.", 5),
                Tier::new(8, "hot", "HOT", "Right next to it.", 4),
                Tier::new(6, "warm", "WARM", "Getting close.", 4),
            ],
            Tier::new(5, "cold", "COLD", "Luck is elsewhere.", 0),
        )
        .unwrap()
    }

    #[test]
    fn test_distance_lookup_uses_floor() {
        let table = sample_table();
        assert_eq!(table.for_distance(0).score, 10);
        assert_eq!(table.for_distance(2).score, 6);
        assert_eq!(table.for_distance(3).score, 5);
        assert_eq!(table.for_distance(99).score, 5);
        assert_eq!(table.max_key(), Some(2));
        assert_eq!(table.top_score(), 10);
    }

    #[test]
    fn test_label_and_message_are_total() {
        let table = sample_table();
        for score in -20..=20 {
            assert!(!table.label_for(score).is_empty());
            assert!(!table.message_for(score).is_empty());
        }
        assert_eq!(table.label_for(8), "HOT");
        // 9 falls to the closest lower tier
        assert_eq!(table.label_for(9), "HOT");
        assert_eq!(table.label_for(-3), "COLD");
    }

    #[test]
    fn test_lookup_is_pure() {
        let table = variants::luck_meter_tiers();
        for score in 0..=5 {
            assert_eq!(table.label_for(score), table.label_for(score));
            assert_eq!(table.message_for(score), table.message_for(score));
        }
        assert_eq!(table.label_for(5), "MEGA LUCKY DAY");
        assert_eq!(table.label_for(0), "NOT MUCH LUCK TODAY");
    }

    #[test]
    fn test_blank_label_rejected() {
        let err = TierTable::new(vec![Tier::new(1, "", " ", "msg", 0)], Tier::new(0, "", "x", "y", 0));
        assert_eq!(err, Err(ConfigError::BlankLabel(1)));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let err = WeightedTable::new(vec![("A", 0), ("B", 0)]);
        assert!(matches!(err, Err(ConfigError::ZeroWeight)));
    }

    #[test]
    fn test_weight_overflow_rejected() {
        let err = WeightedTable::new(vec![("A", u32::MAX), ("B", 1)]);
        assert!(matches!(err, Err(ConfigError::WeightOverflow)));
        let max = WeightedTable::new(vec![("A", u32::MAX - 1), ("B", 1)]).unwrap();
        assert_eq!(max.total(), u32::MAX);
    }

    #[test]
    fn test_rising_lucky_table_rejected() {
        let rising = TierTable::new(
            vec![Tier::new(1, "", "LOW", "low", 0), Tier::new(9, "", "HIGH", "high", 0)],
            Tier::new(20, "", "FLOOR", "floor", 0),
        )
        .unwrap();
        assert_eq!(rising.check_slope(Slope::Falling), Err(ConfigError::TierOrder { from: 1, to: 9 }));
        assert!(rising.check_slope(Slope::Rising).is_ok());

        // floor above the last explicit tier
        let high_floor = TierTable::new(vec![Tier::new(5, "", "A", "a", 0)], Tier::new(6, "", "Z", "z", 0)).unwrap();
        assert_eq!(high_floor.check_slope(Slope::Falling), Err(ConfigError::TierOrder { from: 5, to: 6 }));

        assert!(sample_table().check_slope(Slope::Falling).is_ok());
        assert!(variants::unlucky_tiers().check_slope(Slope::Rising).is_ok());
        assert!(variants::unlucky_tiers().check_slope(Slope::Falling).is_err());
    }

    #[test]
    fn test_weighted_pick_stays_in_set() {
        let table = variants::luck_tier_weights();
        assert_eq!(table.total(), 16);
        let mut rng = LuckRng::from_seed(5);
        for _ in 0..1000 {
            let tag = *table.pick(&mut rng);
            assert!(["MEGA", "SUPER", "BIT", "NONE"].contains(&tag));
        }
    }

    #[test]
    fn test_weighted_pick_chi_square() {
        let table = WeightedTable::new(vec![("A", 1), ("B", 3), ("C", 6), ("D", 6)]).unwrap();
        let mut rng = LuckRng::from_seed(2024);
        let n = 10_000u32;
        let mut seen: HashMap<&str, u32> = HashMap::new();
        for _ in 0..n {
            *seen.entry(*table.pick(&mut rng)).or_default() += 1;
        }

        let chi2: f64 = table
            .entries()
            .iter()
            .map(|(tag, w)| {
                let expected = n as f64 * *w as f64 / table.total() as f64;
                let observed = *seen.get(tag).unwrap_or(&0) as f64;
                (observed - expected).powi(2) / expected
            })
            .sum();
        // 3 degrees of freedom, p = 0.001
        assert!(chi2 < 16.27, "chi-square too large: {chi2}");
    }

    #[test]
    fn test_table_deserializes_and_validates() {
        let json = r#"{"tiers":[{"score":3,"label":"A","message":"a"}],"floor":{"score":0,"label":"Z","message":"z"}}"#;
        let table: TierTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.for_distance(0).label, "A");
        assert_eq!(table.for_distance(0).priority, 0);
        assert_eq!(table.for_distance(1).label, "Z");

        let blank = r#"{"tiers":[],"floor":{"score":0,"label":"","message":"z"}}"#;
        assert!(serde_json::from_str::<TierTable>(blank).is_err());
    }
}
