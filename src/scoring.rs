//! Grid scoring: lucky/unlucky cell placement and per-cell score maps.
//!
//! Every page load draws one lucky cell (and, for some boards, an unlucky cell
//! as far from it as possible). `build_score_map` then grades every cell by its
//! distance to those centres. Lucky zones are written last and win any cell
//! whose current priority does not exceed theirs.

use crate::error::GridError;
use crate::grid::{GridDims, Metric};
use crate::rng::LuckRng;
use crate::tiers::{Tier, TierTable};
use serde::Serialize;

/// Score and overlay tag for every cell, indexed by cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreMap {
    pub score: Vec<i32>,
    pub overlay: Vec<String>,
}

/// Second, negative zone centred on `cell`.
#[derive(Debug, Clone, Copy)]
pub struct UnluckyZone<'a> {
    pub cell: usize,
    pub tiers: &'a TierTable,
}

/// Draw the lucky cell uniformly over the board.
pub fn pick_lucky(dims: GridDims, rng: &mut LuckRng) -> usize {
    rng.gen_range(dims.count())
}

/// All cells at the maximum distance from `from`, in ascending order.
pub fn farthest_cells(dims: GridDims, metric: Metric, from: usize) -> Result<Vec<usize>, GridError> {
    dims.check(from)?;
    let distances = dims.distances_from(metric, from);
    let max = distances.iter().copied().max().unwrap_or(0);
    Ok(distances
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == max)
        .map(|(cell, _)| cell)
        .collect())
}

/// Pick the unlucky cell uniformly among the cells farthest from `lucky`.
pub fn pick_unlucky(dims: GridDims, metric: Metric, lucky: usize, rng: &mut LuckRng) -> Result<usize, GridError> {
    let candidates = farthest_cells(dims, metric, lucky)?;
    // a 1x1 board yields the lucky cell itself, which build_score_map resolves in lucky's favour
    Ok(candidates[rng.gen_range(candidates.len())])
}

/// Grade every cell of the board.
///
/// 1. every cell starts at the lucky table's tier for its distance, priority 0
/// 2. cells inside the unlucky table's explicit rings take the unlucky tier
/// 3. cells inside the lucky table's explicit rings take the lucky tier when
///    its priority is >= the cell's current priority
pub fn build_score_map(
    dims: GridDims,
    metric: Metric,
    lucky: usize,
    unlucky: Option<UnluckyZone<'_>>,
    tiers: &TierTable,
) -> Result<ScoreMap, GridError> {
    dims.check(lucky)?;
    let lucky_dist = dims.distances_from(metric, lucky);

    let mut assigned: Vec<(&Tier, u8)> = lucky_dist
        .iter()
        .map(|&d| (tiers.for_distance(d), 0))
        .collect();

    if let Some(zone) = unlucky {
        dims.check(zone.cell)?;
        let unlucky_dist = dims.distances_from(metric, zone.cell);
        for (slot, &d) in assigned.iter_mut().zip(&unlucky_dist) {
            if let Some(tier) = zone.tiers.explicit(d) {
                *slot = (tier, tier.priority);
            }
        }

        for (slot, &d) in assigned.iter_mut().zip(&lucky_dist) {
            if let Some(tier) = tiers.explicit(d) {
                if tier.priority >= slot.1 {
                    *slot = (tier, tier.priority);
                }
            }
        }
    }

    Ok(ScoreMap {
        score: assigned.iter().map(|(t, _)| t.score).collect(),
        overlay: assigned.iter().map(|(t, _)| t.overlay.clone()).collect(),
    })
}

/// A board drawn for one page load: its centres and the resulting map.
#[derive(Debug, Clone)]
pub struct ScoredBoard {
    pub dims: GridDims,
    pub metric: Metric,
    pub lucky: usize,
    pub unlucky: Option<usize>,
    pub map: ScoreMap,
}

impl ScoredBoard {
    /// Draw the centres with `rng` and grade the board.
    pub fn draw(
        dims: GridDims,
        metric: Metric,
        tiers: &TierTable,
        unlucky_tiers: Option<&TierTable>,
        rng: &mut LuckRng,
    ) -> Result<Self, GridError> {
        let lucky = pick_lucky(dims, rng);
        let unlucky = match unlucky_tiers {
            Some(_) => Some(pick_unlucky(dims, metric, lucky, rng)?),
            None => None,
        };
        let zone = unlucky
            .zip(unlucky_tiers)
            .map(|(cell, tiers)| UnluckyZone { cell, tiers });
        let map = build_score_map(dims, metric, lucky, zone, tiers)?;
        log::debug!("scored {}x{} board: lucky={lucky} unlucky={unlucky:?}", dims.cols, dims.rows);
        Ok(Self { dims, metric, lucky, unlucky, map })
    }

    pub fn score(&self, cell: usize) -> Result<i32, GridError> {
        Ok(self.map.score[self.dims.check(cell)?])
    }
}
