//! Monte Carlo ensembles of independent automaton runs
//!
//! Each replica is a separate [`WildfireCA`] with its own grid and random
//! source, seeded `base_seed + i`. Replicas run in parallel on the rayon
//! thread pool; no state is shared between them.
//!
//! The per-cell burn frequency (fraction of replicas in which a cell was
//! reached by the fire) is the usual burn-probability map used in fire risk
//! assessment.

use super::{FireStatistics, WildfireCA};
use crate::core_types::{CellState, Position};
use crate::error::{Result, WildfireError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of one replica
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Steps taken before the fire went out or the cap was hit
    pub steps: u32,
    pub statistics: FireStatistics,
}

/// Aggregate over all replicas of an ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSummary {
    pub width: i32,
    pub height: i32,
    pub runs: Vec<RunSummary>,
    /// Fraction of runs that reached each cell, row-major
    pub burn_frequency: Vec<f32>,
}

impl EnsembleSummary {
    /// Mean burned area over all runs (ha)
    pub fn mean_burned_area_ha(&self) -> f32 {
        let total: f32 = self.runs.iter().map(|r| r.statistics.burned_area_ha).sum();
        total / self.runs.len() as f32
    }

    /// Burn frequency at `pos`, `None` off the grid
    pub fn frequency_at(&self, pos: Position) -> Option<f32> {
        if (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y) {
            Some(self.burn_frequency[pos.y as usize * self.width as usize + pos.x as usize])
        } else {
            None
        }
    }
}

struct ReplicaOutcome {
    summary: RunSummary,
    width: i32,
    height: i32,
    reached: Vec<bool>,
}

/// Run `replicas` independent simulations in parallel.
///
/// `build` receives each replica's seed and returns a ready-to-run
/// automaton (terrain painted, fires seeded). Every replica steps until
/// exhausted or `max_steps`.
///
/// # Errors
///
/// Returns [`WildfireError::InvalidConfiguration`] if `replicas` is zero or
/// the replicas disagree on grid dimensions, and propagates any error from
/// `build` or stepping.
pub fn run_ensemble<F>(
    replicas: usize,
    base_seed: u64,
    max_steps: u32,
    build: F,
) -> Result<EnsembleSummary>
where
    F: Fn(u64) -> Result<WildfireCA> + Sync,
{
    if replicas == 0 {
        return Err(WildfireError::InvalidConfiguration(
            "ensemble needs at least one replica".into(),
        ));
    }

    let outcomes = (0..replicas)
        .into_par_iter()
        .map(|i| -> Result<ReplicaOutcome> {
            let seed = base_seed.wrapping_add(i as u64);
            let mut ca = build(seed)?;
            let steps = ca.run_until_exhausted(max_steps)?;
            let reached = ca
                .cells()
                .map(|(_, cell)| matches!(cell.state, CellState::Burning | CellState::BurnedDown))
                .collect();

            Ok(ReplicaOutcome {
                summary: RunSummary {
                    seed,
                    steps,
                    statistics: ca.statistics(),
                },
                width: ca.width(),
                height: ca.height(),
                reached,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let (width, height) = (outcomes[0].width, outcomes[0].height);
    if let Some(odd) = outcomes
        .iter()
        .find(|o| o.width != width || o.height != height)
    {
        return Err(WildfireError::InvalidConfiguration(format!(
            "replica {} is {}x{}, expected {width}x{height}",
            odd.summary.seed, odd.width, odd.height
        )));
    }

    let mut hits = vec![0_u32; outcomes[0].reached.len()];
    for outcome in &outcomes {
        for (hit, &reached) in hits.iter_mut().zip(&outcome.reached) {
            *hit += u32::from(reached);
        }
    }
    let burn_frequency = hits
        .into_iter()
        .map(|h| h as f32 / replicas as f32)
        .collect();

    let summary = EnsembleSummary {
        width,
        height,
        runs: outcomes.into_iter().map(|o| o.summary).collect(),
        burn_frequency,
    };
    info!(
        replicas,
        mean_burned_area_ha = summary.mean_burned_area_ha(),
        "Ensemble complete"
    );

    Ok(summary)
}
