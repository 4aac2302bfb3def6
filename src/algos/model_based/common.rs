use crate::common::defs::*;
use crate::error::{MdpError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub type ValueFunction = Array1<Continous>;

/// How Policy Improvement picks among actions with equal Q-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Lowest action index wins.
    #[default]
    Lowest,
    /// Uniform among the maximizers, drawn from an RNG seeded per call.
    Random { seed: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub gamma: Continous,
    pub tol: Continous,
    /// Cap on sweeps per fixed-point loop, and on rounds of Policy Iteration.
    pub max_iterations: usize,
    pub tie_break: TieBreak,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            tol: 1e-3,
            max_iterations: 10_000,
            tie_break: TieBreak::Lowest,
        }
    }
}

impl SolverConfig {
    pub fn new(gamma: Continous, tol: Continous) -> Self {
        Self {
            gamma,
            tol,
            ..Default::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0. ..1.).contains(&self.gamma) {
            return Err(MdpError::config(format!(
                "gamma must be in [0, 1), got {}",
                self.gamma
            )));
        }
        if !self.tol.is_finite() || self.tol <= 0. {
            return Err(MdpError::config(format!(
                "tol must be a positive number, got {}",
                self.tol
            )));
        }
        if self.max_iterations == 0 {
            return Err(MdpError::config("max_iterations must be at least 1"));
        }

        Ok(())
    }
}

/// `max_s |a(s) - b(s)|`. NaN propagates so that it can never pass a
/// tolerance check.
pub fn sup_norm_distance(a: &ValueFunction, b: &ValueFunction) -> Continous {
    a.iter().zip(b.iter()).fold(0., |acc, (x, y)| {
        let d = (x - y).abs();
        if d.is_nan() || d > acc {
            d
        } else {
            acc
        }
    })
}

/// Runs synchronous sweeps `V_{k+1}(s) = backup(V_k, s)` until the sup-norm
/// change drops below `config.tol`. Each sweep writes into a second buffer
/// and the buffers are swapped afterwards, so a backup only ever reads `V_k`.
///
/// Returns the converged `V_{k+1}` and the number of sweeps.
pub(crate) fn iterate_to_fixed_point<F>(
    v0: ValueFunction,
    config: &SolverConfig,
    mut backup: F,
) -> Result<(ValueFunction, usize)>
where
    F: FnMut(&ValueFunction, Discrete) -> Continous,
{
    let mut v = v0;
    let mut next = ValueFunction::zeros(v.len());
    let mut delta = Continous::INFINITY;

    for sweep in 1..=config.max_iterations {
        for (s, slot) in next.iter_mut().enumerate() {
            *slot = backup(&v, s);
        }

        delta = sup_norm_distance(&v, &next);
        std::mem::swap(&mut v, &mut next);
        trace!(sweep, delta, "sweep");

        if delta < config.tol {
            return Ok((v, sweep));
        }
    }

    Err(MdpError::NonConvergence {
        iterations: config.max_iterations,
        delta,
    })
}
