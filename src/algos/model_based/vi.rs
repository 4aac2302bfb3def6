use super::common::*;
use super::improvement::{greedy_value, policy_improvement};
use super::tensor::TransitionTensor;
use super::{MdpSolver, Solution};
use crate::error::Result;
use tracing::debug;

/// Value Iteration - Sutton & Barto 2018, section 4.4.
///
/// Iterates the Bellman optimality operator from `V = 0` and extracts the
/// greedy policy once, from the converged value function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueIteration;

impl MdpSolver for ValueIteration {
    fn name(&self) -> &'static str {
        "value iteration"
    }

    fn solve(&self, tensor: &TransitionTensor, config: &SolverConfig) -> Result<Solution> {
        config.validate()?;

        let gamma = config.gamma;
        let (v, sweeps) = iterate_to_fixed_point(
            ValueFunction::zeros(tensor.n_s()),
            config,
            |v, s| greedy_value(tensor, v, s, gamma),
        )?;
        debug!(sweeps, "value iteration converged");

        let pi = policy_improvement(tensor, &v, config)?;

        Ok(Solution {
            v,
            pi,
            iterations: sweeps,
            sweeps,
        })
    }
}
