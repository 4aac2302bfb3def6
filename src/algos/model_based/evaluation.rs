use super::common::*;
use super::tensor::TransitionTensor;
use crate::common::defs::*;
use crate::error::{MdpError, Result};
use tracing::debug;

/// Value function of a fixed deterministic policy, by synchronous iteration
/// of the Bellman expectation operator from `V = 0`.
///
/// Returns the value function and the number of sweeps it took.
pub fn policy_evaluation(
    tensor: &TransitionTensor,
    policy: &[Discrete],
    config: &SolverConfig,
) -> Result<(ValueFunction, usize)> {
    policy_evaluation_from(tensor, policy, ValueFunction::zeros(tensor.n_s()), config)
}

/// Same as [`policy_evaluation`], starting from `v0`.
pub fn policy_evaluation_from(
    tensor: &TransitionTensor,
    policy: &[Discrete],
    v0: ValueFunction,
    config: &SolverConfig,
) -> Result<(ValueFunction, usize)> {
    config.validate()?;
    tensor.check_len("policy", policy.len())?;
    tensor.check_len("initial value function", v0.len())?;
    if let Some((s, &a)) = policy.iter().enumerate().find(|(_, &a)| a >= tensor.n_a()) {
        return Err(MdpError::shape(format!(
            "policy picks action {a} in state {s}, model has {} actions",
            tensor.n_a()
        )));
    }

    let gamma = config.gamma;
    let (v, sweeps) =
        iterate_to_fixed_point(v0, config, |v, s| tensor.q_value(v, s, policy[s], gamma))?;
    debug!(sweeps, "policy evaluation converged");

    Ok((v, sweeps))
}
