use super::common::*;
use super::evaluation::policy_evaluation;
use super::improvement::policy_improvement;
use super::tensor::TransitionTensor;
use super::{MdpSolver, Solution};
use crate::common::defs::Continous;
use crate::error::{MdpError, Result};
use tracing::{debug, info};

/// Policy Iteration - Sutton & Barto 2018, section 4.3.
///
/// Starts from the all-zero policy and alternates evaluation and greedy
/// improvement until the policy stops changing. `tol` only controls the
/// accuracy of each evaluation; `max_iterations` caps both the evaluation
/// sweeps and the number of improvement rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyIteration;

impl MdpSolver for PolicyIteration {
    fn name(&self) -> &'static str {
        "policy iteration"
    }

    fn solve(&self, tensor: &TransitionTensor, config: &SolverConfig) -> Result<Solution> {
        config.validate()?;

        let mut pi = vec![0; tensor.n_s()];
        let mut prev_v: Option<ValueFunction> = None;
        let mut delta = Continous::INFINITY;
        let mut sweeps = 0;
        for round in 1..=config.max_iterations {
            let (v, round_sweeps) = policy_evaluation(tensor, &pi, config)?;
            sweeps += round_sweeps;
            if let Some(prev_v) = &prev_v {
                delta = sup_norm_distance(prev_v, &v);
            }

            let candidate = policy_improvement(tensor, &v, config)?;
            let changed = candidate.iter().zip(&pi).filter(|(a, b)| a != b).count();
            info!(round, sweeps = round_sweeps, changed, "policy iteration round");

            if changed == 0 {
                debug!(round, sweeps, "policy stable");
                return Ok(Solution {
                    v,
                    pi,
                    iterations: round,
                    sweeps,
                });
            }

            pi = candidate;
            prev_v = Some(v);
        }

        Err(MdpError::NonConvergence {
            iterations: config.max_iterations,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::evaluation::policy_evaluation;
    use super::*;
    use crate::common::defs::*;
    use crate::envs::{frozen_lake::FrozenLake, simple_golf::SimpleGolf};
    use float_eq::*;

    #[test]
    fn solves_simple_golf() {
        let tensor = TransitionTensor::from_mdp(&SimpleGolf::new()).unwrap();
        let config = SolverConfig::new(0.9, 1e-10);

        let solution = PolicyIteration.solve(&tensor, &config).unwrap();

        // V1 = 9 / 0.91, V0 = 0.81 V1 / 0.91.
        let v1 = 9. / 0.91;
        assert_float_eq!(
            solution.v.to_vec(),
            vec![0.81 * v1 / 0.91, v1, 0.],
            abs_all <= 1e-8
        );
        assert_eq!(solution.pi, vec![0, 2, 0]);
    }

    #[test]
    fn stable_policy_is_greedy_for_its_own_value() {
        let mdp = FrozenLake::four_by_four(true).unwrap();
        let tensor = TransitionTensor::from_mdp(&mdp).unwrap();
        let config = SolverConfig::new(0.9, 1e-10);

        let solution = PolicyIteration.solve(&tensor, &config).unwrap();
        let (v, _) = policy_evaluation(&tensor, &solution.pi, &config).unwrap();

        assert_eq!(policy_improvement(&tensor, &v, &config).unwrap(), solution.pi);
        assert!(solution.iterations >= 2);
    }

    #[test]
    fn round_cap_surfaces_non_convergence() {
        let mdp = FrozenLake::four_by_four(false).unwrap();
        let tensor = TransitionTensor::from_mdp(&mdp).unwrap();
        // One round is never enough: the all-zero policy is not optimal.
        let config = SolverConfig::new(0.9, 1e-6).with_max_iterations(40);
        let one_round = SolverConfig {
            max_iterations: 1,
            ..config.clone()
        };

        assert!(PolicyIteration.solve(&tensor, &config).is_ok());
        assert!(matches!(
            PolicyIteration.solve(&tensor, &one_round),
            Err(MdpError::NonConvergence { .. })
        ));
    }

    #[test]
    fn returns_value_of_the_returned_policy() {
        let t = |p, s, r| Transition::new(p, s, r, false);
        let transitions = Transitions::from([
            ((0, 0), vec![t(1., 0, 0.)]),
            ((0, 1), vec![t(1., 1, 1.)]),
            ((1, 0), vec![t(1., 1, 0.)]),
            ((1, 1), vec![t(1., 1, 0.)]),
        ]);
        let tensor = TransitionTensor::new(&transitions, 2, 2).unwrap();

        let solution = PolicyIteration
            .solve(&tensor, &SolverConfig::new(0.9, 1e-6))
            .unwrap();

        assert_eq!(solution.pi, vec![1, 0]);
        assert_float_eq!(solution.v.to_vec(), vec![1., 0.], abs_all <= 1e-6);
        assert_eq!(solution.iterations, 2);
    }
}
