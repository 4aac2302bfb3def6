use super::common::*;
use super::tensor::TransitionTensor;
use crate::common::defs::*;
use crate::error::Result;
use itertools::Itertools;
use rand::prelude::*;

/// Greedy one-step lookahead policy for `v`.
///
/// Ties between actions with equal Q-values are resolved by
/// `config.tie_break`. The result depends only on the model, `v` and the
/// config.
pub fn policy_improvement(
    tensor: &TransitionTensor,
    v: &ValueFunction,
    config: &SolverConfig,
) -> Result<Vec<Discrete>> {
    config.validate()?;
    tensor.check_len("value function", v.len())?;

    let mut rng = match config.tie_break {
        TieBreak::Lowest => None,
        TieBreak::Random { seed } => Some(StdRng::seed_from_u64(seed)),
    };

    let policy = (0..tensor.n_s())
        .map(|s| {
            let maximizers = (0..tensor.n_a())
                .map(|a| (a, tensor.q_value(v, s, a, config.gamma)))
                .max_set_by(|x, y| x.1.total_cmp(&y.1));

            match (&mut rng, maximizers.as_slice()) {
                (Some(rng), ms) if ms.len() > 1 => ms.choose(rng).map_or(0, |m| m.0),
                (_, ms) => ms.first().map_or(0, |m| m.0),
            }
        })
        .collect();

    Ok(policy)
}

/// `max_a Q(s, a)`.
pub(crate) fn greedy_value(
    tensor: &TransitionTensor,
    v: &ValueFunction,
    s: Discrete,
    gamma: Continous,
) -> Continous {
    (0..tensor.n_a())
        .map(|a| tensor.q_value(v, s, a, gamma))
        .fold(Continous::NEG_INFINITY, Continous::max)
}

#[cfg(test)]
mod tests {
    use super::super::evaluation::policy_evaluation;
    use super::*;
    use crate::envs::frozen_lake::FrozenLake;
    use assertor::*;
    use rstest::rstest;
    use std::collections::HashSet;

    /// One state with three actions: a0 pays 0, a1 and a2 both pay 1.
    fn tied_bandit() -> TransitionTensor {
        let t = |r| vec![Transition::new(1., 0, r, false)];
        let transitions = Transitions::from([
            ((0, 0), t(0.)),
            ((0, 1), t(1.)),
            ((0, 2), t(1.)),
        ]);
        TransitionTensor::new(&transitions, 1, 3).unwrap()
    }

    #[test]
    fn deterministic_tie_break_picks_lowest_index() {
        let tensor = tied_bandit();
        let config = SolverConfig::new(0.9, 1e-6);
        let v = ValueFunction::zeros(1);

        for _ in 0..10 {
            assert_that!(policy_improvement(&tensor, &v, &config).unwrap())
                .is_equal_to(vec![1]);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(2718)]
    fn random_tie_break_is_reproducible(#[case] seed: u64) {
        let tensor = tied_bandit();
        let config = SolverConfig::new(0.9, 1e-6).with_tie_break(TieBreak::Random { seed });
        let v = ValueFunction::zeros(1);

        let first = policy_improvement(&tensor, &v, &config).unwrap();
        let second = policy_improvement(&tensor, &v, &config).unwrap();

        assert_that!(first).is_equal_to(second);
    }

    #[test]
    fn random_tie_break_only_picks_maximizers() {
        let tensor = tied_bandit();
        let v = ValueFunction::zeros(1);

        let picked: HashSet<Discrete> = (0..64)
            .map(|seed| {
                let config =
                    SolverConfig::new(0.9, 1e-6).with_tie_break(TieBreak::Random { seed });
                policy_improvement(&tensor, &v, &config).unwrap()[0]
            })
            .collect();

        assert_that!(picked).is_equal_to(HashSet::from([1, 2]));
    }

    #[test]
    fn improvement_uses_value_as_continuation() {
        // a0: reward 1 and stay in 0; a1: reward 0 and move to state 1.
        let t = |p, s, r| Transition::new(p, s, r, false);
        let transitions = Transitions::from([
            ((0, 0), vec![t(1., 0, 1.)]),
            ((0, 1), vec![t(1., 1, 0.)]),
            ((1, 0), vec![t(1., 1, 0.)]),
            ((1, 1), vec![t(1., 1, 0.)]),
        ]);
        let tensor = TransitionTensor::new(&transitions, 2, 2).unwrap();
        let config = SolverConfig::new(0.9, 1e-6);

        let low = policy_improvement(&tensor, &ValueFunction::from(vec![0., 0.]), &config).unwrap();
        let high =
            policy_improvement(&tensor, &ValueFunction::from(vec![0., 100.]), &config).unwrap();

        assert_eq!(low, vec![0, 0]);
        assert_eq!(high, vec![1, 0]);
    }

    #[test]
    fn improved_policy_is_never_worse() {
        let mdp = FrozenLake::four_by_four(true).unwrap();
        let tensor = TransitionTensor::from_mdp(&mdp).unwrap();
        let config = SolverConfig::new(0.9, 1e-12);

        let mut pi = vec![0; tensor.n_s()];
        for _ in 0..5 {
            let (v, _) = policy_evaluation(&tensor, &pi, &config).unwrap();
            let next = policy_improvement(&tensor, &v, &config).unwrap();
            let (v_next, _) = policy_evaluation(&tensor, &next, &config).unwrap();

            for s in 0..tensor.n_s() {
                assert!(v_next[s] >= v[s] - 1e-9, "state {s}: {} < {}", v_next[s], v[s]);
            }
            pi = next;
        }
    }

    #[test]
    fn value_function_length_is_checked() {
        let tensor = tied_bandit();

        let res = policy_improvement(&tensor, &ValueFunction::zeros(2), &SolverConfig::default());

        assert_that!(res.is_err()).is_true();
    }

    #[test]
    fn greedy_value_is_best_q() {
        let tensor = tied_bandit();

        let best = greedy_value(&tensor, &ValueFunction::zeros(1), 0, 0.9);

        assert_eq!(best, 1.);
    }
}
