use rl_dp::prelude::*;

#[allow(dead_code)]
pub fn solve_both(mdp: &dyn Mdp, config: &SolverConfig) -> (TransitionTensor, Solution, Solution) {
    let tensor = TransitionTensor::from_mdp(mdp).unwrap();
    let pi = PolicyIteration.solve(&tensor, config).unwrap();
    let vi = ValueIteration.solve(&tensor, config).unwrap();

    (tensor, pi, vi)
}

#[allow(dead_code)]
pub fn deterministic(transitions: &[((Discrete, Discrete), Discrete, Continous)]) -> Transitions {
    transitions
        .iter()
        .map(|&(sa, next, r)| (sa, vec![Transition::new(1., next, r, false)]))
        .collect()
}

/// Largest gap between `max_a Q(s, a)` and `Q(s, pi(s))` under `v`.
#[allow(dead_code)]
pub fn greedy_gap(
    tensor: &TransitionTensor,
    solution: &Solution,
    pi: &[Discrete],
    gamma: f64,
) -> f64 {
    (0..tensor.n_s())
        .map(|s| {
            let best = (0..tensor.n_a())
                .map(|a| solution.q_star(tensor, s, a, gamma).unwrap())
                .fold(f64::NEG_INFINITY, f64::max);
            best - solution.q_star(tensor, s, pi[s], gamma).unwrap()
        })
        .fold(0., f64::max)
}
