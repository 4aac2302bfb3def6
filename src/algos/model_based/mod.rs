pub mod common;
pub mod evaluation;
pub mod improvement;
pub mod pi;
pub mod tensor;
pub mod vi;

use crate::common::defs::*;
use crate::error::Result;
use common::{SolverConfig, ValueFunction};
use tensor::TransitionTensor;

/// Dynamic-programming solver for a fully known finite MDP.
pub trait MdpSolver {
    fn name(&self) -> &'static str;

    fn solve(&self, tensor: &TransitionTensor, config: &SolverConfig) -> Result<Solution>;
}

/// Converged value function and greedy policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub v: ValueFunction,
    pub pi: Vec<Discrete>,
    /// Policy Iteration: improvement rounds. Value Iteration: sweeps.
    pub iterations: usize,
    /// Total Bellman sweeps across all evaluations.
    pub sweeps: usize,
}

impl Solution {
    pub fn v_star(&self, s: Discrete) -> Option<Continous> {
        self.v.get(s).copied()
    }

    pub fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        self.pi.get(s).copied()
    }

    pub fn q_star(
        &self,
        tensor: &TransitionTensor,
        s: Discrete,
        a: Discrete,
        gamma: Continous,
    ) -> Option<Continous> {
        if s >= tensor.n_s() || a >= tensor.n_a() || self.v.len() != tensor.n_s() {
            return None;
        }

        Some(tensor.q_value(&self.v, s, a, gamma))
    }
}

impl Policy for Solution {
    fn policy(&self, s: &Discrete) -> Option<Discrete> {
        self.pi_star(*s)
    }
}

pub fn solvers() -> Vec<Box<dyn MdpSolver>> {
    vec![Box::new(pi::PolicyIteration), Box::new(vi::ValueIteration)]
}
