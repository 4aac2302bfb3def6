//! Dense view of a sparse `Transitions` model.
//!
//! Outcomes of a `(state, action)` pair are aggregated, not indexed: the
//! reward table holds `Σ p_i r_i` and the successor list is a distribution
//! over distinct next states. A single-outcome pair therefore keeps exactly
//! its `(probability, next_state, reward)` triple.

use crate::common::defs::*;
use crate::error::{MdpError, Result};
use crate::mdp::Mdp;
use ndarray::{Array1, Array2};
use tracing::debug;

const PROBABILITY_MASS_TOLERANCE: Continous = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTensor {
    n_s: usize,
    n_a: usize,
    expected_reward: Array2<Continous>,
    // CSR layout: successors of (s, a) live in
    // `successors[offsets[s * n_a + a]..offsets[s * n_a + a + 1]]`.
    offsets: Vec<usize>,
    successors: Vec<(Discrete, Continous)>,
}

impl TransitionTensor {
    pub fn from_mdp(mdp: &dyn Mdp) -> Result<Self> {
        Self::new(&mdp.transitions(), mdp.n_s(), mdp.n_a())
    }

    pub fn new(transitions: &Transitions, n_s: usize, n_a: usize) -> Result<Self> {
        if n_s == 0 || n_a == 0 {
            return Err(MdpError::shape(format!(
                "state and action spaces must be non-empty, got n_s: {n_s}, n_a: {n_a}"
            )));
        }

        if let Some(&(s, a)) = transitions.keys().find(|&&(s, a)| s >= n_s || a >= n_a) {
            return Err(MdpError::shape_at(
                s,
                a,
                format!("is outside the {n_s}x{n_a} state-action space"),
            ));
        }

        let n_pairs = n_s.checked_mul(n_a).ok_or_else(|| {
            MdpError::shape(format!("{n_s}x{n_a} state-action space is too large"))
        })?;
        if transitions.len() != n_pairs {
            // Every key is in range, so one of the first `len + 1` pairs is absent.
            let (s, a) = (0..n_pairs)
                .map(|i| (i / n_a, i % n_a))
                .find(|sa| !transitions.contains_key(sa))
                .unwrap_or((0, 0));
            return Err(MdpError::shape_at(s, a, "has no entry in the model"));
        }

        let mut expected_reward = Array2::zeros((n_s, n_a));
        let mut offsets = Vec::with_capacity(n_pairs + 1);
        let mut successors: Vec<(Discrete, Continous)> = Vec::new();
        offsets.push(0);

        for s in 0..n_s {
            for a in 0..n_a {
                let ts = transitions
                    .get(&(s, a))
                    .ok_or_else(|| MdpError::shape_at(s, a, "has no entry in the model"))?;
                if ts.is_empty() {
                    return Err(MdpError::shape_at(s, a, "has no outcomes"));
                }

                let start = successors.len();
                let mut mass = 0.;
                let mut reward = 0.;
                for t in ts {
                    Self::check_outcome(s, a, t, n_s)?;
                    mass += t.probability;
                    reward += t.probability * t.reward;

                    match successors[start..]
                        .iter_mut()
                        .find(|entry| entry.0 == t.next_state)
                    {
                        Some((_, p)) => *p += t.probability,
                        None => successors.push((t.next_state, t.probability)),
                    }
                }

                if (mass - 1.).abs() > PROBABILITY_MASS_TOLERANCE {
                    return Err(MdpError::shape_at(
                        s,
                        a,
                        format!("outcome probabilities sum to {mass}, expected 1"),
                    ));
                }

                expected_reward[[s, a]] = reward;
                offsets.push(successors.len());
            }
        }

        let tensor = Self {
            n_s,
            n_a,
            expected_reward,
            offsets,
            successors,
        };
        debug!(
            n_s,
            n_a,
            single_outcome = tensor.is_single_outcome(),
            "transition tensor built"
        );

        Ok(tensor)
    }

    fn check_outcome(s: Discrete, a: Discrete, t: &Transition, n_s: usize) -> Result<()> {
        if t.next_state >= n_s {
            return Err(MdpError::shape_at(
                s,
                a,
                format!("leads to state {} outside 0..{n_s}", t.next_state),
            ));
        }
        if !t.probability.is_finite() || t.probability < 0. {
            return Err(MdpError::shape_at(
                s,
                a,
                format!("has invalid probability {}", t.probability),
            ));
        }
        if !t.reward.is_finite() {
            return Err(MdpError::shape_at(
                s,
                a,
                format!("has non-finite reward {}", t.reward),
            ));
        }

        Ok(())
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn expected_reward(&self, s: Discrete, a: Discrete) -> Continous {
        self.expected_reward[[s, a]]
    }

    /// Distinct next states of `(s, a)` with their aggregated probabilities.
    pub fn successors(&self, s: Discrete, a: Discrete) -> &[(Discrete, Continous)] {
        let i = s * self.n_a + a;
        &self.successors[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn is_single_outcome(&self) -> bool {
        self.offsets.windows(2).all(|w| w[1] - w[0] == 1)
    }

    /// One-step lookahead `Σ p_i (r_i + γ V(s'_i))`.
    pub fn q_value(
        &self,
        v: &Array1<Continous>,
        s: Discrete,
        a: Discrete,
        gamma: Continous,
    ) -> Continous {
        let continuation: Continous = self
            .successors(s, a)
            .iter()
            .map(|&(next, p)| p * v[next])
            .sum();

        self.expected_reward[[s, a]] + gamma * continuation
    }

    pub(crate) fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.n_s {
            return Err(MdpError::shape(format!(
                "{what} has {len} entries, model has {} states",
                self.n_s
            )));
        }

        Ok(())
    }
}
