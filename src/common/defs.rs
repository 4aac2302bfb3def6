use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Discrete = usize;
pub type Continous = f64;

/// One outcome of taking an action in a state. Mirrors the gym
/// `(probability, nextstate, reward, terminal)` tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next_state: Discrete,
    pub probability: Continous,
    pub reward: Continous,
    pub done: bool,
}

impl Transition {
    pub fn new(
        probability: Continous,
        next_state: Discrete,
        reward: Continous,
        done: bool,
    ) -> Self {
        Self {
            next_state,
            probability,
            reward,
            done,
        }
    }
}

/// Sparse model keyed by `(state, action)`.
pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

pub trait Policy {
    /// Action to take in `s`, or `None` if `s` is outside the policy.
    fn policy(&self, s: &Discrete) -> Option<Discrete>;
}

impl Policy for [Discrete] {
    fn policy(&self, s: &Discrete) -> Option<Discrete> {
        self.get(*s).copied()
    }
}

impl Policy for Vec<Discrete> {
    fn policy(&self, s: &Discrete) -> Option<Discrete> {
        self.as_slice().policy(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub a: Option<Discrete>,
    pub r: Continous,
}
