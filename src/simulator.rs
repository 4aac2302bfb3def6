//! Executes a policy against a known `Transitions` model.
//!
//! Used only to report how well a computed policy does; nothing here feeds
//! back into the solvers.

use crate::common::defs::*;
use crate::error::{MdpError, Result};
use crate::mdp::Mdp;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::rc::Rc;
use tracing::debug;

pub trait Weighted {
    fn p(&self) -> Continous;
}

impl Weighted for Transition {
    fn p(&self) -> Continous {
        self.probability
    }
}

/// Samples one item in proportion to its weight.
pub fn pick_next<'a, T: Weighted>(rng: &mut StdRng, ts: &'a [T]) -> Result<&'a T> {
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p()))
        .map_err(|e| MdpError::shape(format!("cannot sample outcomes: {e}")))?;

    Ok(&ts[dist.sample(rng)])
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// The first event is the initial state with no reward; every following
    /// event is the state reached by the previous action and its reward.
    pub events: Vec<EpisodeEvent>,
    pub terminated: bool,
}

impl Episode {
    pub fn total_reward(&self) -> Continous {
        self.events.iter().map(|e| e.r).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloutSummary {
    pub episodes: usize,
    pub terminated: usize,
    pub mean_return: Continous,
}

pub struct TransitionSimulator {
    transitions: Rc<Transitions>,
    initial_state: Discrete,
}

impl TransitionSimulator {
    pub fn new(mdp: &dyn Mdp) -> Self {
        Self {
            transitions: mdp.transitions(),
            initial_state: mdp.initial_state(),
        }
    }

    /// Runs one episode of at most `max_steps` steps, stopping early when a
    /// terminal outcome is drawn.
    pub fn run_episode(
        &self,
        rng: &mut StdRng,
        policy: &dyn Policy,
        max_steps: usize,
    ) -> Result<Episode> {
        let mut s = self.initial_state;
        let mut events = vec![EpisodeEvent {
            s,
            a: None,
            r: 0.,
        }];

        for _ in 0..max_steps {
            let a = policy
                .policy(&s)
                .ok_or_else(|| MdpError::shape(format!("policy has no action for state {s}")))?;
            let ts = self
                .transitions
                .get(&(s, a))
                .ok_or_else(|| MdpError::shape_at(s, a, "has no entry in the model"))?;
            let next = pick_next(rng, ts)?;

            if let Some(last) = events.last_mut() {
                last.a = Some(a);
            }
            events.push(EpisodeEvent {
                s: next.next_state,
                a: None,
                r: next.reward,
            });
            if next.done {
                return Ok(Episode {
                    events,
                    terminated: true,
                });
            }

            s = next.next_state;
        }

        Ok(Episode {
            events,
            terminated: false,
        })
    }

    /// Average undiscounted return of `policy` over `n` seeded episodes.
    pub fn evaluate(
        &self,
        policy: &dyn Policy,
        n: usize,
        max_steps: usize,
        seed: u64,
    ) -> Result<RolloutSummary> {
        let rng = &mut StdRng::seed_from_u64(seed);
        let mut total = 0.;
        let mut terminated = 0;
        for _ in 0..n {
            let ep = self.run_episode(rng, policy, max_steps)?;
            total += ep.total_reward();
            terminated += usize::from(ep.terminated);
        }

        let summary = RolloutSummary {
            episodes: n,
            terminated,
            mean_return: if n == 0 { 0. } else { total / n as Continous },
        };
        debug!(?summary, "rollouts done");

        Ok(summary)
    }
}
