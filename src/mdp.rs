use crate::common::defs::*;
use std::rc::Rc;

/// Markov Decision Process - Sutton & Barto 2018.
///
/// Discounting is a solver concern and lives in `SolverConfig`.
pub trait Mdp {
    fn name(&self) -> String;

    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn transitions(&self) -> Rc<Transitions>;

    /// State episodes start from when the model is simulated.
    fn initial_state(&self) -> Discrete {
        0
    }
}
