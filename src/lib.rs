//! Policy Iteration and Value Iteration for finite MDPs with a known model.
//!
//! ```
//! use rl_dp::prelude::*;
//!
//! let lake = FrozenLake::four_by_four(true).unwrap();
//! let tensor = TransitionTensor::from_mdp(&lake).unwrap();
//! let config = SolverConfig::new(0.9, 1e-6);
//!
//! let vi = ValueIteration.solve(&tensor, &config).unwrap();
//! let pi = PolicyIteration.solve(&tensor, &config).unwrap();
//! assert_eq!(vi.pi.len(), 16);
//! assert!((vi.v[0] - pi.v[0]).abs() < 1e-4);
//! ```

pub mod algos;
pub mod common;
pub mod envs;
pub mod error;
pub mod mdp;
pub mod simulator;

pub mod prelude {
    pub use crate::algos::model_based::{
        common::{SolverConfig, TieBreak, ValueFunction},
        evaluation::{policy_evaluation, policy_evaluation_from},
        improvement::policy_improvement,
        pi::PolicyIteration,
        solvers,
        tensor::TransitionTensor,
        vi::ValueIteration,
        MdpSolver, Solution,
    };
    pub use crate::common::defs::*;
    pub use crate::envs::{frozen_lake::FrozenLake, recorded::RecordedMdp, simple_golf::SimpleGolf};
    pub use crate::error::{MdpError, Result};
    pub use crate::mdp::Mdp;
    pub use crate::simulator::{Episode, RolloutSummary, TransitionSimulator};
}
