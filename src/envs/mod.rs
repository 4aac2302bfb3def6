pub mod frozen_lake;
pub mod recorded;
pub mod simple_golf;
