pub mod error;
pub mod pairing;

pub use error::{Error, Result};
pub use pairing::{random_pairings, solve, ExclusionGraph, Pairing, Solver, SolverConfig};
