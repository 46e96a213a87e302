pub mod amortization;
pub mod applications;
pub mod constants;
pub mod decision;
pub mod documents;
pub mod errors;
pub mod scenarios;
pub mod simulation;

pub use errors::{Error, Result};
pub use applications::*;
pub use simulation::*;
