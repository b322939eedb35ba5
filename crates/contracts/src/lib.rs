//! # Contracts
//!
//! Shared interface contracts for the line pool: the job model, the pool
//! configuration and the traits that sit between the crates.
//! Business crates only depend on this crate, never on each other's internals.
//!
//! ## Job Model
//! - A `Job` is one input line plus its submission sequence number
//! - Every consumed `Job` yields exactly one `JobOutcome`

mod config;
mod error;
mod job;
mod sink;
mod source;

pub use config::*;
pub use error::*;
pub use job::*;
pub use sink::*;
pub use source::*;
