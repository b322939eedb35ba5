//! Command implementations.

mod dry_run;
mod run;

pub use dry_run::run_dry_run;
pub use run::run_pipeline;
