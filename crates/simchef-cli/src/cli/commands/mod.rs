//! CLI command handlers, one file per command.

mod build;
mod fetch;
mod run;
mod status;

pub use build::run_build;
pub use fetch::run_fetch;
pub use run::run_pipeline;
pub use status::run_status;
