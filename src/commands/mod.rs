//! Subcommand implementations behind the CLI.

mod check;
pub mod config;
mod list;
mod run;

pub use check::check;
pub use config::Config;
pub use list::list;
pub use run::{RunOptions, run};
