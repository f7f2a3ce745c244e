//! Policy script interpretation.
//!
//! A policy script is a list of directives, one per line:
//!
//! ```text
//! classfile /etc/uptitude/classes
//! upgrade --label Debian-Security --trusted   # everyone gets security fixes
//! class web
//! upgrade                                     # web hosts take everything
//! ```
//!
//! [`CommandRegistry`] turns lines into [`Directive`]s, [`PolicyEngine`]
//! executes them against a package collection.

mod command;
mod engine;
mod restriction;

pub use command::{ActionKind, CommandKind, CommandRegistry, Directive};
pub use engine::{ActionOutcome, ActionReport, PolicyEngine, RunReport, check_script};
pub use restriction::Restrictions;
