pub mod classes;
pub mod collection;
pub mod commands;
pub mod error;
pub mod package;
pub mod policy;
pub mod runtime;
pub mod script;
