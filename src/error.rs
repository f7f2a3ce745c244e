//! Errors raised while reading and interpreting a policy script.
//!
//! Every variant carries the 1-indexed script line it was raised on. All of
//! them are fatal: interpretation stops at the first one and marks already
//! recorded on the package collection are left in place.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error type used for wrapped lower-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// Malformed quoting (unterminated quote, trailing escape).
    #[error("line {line}: {message}")]
    ScriptSyntax { line: usize, message: String },

    /// Wrong number of arguments or unparseable restriction flags.
    #[error("line {line}: invalid arguments for '{command}': {message}")]
    CommandArgument {
        line: usize,
        command: String,
        message: String,
    },

    /// First token of a line is not a known command.
    #[error("line {line}: unknown command '{token}'")]
    UnknownCommand { line: usize, token: String },

    /// A `classfile` directive could not load its file.
    #[error("line {line}: failed to load class file {}", path.display())]
    ClassFile {
        line: usize,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl PolicyError {
    /// Script line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            PolicyError::ScriptSyntax { line, .. }
            | PolicyError::CommandArgument { line, .. }
            | PolicyError::UnknownCommand { line, .. }
            | PolicyError::ClassFile { line, .. } => *line,
        }
    }
}
