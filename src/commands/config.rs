use anyhow::{Context, Result};
use log::debug;

use std::path::PathBuf;

use crate::{classes::ClassSet, runtime::Runtime};

/// Default location of the package state file.
pub const DEFAULT_STATE_PATH: &str = "/var/lib/uptitude/packages.json";

/// The state file to use, falling back to [`DEFAULT_STATE_PATH`].
pub fn resolve_state_path(state_path: Option<PathBuf>) -> PathBuf {
    let state_path = state_path.unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));
    debug!("Using package state {:?}", state_path);
    state_path
}

/// Settings for subcommands that evaluate policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub state_path: PathBuf,
    /// `None` when neither an inline list nor a class file was given.
    pub classes: Option<ClassSet>,
}

impl Config {
    /// Resolve global options.
    ///
    /// An inline class list wins over a class file; the file is then not read.
    pub fn new<R: Runtime>(
        runtime: &R,
        state_path: Option<PathBuf>,
        classes: Option<String>,
        class_file: Option<PathBuf>,
    ) -> Result<Self> {
        let state_path = resolve_state_path(state_path);

        let classes = match (classes, class_file) {
            (Some(list), class_file) => {
                if let Some(path) = class_file {
                    debug!("Inline classes given, ignoring class file {:?}", path);
                }
                Some(ClassSet::parse_list(&list))
            }
            (None, Some(path)) => Some(
                ClassSet::load(runtime, &path)
                    .with_context(|| format!("Failed to load class file {}", path.display()))?,
            ),
            (None, None) => None,
        };

        if let Some(classes) = &classes {
            debug!("Host classes: {}", classes);
        }

        Ok(Self {
            state_path,
            classes,
        })
    }
}
