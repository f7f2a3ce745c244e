use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

use crate::{
    collection::{LogProgress, PackageCollection, PackageStore, describe_change, marked_packages},
    policy::PolicyEngine,
    runtime::Runtime,
};

use super::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Report marks without committing.
    pub dry_run: bool,
    /// Refresh package metadata before evaluating the script.
    pub refresh: bool,
    /// Commit without asking.
    pub yes: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            refresh: true,
            yes: false,
        }
    }
}

/// Evaluate a policy script and commit the resulting marks.
#[tracing::instrument(skip(runtime, config))]
pub fn run<R: Runtime>(
    runtime: R,
    script_path: &Path,
    options: RunOptions,
    config: Config,
) -> Result<()> {
    let script = runtime
        .read_to_string(script_path)
        .with_context(|| format!("Failed to read policy script {}", script_path.display()))?;

    let mut store = PackageStore::open(&runtime, &config.state_path)?;

    if options.refresh {
        if let Err(e) = store.refresh(&mut LogProgress) {
            warn!("Refresh failed, continuing with current metadata: {:#}", e);
        }
    } else {
        debug!("Skipping refresh");
    }

    let report = PolicyEngine::new(&mut store, &runtime, config.classes)
        .run(&script)
        .with_context(|| format!("Policy script {} failed", script_path.display()))?;

    let suppressed = report.suppressed_count();
    if suppressed > 0 {
        println!("{} action(s) skipped by class rules.", suppressed);
    }

    let marked = marked_packages(&store);
    if marked.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }

    for pkg in &marked {
        if let Some(mark) = pkg.mark {
            println!("{}", describe_change(pkg, mark));
        }
    }

    if options.dry_run {
        println!("Dry run: {} change(s) not committed.", marked.len());
        return Ok(());
    }

    if !options.yes && !runtime.confirm(&format!("Commit {} change(s)?", marked.len()))? {
        println!("Commit cancelled.");
        return Ok(());
    }

    store.commit(&mut LogProgress)?;
    println!("Committed {} change(s).", marked.len());
    Ok(())
}
