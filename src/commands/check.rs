use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::{policy::check_script, runtime::Runtime};

/// Validate a policy script without evaluating it against any package.
#[tracing::instrument(skip(runtime))]
pub fn check<R: Runtime>(runtime: R, script_path: &Path) -> Result<()> {
    let script = runtime
        .read_to_string(script_path)
        .with_context(|| format!("Failed to read policy script {}", script_path.display()))?;
    debug!("Checking {} byte(s) of policy", script.len());

    let count = check_script(&script)
        .with_context(|| format!("Policy script {} is invalid", script_path.display()))?;
    println!("{}: {} directive(s) OK", script_path.display(), count);
    Ok(())
}
