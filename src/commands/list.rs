use anyhow::Result;
use log::debug;

use std::path::Path;

use crate::{
    collection::PackageStore,
    package::Package,
    runtime::Runtime,
};

/// List every package in the state file.
#[tracing::instrument(skip(runtime))]
pub fn list<R: Runtime>(runtime: R, state_path: &Path) -> Result<()> {
    let store = PackageStore::open(&runtime, state_path)?;
    if store.set().is_empty() {
        println!("No packages known.");
        return Ok(());
    }

    debug!("Listing {} package(s)", store.set().len());
    for pkg in store.set().iter() {
        println!("{}", format_package(pkg));
    }
    Ok(())
}

fn format_package(pkg: &Package) -> String {
    let version = |v: &Option<crate::package::Version>| {
        v.as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    let mut line = format!(
        "{} {} {}",
        pkg.name,
        version(&pkg.installed),
        version(&pkg.candidate)
    );
    if pkg.is_upgradable() {
        line.push_str(" [upgradable]");
    }
    if pkg.held {
        line.push_str(" [held]");
    }
    line
}
