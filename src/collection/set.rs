use std::collections::BTreeMap;

use anyhow::Result;
use log::{debug, warn};

use super::{PackageCollection, Progress};
use crate::package::{Mark, Package};

/// In-memory package collection, iterated by package name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSet {
    packages: BTreeMap<String, Package>,
}

impl PackageSet {
    pub fn from_packages(packages: impl IntoIterator<Item = Package>) -> Self {
        Self {
            packages: packages
                .into_iter()
                .map(|pkg| (pkg.name.clone(), pkg))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn into_packages(self) -> Vec<Package> {
        self.packages.into_values().collect()
    }

    /// Replace metadata with `fresh`, keeping marks on packages that still exist.
    pub fn replace_metadata(&mut self, mut fresh: PackageSet) {
        for (name, pkg) in fresh.packages.iter_mut() {
            if let Some(old) = self.packages.get(name) {
                pkg.mark = old.mark;
            }
        }
        self.packages = fresh.packages;
    }

    /// Apply every mark in place and clear it. Returns the number of packages changed.
    pub fn apply_marks(&mut self, progress: &mut dyn Progress) -> usize {
        let mut applied = 0;
        for pkg in self.packages.values_mut() {
            let Some(mark) = pkg.mark.take() else {
                continue;
            };
            progress.update(&describe_change(pkg, mark));
            match mark {
                Mark::Install | Mark::Upgrade | Mark::Downgrade | Mark::Reinstall => {
                    match &pkg.candidate {
                        Some(candidate) => pkg.installed = Some(candidate.clone()),
                        None => {
                            warn!("{} has no candidate version, cannot {}", pkg.name, mark);
                            continue;
                        }
                    }
                }
                Mark::Remove => pkg.installed = None,
                Mark::Keep => pkg.held = true,
            }
            applied += 1;
        }
        applied
    }
}

/// One-line description of a pending change, e.g. `upgrade openssl 3.0.11 -> 3.0.13`.
pub fn describe_change(pkg: &Package, mark: Mark) -> String {
    let installed = pkg
        .installed
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    match mark {
        Mark::Remove | Mark::Keep => format!("{} {} {}", mark, pkg.name, installed),
        _ => {
            let candidate = pkg
                .candidate
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "(none)".to_string());
            format!("{} {} {} -> {}", mark, pkg.name, installed, candidate)
        }
    }
}

impl PackageCollection for PackageSet {
    fn packages(&self) -> Vec<Package> {
        self.packages.values().cloned().collect()
    }

    fn mark(&mut self, name: &str, mark: Mark) {
        match self.packages.get_mut(name) {
            Some(pkg) => {
                debug!("Marking {} for {}", name, mark);
                pkg.mark = Some(mark);
            }
            None => warn!("Cannot mark unknown package {}", name),
        }
    }

    fn refresh(&mut self, _progress: &mut dyn Progress) -> Result<()> {
        Ok(())
    }

    fn commit(&mut self, progress: &mut dyn Progress) -> Result<()> {
        self.apply_marks(progress);
        Ok(())
    }
}
