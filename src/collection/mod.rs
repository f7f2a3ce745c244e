//! Package collections.
//!
//! The policy engine never talks to a package backend directly. It sees a
//! [`PackageCollection`]: something that can enumerate packages in a stable
//! order, record marks on them, refresh its metadata and commit the marks.
//!
//! - [`PackageSet`] keeps packages in memory and applies marks in place.
//! - [`PackageStore`] persists a `PackageSet` as a JSON state file.

mod set;
mod store;

use anyhow::Result;
use log::info;

use crate::package::{Mark, Package};

pub use set::{PackageSet, describe_change};
pub use store::{PackageStore, StoreFile};

/// Receives human-readable progress messages from long-running operations.
pub trait Progress {
    fn update(&mut self, message: &str);
}

/// Forwards progress messages to the log.
#[derive(Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn update(&mut self, message: &str) {
        info!("{}", message);
    }
}

pub trait PackageCollection {
    /// All known packages, in a deterministic order.
    fn packages(&self) -> Vec<Package>;

    /// Record `mark` on the named package. Marking twice with the same kind
    /// has the same effect as marking once. Unknown names are ignored.
    fn mark(&mut self, name: &str, mark: Mark);

    /// Update package metadata. Callers treat failures as non-fatal.
    fn refresh(&mut self, progress: &mut dyn Progress) -> Result<()>;

    /// Apply every recorded mark.
    fn commit(&mut self, progress: &mut dyn Progress) -> Result<()>;
}

/// Packages carrying a mark, in collection order.
pub fn marked_packages<C: PackageCollection + ?Sized>(collection: &C) -> Vec<Package> {
    collection
        .packages()
        .into_iter()
        .filter(|pkg| pkg.mark.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_packages_filters_unmarked() {
        let mut set = PackageSet::from_packages(vec![
            Package::new("a").installed("1").candidate("2"),
            Package::new("b").installed("1"),
        ]);
        set.mark("a", Mark::Upgrade);

        let marked = marked_packages(&set);
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].name, "a");
    }

    #[test]
    fn test_marked_packages_keeps_collection_order() {
        let mut set = PackageSet::from_packages(vec![
            Package::new("zsh").installed("5.9"),
            Package::new("bash").installed("5.2"),
            Package::new("dash").installed("0.5"),
        ]);
        set.mark("zsh", Mark::Keep);
        set.mark("bash", Mark::Remove);

        let names: Vec<String> = marked_packages(&set).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["bash", "zsh"]);
    }
}
