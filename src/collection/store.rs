use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{PackageCollection, PackageSet, Progress};
use crate::package::{Mark, Package};
use crate::runtime::Runtime;

/// On-disk layout of the package state file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StoreFile {
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// A [`PackageSet`] backed by a JSON state file.
pub struct PackageStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    set: PackageSet,
}

impl<'a, R: Runtime> PackageStore<'a, R> {
    #[tracing::instrument(skip(runtime))]
    pub fn open(runtime: &'a R, path: &Path) -> Result<Self> {
        let set = Self::read(runtime, path)?;
        debug!("Loaded {} package(s) from {:?}", set.len(), path);
        Ok(Self {
            runtime,
            path: path.to_path_buf(),
            set,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self) -> &PackageSet {
        &self.set
    }

    fn read(runtime: &R, path: &Path) -> Result<PackageSet> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read package state {}", path.display()))?;
        let file: StoreFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid package state {}", path.display()))?;
        Ok(PackageSet::from_packages(file.packages))
    }

    /// Write `set` to the state file through a temporary sibling and a rename.
    fn save(&self, set: &PackageSet) -> Result<()> {
        let file = StoreFile {
            packages: set.clone().into_packages(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let mut tmp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        self.runtime.write(&tmp_path, content.as_bytes())?;
        self.runtime
            .rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to save package state {}", self.path.display()))
    }
}

impl<R: Runtime> PackageCollection for PackageStore<'_, R> {
    fn packages(&self) -> Vec<Package> {
        self.set.packages()
    }

    fn mark(&mut self, name: &str, mark: Mark) {
        self.set.mark(name, mark);
    }

    fn refresh(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.update(&format!("Reading package state from {}", self.path.display()));
        let fresh = Self::read(self.runtime, &self.path)?;
        self.set.replace_metadata(fresh);
        Ok(())
    }

    fn commit(&mut self, progress: &mut dyn Progress) -> Result<()> {
        // The live set keeps its marks until the new state is on disk.
        let mut next = self.set.clone();
        let applied = next.apply_marks(progress);
        progress.update(&format!("Applied {} change(s)", applied));
        self.save(&next)?;
        self.set = next;
        Ok(())
    }
}
