//! Package data model.
//!
//! Packages are owned by a [`PackageCollection`](crate::collection::PackageCollection);
//! the policy engine only reads them and records marks through the collection.

mod predicate;
mod version;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use predicate::PackagePredicate;
pub use version::Version;

/// Provenance of a candidate version.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OriginRecord {
    pub component: String,
    pub archive: String,
    pub origin: String,
    pub label: String,
    pub site: String,
    pub trusted: bool,
}

/// Pending intent recorded on a package, applied on commit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Install,
    Remove,
    Upgrade,
    Downgrade,
    Keep,
    Reinstall,
}

impl Mark {
    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Install => "install",
            Mark::Remove => "remove",
            Mark::Upgrade => "upgrade",
            Mark::Downgrade => "downgrade",
            Mark::Keep => "keep",
            Mark::Reinstall => "reinstall",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    /// Installed version; `None` when the package is not installed.
    #[serde(default)]
    pub installed: Option<Version>,
    /// Version available for installation; `None` when nothing is available.
    #[serde(default)]
    pub candidate: Option<Version>,
    /// Where the candidate would come from. A package mirrored in several
    /// repositories has one record per repository.
    #[serde(default)]
    pub origins: Vec<OriginRecord>,
    /// Held packages are kept at their installed version.
    #[serde(default)]
    pub held: bool,
    #[serde(skip)]
    pub mark: Option<Mark>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            installed: None,
            candidate: None,
            origins: Vec::new(),
            held: false,
            mark: None,
        }
    }

    pub fn installed(mut self, version: impl Into<Version>) -> Self {
        self.installed = Some(version.into());
        self
    }

    pub fn candidate(mut self, version: impl Into<Version>) -> Self {
        self.candidate = Some(version.into());
        self
    }

    pub fn origin(mut self, origin: OriginRecord) -> Self {
        self.origins.push(origin);
        self
    }

    pub fn is_installed(&self) -> bool {
        PackagePredicate::Installed.apply(self)
    }

    pub fn is_upgradable(&self) -> bool {
        PackagePredicate::Upgradable.apply(self)
    }
}
