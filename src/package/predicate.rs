//! Composable package predicates.
//!
//! Predicates form refinement chains: every predicate names an optional base
//! predicate plus its own extra condition. The base is always evaluated first
//! and a failing base short-circuits, so a refinement never sees a package the
//! base rejected (e.g. `Upgradable` never compares a missing installed version).

use super::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagePredicate {
    /// An installed version is present.
    Installed,
    /// Installed, a candidate is present, and installed < candidate.
    Upgradable,
}

impl PackagePredicate {
    /// The predicate this one refines.
    pub fn base(self) -> Option<PackagePredicate> {
        match self {
            PackagePredicate::Installed => None,
            PackagePredicate::Upgradable => Some(PackagePredicate::Installed),
        }
    }

    pub fn apply(self, pkg: &Package) -> bool {
        if let Some(base) = self.base()
            && !base.apply(pkg)
        {
            return false;
        }
        self.refinement(pkg)
    }

    fn refinement(self, pkg: &Package) -> bool {
        match self {
            PackagePredicate::Installed => pkg.installed.is_some(),
            PackagePredicate::Upgradable => match (&pkg.installed, &pkg.candidate) {
                (Some(installed), Some(candidate)) => installed < candidate,
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed() {
        assert!(PackagePredicate::Installed.apply(&Package::new("a").installed("1")));
        assert!(!PackagePredicate::Installed.apply(&Package::new("a").candidate("1")));
    }

    #[test]
    fn test_upgradable_requires_newer_candidate() {
        let pred = PackagePredicate::Upgradable;
        assert!(pred.apply(&Package::new("a").installed("1").candidate("2")));
        assert!(!pred.apply(&Package::new("a").installed("2").candidate("2")));
        assert!(!pred.apply(&Package::new("a").installed("2").candidate("1")));
    }

    #[test]
    fn test_upgradable_without_candidate_is_false() {
        assert!(!PackagePredicate::Upgradable.apply(&Package::new("a").installed("1")));
    }

    #[test]
    fn test_upgradable_not_installed_is_false() {
        assert!(!PackagePredicate::Upgradable.apply(&Package::new("a").candidate("1")));
        assert!(!PackagePredicate::Upgradable.apply(&Package::new("a")));
    }

    #[test]
    fn test_upgradable_agrees_with_definition() {
        let samples = [
            Package::new("a"),
            Package::new("a").installed("1.0"),
            Package::new("a").candidate("1.0"),
            Package::new("a").installed("1.0").candidate("1.0.1"),
            Package::new("a").installed("1.10").candidate("1.9"),
        ];
        for pkg in &samples {
            let expected = PackagePredicate::Installed.apply(pkg)
                && pkg
                    .candidate
                    .as_ref()
                    .is_some_and(|c| pkg.installed.as_ref().is_some_and(|i| i < c));
            assert_eq!(PackagePredicate::Upgradable.apply(pkg), expected, "{:?}", pkg);
        }
    }

    #[test]
    fn test_base_chain() {
        assert_eq!(PackagePredicate::Installed.base(), None);
        assert_eq!(
            PackagePredicate::Upgradable.base(),
            Some(PackagePredicate::Installed)
        );
    }
}
