//! Package version ordering.
//!
//! Versions are opaque strings ordered segment by segment: a version is cut
//! into alternating runs of digits and non-digits, digit runs compare
//! numerically and everything else compares bytewise. When one version is a
//! prefix of the other, the shorter one is older (`1.0` < `1.0.1`).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = Segments::new(&self.0);
        let mut right = Segments::new(&other.0);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match compare_segments(a, b) {
                    Ordering::Equal => continue,
                    unequal => return unequal,
                },
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

fn compare_segments(a: &str, b: &str) -> Ordering {
    let a_numeric = a.bytes().all(|c| c.is_ascii_digit());
    let b_numeric = b.bytes().all(|c| c.is_ascii_digit());
    match (a_numeric, b_numeric) {
        (true, true) => {
            // Compare without parsing so arbitrarily long runs cannot overflow.
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        // Numbers sort after separators and letters.
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

/// Splits a version string into maximal digit and non-digit runs.
struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    fn new(version: &'a str) -> Self {
        Self { rest: version }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (segment, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::from(s)
    }

    #[test]
    fn test_numeric_segments_compare_numerically() {
        assert!(v("1.9") < v("1.10"));
        assert!(v("2.0") > v("1.99.99"));
        assert!(v("3.0.11") < v("3.0.13"));
    }

    #[test]
    fn test_prefix_is_older() {
        assert!(v("1.0") < v("1.0.1"));
        assert!(v("1.0-1") > v("1.0"));
    }

    #[test]
    fn test_leading_zeros_are_equal() {
        assert_eq!(v("1.01"), v("1.1"));
        assert_eq!(v("1.01").cmp(&v("1.1")), Ordering::Equal);
    }

    #[test]
    fn test_alpha_segments() {
        assert!(v("1.0a") < v("1.0b"));
        assert!(v("2.36-9+deb12u3") < v("2.36-9+deb12u4"));
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        assert!(v("1.99999999999999999999999") < v("1.100000000000000000000000"));
    }

    #[test]
    fn test_display_and_serde_are_plain_strings() {
        let version = v("1:2.3-4");
        assert_eq!(version.to_string(), "1:2.3-4");
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"1:2.3-4\"");
        let parsed: Version = serde_json::from_str("\"1:2.3-4\"").unwrap();
        assert_eq!(parsed.as_str(), "1:2.3-4");
    }
}
