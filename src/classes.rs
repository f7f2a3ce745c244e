//! Host class sets.
//!
//! A class set names the roles a host belongs to (`web`, `db`, ...). Policy
//! scripts use `class <name>` lines to switch subsequent directives on or off
//! depending on membership.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::error::PolicyError;
use crate::runtime::Runtime;
use crate::script::ScriptReader;

/// Immutable set of class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSet {
    names: BTreeSet<String>,
}

impl ClassSet {
    /// Parse an inline list such as `"web, db;mail"`.
    ///
    /// Names are separated by any run of non-word characters (anything other
    /// than letters, digits and `_`).
    pub fn parse_list(list: &str) -> Self {
        list.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Collect every token of a class file, regardless of line grouping.
    pub fn from_script(source: &str) -> Result<Self, PolicyError> {
        let mut names = BTreeSet::new();
        for line in ScriptReader::new(source) {
            names.extend(line?.tokens);
        }
        Ok(Self { names })
    }

    /// Read and parse a class file.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        let classes = Self::from_script(&content)
            .with_context(|| format!("Invalid class file {}", path.display()))?;
        debug!("Loaded {} class(es) from {:?}", classes.len(), path);
        Ok(classes)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for ClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    #[test]
    fn test_parse_list_splits_on_non_word_runs() {
        let classes = ClassSet::parse_list("web, db;;mail  cache_01");
        assert_eq!(
            classes.iter().collect::<Vec<_>>(),
            vec!["cache_01", "db", "mail", "web"]
        );
    }

    #[test]
    fn test_parse_list_empty_input_is_empty_set() {
        assert!(ClassSet::parse_list("").is_empty());
        assert!(ClassSet::parse_list(" , ").is_empty());
    }

    #[test]
    fn test_from_script_flattens_lines() {
        let classes = ClassSet::from_script("a b\nc\n").unwrap();
        assert_eq!(classes, ClassSet::from_iter(["a", "b", "c"]));
    }

    #[test]
    fn test_from_script_collapses_duplicates_and_comments() {
        let classes = ClassSet::from_script("# roles\nweb db\nweb # again\n'mail relay'\n").unwrap();
        assert_eq!(classes.len(), 3);
        assert!(classes.contains("web"));
        assert!(classes.contains("mail relay"));
        assert!(!classes.contains("again"));
    }

    #[test]
    fn test_from_script_reports_bad_quoting() {
        let err = ClassSet::from_script("web\n\"db\n").unwrap_err();
        assert!(matches!(err, PolicyError::ScriptSyntax { line: 2, .. }));
    }

    #[test]
    fn test_load_reads_through_runtime() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/etc/uptitude/classes")))
            .returning(|_| Ok("web\ndb\n".into()));

        let classes = ClassSet::load(&runtime, Path::new("/etc/uptitude/classes")).unwrap();
        assert_eq!(classes.to_string(), "{db, web}");
    }

    #[test]
    fn test_load_propagates_read_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));

        let err = ClassSet::load(&runtime, Path::new("/etc/uptitude/classes")).unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }
}
