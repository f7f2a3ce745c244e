use log::{debug, info};

use crate::classes::ClassSet;
use crate::collection::PackageCollection;
use crate::error::PolicyError;
use crate::runtime::Runtime;
use crate::script::ScriptReader;

use super::{ActionKind, CommandRegistry, Directive, Restrictions};

/// What an action directive did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The engine was inactive; nothing was marked.
    Suppressed,
    /// The action ran and marked these packages (possibly none).
    Applied { marked: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub line: usize,
    pub kind: ActionKind,
    pub outcome: ActionOutcome,
}

/// Per-run record of every action directive, in script order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub actions: Vec<ActionReport>,
}

impl RunReport {
    /// Total number of mark operations performed.
    pub fn marked_count(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match &a.outcome {
                ActionOutcome::Applied { marked } => marked.len(),
                ActionOutcome::Suppressed => 0,
            })
            .sum()
    }

    pub fn suppressed_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.outcome == ActionOutcome::Suppressed)
            .count()
    }
}

/// Interprets policy scripts against a package collection.
///
/// The engine starts active with no class set. `class` lines switch it on or
/// off, `classfile` lines supply the class set when none is configured yet,
/// and action lines mark packages while it is active. The engine only marks;
/// committing is left to the caller.
pub struct PolicyEngine<'a, C: PackageCollection + ?Sized, R: Runtime + ?Sized> {
    collection: &'a mut C,
    runtime: &'a R,
    registry: CommandRegistry,
    classes: Option<ClassSet>,
    active: bool,
}

impl<'a, C: PackageCollection + ?Sized, R: Runtime + ?Sized> PolicyEngine<'a, C, R> {
    pub fn new(collection: &'a mut C, runtime: &'a R, classes: Option<ClassSet>) -> Self {
        Self {
            collection,
            runtime,
            registry: CommandRegistry::standard(),
            classes,
            active: true,
        }
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn classes(&self) -> Option<&ClassSet> {
        self.classes.as_ref()
    }

    /// Execute every line of `script`, stopping at the first error.
    ///
    /// Marks made before an error stay on the collection.
    #[tracing::instrument(skip(self, script))]
    pub fn run(&mut self, script: &str) -> Result<RunReport, PolicyError> {
        let mut report = RunReport::default();
        for line in ScriptReader::new(script) {
            let line = line?;
            let directive = self.registry.parse(&line)?;
            if let Some(action) = self.execute(line.number, directive)? {
                report.actions.push(action);
            }
        }
        Ok(report)
    }

    fn execute(
        &mut self,
        line: usize,
        directive: Directive,
    ) -> Result<Option<ActionReport>, PolicyError> {
        match directive {
            Directive::Class(name) => {
                self.active = self
                    .classes
                    .as_ref()
                    .is_some_and(|classes| classes.contains(&name));
                match &self.classes {
                    Some(_) => info!("class {} at line {}: active={}", name, line, self.active),
                    None => info!(
                        "class {} at line {}: no classes configured, active={}",
                        name, line, self.active
                    ),
                }
                Ok(None)
            }
            Directive::ClassFile(path) => {
                if let Some(classes) = &self.classes {
                    info!(
                        "classfile {:?} at line {} ignored: classes already set to {}",
                        path, line, classes
                    );
                    return Ok(None);
                }
                let classes = ClassSet::load(self.runtime, &path).map_err(|e| {
                    PolicyError::ClassFile {
                        line,
                        path: path.clone(),
                        source: e.into(),
                    }
                })?;
                info!("classfile {:?} at line {}: loaded {}", path, line, classes);
                self.classes = Some(classes);
                Ok(None)
            }
            Directive::Action { kind, restrictions } => {
                let outcome = if self.active {
                    ActionOutcome::Applied {
                        marked: self.apply(line, kind, &restrictions),
                    }
                } else {
                    info!("{} at line {} skipped: inactive", kind, line);
                    ActionOutcome::Suppressed
                };
                Ok(Some(ActionReport {
                    line,
                    kind,
                    outcome,
                }))
            }
        }
    }

    fn apply(&mut self, line: usize, kind: ActionKind, restrictions: &Restrictions) -> Vec<String> {
        let predicate = kind.predicate();
        let mark = kind.mark();

        let selected: Vec<String> = self
            .collection
            .packages()
            .into_iter()
            .filter(|pkg| predicate.apply(pkg))
            .filter(|pkg| {
                if kind.skips_held() && pkg.held {
                    debug!("{} is held, not selecting for {}", pkg.name, kind);
                    return false;
                }
                true
            })
            .filter(|pkg| restrictions.matches(pkg))
            .map(|pkg| pkg.name)
            .collect();

        for name in &selected {
            self.collection.mark(name, mark);
        }

        info!(
            "{} at line {} ({}): {} package(s) marked",
            kind,
            line,
            restrictions,
            selected.len()
        );
        selected
    }
}

/// Parse every line of `script` without executing anything.
///
/// Returns the number of directives.
pub fn check_script(script: &str) -> Result<usize, PolicyError> {
    let registry = CommandRegistry::standard();
    let mut count = 0;
    for line in ScriptReader::new(script) {
        registry.parse(&line?)?;
        count += 1;
    }
    Ok(count)
}
