//! Script directives and the table of known commands.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::PolicyError;
use crate::package::{Mark, PackagePredicate};
use crate::script::ScriptLine;

use super::Restrictions;

/// Directives that select packages and mark them. Only executed while the
/// engine is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Upgrade,
    Install,
    Remove,
    Hold,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Upgrade => "upgrade",
            ActionKind::Install => "install",
            ActionKind::Remove => "remove",
            ActionKind::Hold => "hold",
        }
    }

    /// Packages this action may select before restrictions are applied.
    pub fn predicate(self) -> PackagePredicate {
        match self {
            ActionKind::Upgrade | ActionKind::Install => PackagePredicate::Upgradable,
            ActionKind::Remove | ActionKind::Hold => PackagePredicate::Installed,
        }
    }

    pub fn mark(self) -> Mark {
        match self {
            ActionKind::Upgrade => Mark::Upgrade,
            ActionKind::Install => Mark::Install,
            ActionKind::Remove => Mark::Remove,
            ActionKind::Hold => Mark::Keep,
        }
    }

    /// Whether packages already held in the collection are left alone.
    pub fn skips_held(self) -> bool {
        matches!(self, ActionKind::Upgrade | ActionKind::Install)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handler registered for a command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Class,
    ClassFile,
    Action(ActionKind),
}

/// A parsed, validated script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Class(String),
    ClassFile(PathBuf),
    Action {
        kind: ActionKind,
        restrictions: Restrictions,
    },
}

const STANDARD_COMMANDS: [(&str, CommandKind); 6] = [
    ("class", CommandKind::Class),
    ("classfile", CommandKind::ClassFile),
    ("upgrade", CommandKind::Action(ActionKind::Upgrade)),
    ("install", CommandKind::Action(ActionKind::Install)),
    ("remove", CommandKind::Action(ActionKind::Remove)),
    ("hold", CommandKind::Action(ActionKind::Hold)),
];

/// Maps command names to handlers and turns script lines into directives.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, CommandKind>,
}

impl CommandRegistry {
    pub fn standard() -> Self {
        Self {
            commands: STANDARD_COMMANDS.into_iter().collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<CommandKind> {
        self.commands.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Validate a line's command name and argument shape.
    pub fn parse(&self, line: &ScriptLine) -> Result<Directive, PolicyError> {
        let command = line.command();
        let kind = self
            .lookup(command)
            .ok_or_else(|| PolicyError::UnknownCommand {
                line: line.number,
                token: command.to_string(),
            })?;

        match kind {
            CommandKind::Class => single_argument(line).map(Directive::Class),
            CommandKind::ClassFile => {
                single_argument(line).map(|path| Directive::ClassFile(PathBuf::from(path)))
            }
            CommandKind::Action(kind) => Restrictions::parse_args(command, line.args())
                .map(|restrictions| Directive::Action { kind, restrictions })
                .map_err(|message| PolicyError::CommandArgument {
                    line: line.number,
                    command: command.to_string(),
                    message,
                }),
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn single_argument(line: &ScriptLine) -> Result<String, PolicyError> {
    match line.args() {
        [arg] => Ok(arg.clone()),
        args => Err(PolicyError::CommandArgument {
            line: line.number,
            command: line.command().to_string(),
            message: format!("expected exactly 1 argument, got {}", args.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(number: usize, words: &[&str]) -> ScriptLine {
        ScriptLine {
            number,
            tokens: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_registry_lists_every_command() {
        let registry = CommandRegistry::standard();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["class", "classfile", "hold", "install", "remove", "upgrade"]
        );
    }

    #[test]
    fn test_action_table() {
        assert_eq!(ActionKind::Upgrade.mark(), Mark::Upgrade);
        assert_eq!(ActionKind::Install.mark(), Mark::Install);
        assert_eq!(ActionKind::Remove.mark(), Mark::Remove);
        assert_eq!(ActionKind::Hold.mark(), Mark::Keep);
        assert_eq!(ActionKind::Install.predicate(), PackagePredicate::Upgradable);
        assert_eq!(ActionKind::Hold.predicate(), PackagePredicate::Installed);
    }

    #[test]
    fn test_parse_class() {
        let registry = CommandRegistry::standard();
        assert_eq!(
            registry.parse(&line(1, &["class", "web"])).unwrap(),
            Directive::Class("web".into())
        );
    }

    #[test]
    fn test_parse_classfile_arity() {
        let registry = CommandRegistry::standard();
        assert_eq!(
            registry.parse(&line(1, &["classfile", "/etc/classes"])).unwrap(),
            Directive::ClassFile(PathBuf::from("/etc/classes"))
        );

        for words in [&["classfile"][..], &["classfile", "a", "b"][..]] {
            match registry.parse(&line(4, words)) {
                Err(PolicyError::CommandArgument { line, command, .. }) => {
                    assert_eq!(line, 4);
                    assert_eq!(command, "classfile");
                }
                other => panic!("Expected argument error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_class_without_name_fails() {
        let err = CommandRegistry::standard()
            .parse(&line(2, &["class"]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: invalid arguments for 'class': expected exactly 1 argument, got 0"
        );
    }

    #[test]
    fn test_parse_action_with_restrictions() {
        let directive = CommandRegistry::standard()
            .parse(&line(3, &["upgrade", "--label", "Debian-Security", "--trusted"]))
            .unwrap();
        assert_eq!(
            directive,
            Directive::Action {
                kind: ActionKind::Upgrade,
                restrictions: Restrictions {
                    label: Some("Debian-Security".into()),
                    trusted: true,
                    ..Default::default()
                },
            }
        );
    }

    #[test]
    fn test_parse_action_bad_flag() {
        match CommandRegistry::standard().parse(&line(5, &["hold", "--bogus"])) {
            Err(PolicyError::CommandArgument { line, command, message }) => {
                assert_eq!(line, 5);
                assert_eq!(command, "hold");
                assert!(message.contains("--bogus"));
            }
            other => panic!("Expected argument error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        match CommandRegistry::standard().parse(&line(9, &["dist-upgrade"])) {
            Err(PolicyError::UnknownCommand { line, token }) => {
                assert_eq!(line, 9);
                assert_eq!(token, "dist-upgrade");
            }
            other => panic!("Expected unknown command, got {:?}", other),
        }
    }
}
