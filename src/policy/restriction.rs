//! Origin restrictions.
//!
//! Action directives accept flags that limit them to packages whose candidate
//! comes from a particular place:
//!
//! ```text
//! upgrade --label Debian-Security --trusted
//! ```
//!
//! A package matches when at least one of its origin records satisfies every
//! given flag at once. Without flags every package matches. Values may start
//! with `-`.

use std::fmt;

use clap::Parser;

use crate::package::{OriginRecord, Package};

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(disable_help_flag = true, args_override_self = true)]
pub struct Restrictions {
    /// Required origin component (e.g. "main")
    #[arg(long, value_name = "V", allow_hyphen_values = true)]
    pub component: Option<String>,

    /// Required archive (e.g. "bookworm-security")
    #[arg(long, value_name = "V", allow_hyphen_values = true)]
    pub archive: Option<String>,

    /// Required origin (e.g. "Debian")
    #[arg(long, value_name = "V", allow_hyphen_values = true)]
    pub origin: Option<String>,

    /// Required label (e.g. "Debian-Security")
    #[arg(long, value_name = "V", allow_hyphen_values = true)]
    pub label: Option<String>,

    /// Required site (e.g. "security.debian.org")
    #[arg(long, value_name = "V", allow_hyphen_values = true)]
    pub site: Option<String>,

    /// Require a trusted origin
    #[arg(long)]
    pub trusted: bool,
}

impl Restrictions {
    /// Parse the flags following `command` on a script line.
    ///
    /// A flag given twice keeps its last value.
    pub fn parse_args(command: &str, args: &[String]) -> Result<Self, String> {
        Self::try_parse_from(std::iter::once(command).chain(args.iter().map(String::as_str)))
            .map_err(|err| {
                let rendered = err.to_string();
                rendered
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string()
            })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, pkg: &Package) -> bool {
        self.is_empty() || pkg.origins.iter().any(|origin| self.matches_origin(origin))
    }

    fn matches_origin(&self, origin: &OriginRecord) -> bool {
        fn field(required: &Option<String>, actual: &str) -> bool {
            required.as_deref().is_none_or(|value| value == actual)
        }

        field(&self.component, &origin.component)
            && field(&self.archive, &origin.archive)
            && field(&self.origin, &origin.origin)
            && field(&self.label, &origin.label)
            && field(&self.site, &origin.site)
            && (!self.trusted || origin.trusted)
    }
}

impl fmt::Display for Restrictions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("unrestricted");
        }

        let fields = [
            ("component", &self.component),
            ("archive", &self.archive),
            ("origin", &self.origin),
            ("label", &self.label),
            ("site", &self.site),
        ];
        let mut parts: Vec<String> = fields
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
            .collect();
        if self.trusted {
            parts.push("trusted".to_string());
        }
        f.write_str(&parts.join(" "))
    }
}
