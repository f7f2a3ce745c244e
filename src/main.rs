use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use uptitude::commands::{self, Config, RunOptions};

/// uptitude - policy-driven unattended upgrades
///
/// Evaluates a rule script against the known packages and marks packages for
/// upgrade, install, removal or hold, then commits the marks.
///
/// Examples:
///   uptitude run /etc/uptitude/policy            # Evaluate and commit after confirmation
///   uptitude run -y /etc/uptitude/policy         # Unattended
///   uptitude --classes web,db run --dry-run p    # Preview for a web+db host
///   uptitude check /etc/uptitude/policy          # Validate the script only
#[derive(Parser, Debug)]
#[command(author, version = env!("UPTITUDE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package state file (also via UPTITUDE_STATE)
    #[arg(long = "state", env = "UPTITUDE_STATE", value_name = "PATH", global = true)]
    pub state: Option<PathBuf>,

    /// Host classes, separated by commas or spaces (also via UPTITUDE_CLASSES)
    #[arg(long = "classes", env = "UPTITUDE_CLASSES", value_name = "LIST", global = true)]
    pub classes: Option<String>,

    /// File listing host classes; ignored when --classes is given
    #[arg(long = "class-file", value_name = "PATH", global = true)]
    pub class_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Evaluate a policy script and commit the resulting marks
    Run(RunArgs),

    /// Validate a policy script without touching any package
    Check(CheckArgs),

    /// List known packages
    List,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Policy script
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Show what would be marked without committing
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Skip the metadata refresh
    #[arg(long = "no-refresh")]
    pub no_refresh: bool,

    /// Commit without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Policy script
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(cli.verbose)),
    )
    .init();
    let runtime = uptitude::runtime::RealRuntime;

    match cli.command {
        Commands::Run(args) => {
            let config = Config::new(&runtime, cli.state, cli.classes, cli.class_file)?;
            let options = RunOptions {
                dry_run: args.dry_run,
                refresh: !args.no_refresh,
                yes: args.yes,
            };
            commands::run(runtime, &args.script, options, config)?
        }
        Commands::Check(args) => commands::check(runtime, &args.script)?,
        Commands::List => {
            let state_path = commands::config::resolve_state_path(cli.state);
            commands::list(runtime, &state_path)?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_run_parsing() {
        let cli = Cli::try_parse_from(["uptitude", "run", "policy", "-n", "-y"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.script, PathBuf::from("policy"));
                assert!(args.dry_run);
                assert!(args.yes);
                assert!(!args.no_refresh);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uptitude",
            "run",
            "policy",
            "--classes",
            "web,db",
            "--state",
            "/tmp/state.json",
        ])
        .unwrap();
        assert_eq!(cli.classes.as_deref(), Some("web,db"));
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/state.json")));
    }

    #[test]
    fn test_cli_check_parsing() {
        let cli =
            Cli::try_parse_from(["uptitude", "--class-file", "/etc/classes", "check", "p"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(_)));
        assert_eq!(cli.class_file, Some(PathBuf::from("/etc/classes")));
    }

    #[test]
    fn test_cli_verbosity() {
        let cli = Cli::try_parse_from(["uptitude", "-vv", "list"]).unwrap();
        assert_eq!(default_filter(cli.verbose), "debug");
        assert_eq!(default_filter(0), "warn");
    }

    #[test]
    fn test_cli_run_requires_script() {
        assert!(Cli::try_parse_from(["uptitude", "run"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["uptitude"]).is_err());
    }
}
