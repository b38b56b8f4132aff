use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use env_checker::{
    BooleanMode, Checker, DiagnosticSet, EnvFilePolicy, KeyParsingMode, SensitiveRuleset,
};
use tracing_subscriber::EnvFilter;

const EXIT_FATAL: u8 = 1;
const EXIT_FAILURES: u8 = 2;

/// Validate `.env` files against an annotated `.env.example`.
#[derive(Parser, Debug)]
#[command(name = "env-checker", version, about)]
struct Cli {
    /// Env file path(s), merged in order. Repeat or pass comma-separated paths.
    #[arg(
        short,
        long = "env",
        value_name = "PATHS",
        env = "ENV_CHECKER_ENV",
        value_delimiter = ',',
        default_value = ".env"
    )]
    env_files: Vec<PathBuf>,

    /// Example (template) file.
    #[arg(
        short = 'x',
        long,
        value_name = "PATH",
        env = "ENV_CHECKER_EXAMPLE",
        default_value = ".env.example"
    )]
    example: PathBuf,

    /// Keys that may appear in env files without being documented.
    #[arg(short, long, value_name = "KEYS", env = "ENV_CHECKER_IGNORE", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Fail when an env file does not exist instead of skipping it.
    #[arg(long)]
    require_env: bool,

    /// Accept `0` and `1` as booleans.
    #[arg(long)]
    lenient_booleans: bool,

    /// Rule set used to flag sensitive values.
    #[arg(
        long,
        value_enum,
        env = "ENV_CHECKER_SENSITIVE_RULES",
        default_value_t = SensitiveRules::Patterns
    )]
    sensitive_rules: SensitiveRules,

    /// Accept permissive key syntax in env files and skip lines that are
    /// not assignments.
    #[arg(long)]
    permissive_keys: bool,

    /// Treat extra variables as failures.
    #[arg(long)]
    strict: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Exit with status 2 when the report contains failures.
    #[arg(long)]
    ci: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Suppress all log output.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SensitiveRules {
    /// Flag values by shape (JWT, access key, private key, long token).
    Patterns,
    /// Flag token-like values only in keys named like secrets.
    Keywords,
}

impl From<SensitiveRules> for SensitiveRuleset {
    fn from(value: SensitiveRules) -> Self {
        match value {
            SensitiveRules::Patterns => Self::Patterns,
            SensitiveRules::Keywords => Self::KeywordGated,
        }
    }
}

impl Cli {
    fn checker(&self) -> Checker {
        Checker::new()
            .env_paths(&self.env_files)
            .example_path(&self.example)
            .ignore(self.ignore.iter().map(|key| key.trim()).filter(|key| !key.is_empty()))
            .env_file_policy(if self.require_env {
                EnvFilePolicy::RequireAll
            } else {
                EnvFilePolicy::SkipMissing
            })
            .boolean_mode(if self.lenient_booleans {
                BooleanMode::Lenient
            } else {
                BooleanMode::Strict
            })
            .key_parsing_mode(if self.permissive_keys {
                KeyParsingMode::Permissive
            } else {
                KeyParsingMode::Strict
            })
            .sensitive_ruleset(self.sensitive_rules.into())
    }

    fn log_filter(&self) -> EnvFilter {
        let default = match (self.quiet, self.verbose) {
            (true, _) => "off",
            (false, 0) => "warn",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("env-checker: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let report = cli.checker().check()?;
    print!("{}", render(&report, cli.json)?);
    Ok(exit_code(&report, cli))
}

fn render(report: &DiagnosticSet, json: bool) -> Result<String> {
    if !json {
        return Ok(report.to_string());
    }

    let mut value = serde_json::to_value(report)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("ok".to_owned(), report.is_clean().into());
    }
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}

fn exit_code(report: &DiagnosticSet, cli: &Cli) -> ExitCode {
    if cli.ci && report.has_failures(cli.strict) {
        ExitCode::from(EXIT_FAILURES)
    } else {
        ExitCode::SUCCESS
    }
}
