use std::collections::HashSet;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;

use crate::annotation::ExampleFile;
use crate::error::Error;
use crate::loader::{EnvFilePolicy, load_env_files, load_example};
use crate::model::{EnvMap, KeyParsingMode};
use crate::report::DiagnosticSet;
use crate::sensitive::{SensitiveRuleset, warning};
use crate::validate::{BooleanMode, Validator};

const DEFAULT_EXAMPLE_FILE: &str = ".env.example";

/// Check `env_paths` (merged in order) against `example_path` with default rules.
pub fn check<I, P>(env_paths: I, example_path: impl AsRef<Path>) -> Result<DiagnosticSet, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Checker::new()
        .env_paths(env_paths)
        .example_path(example_path)
        .check()
}

/// Rules applied when comparing an env map with an example file.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub ignore: HashSet<String>,
    pub boolean_mode: BooleanMode,
    pub sensitive_ruleset: SensitiveRuleset,
}

/// Builder-style checker.
///
/// Env paths are used exactly as given; with none, the merged environment
/// is empty and every example key is missing.
#[derive(Debug, Clone)]
pub struct Checker {
    env_paths: Vec<PathBuf>,
    example_path: PathBuf,
    env_file_policy: EnvFilePolicy,
    key_parsing_mode: KeyParsingMode,
    options: CompareOptions,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env_path(mut self, path: impl AsRef<Path>) -> Self {
        self.env_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn env_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.env_paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    pub fn example_path(mut self, path: impl AsRef<Path>) -> Self {
        self.example_path = path.as_ref().to_path_buf();
        self
    }

    /// Keys exempt from `extra` reporting. They are still reported as missing.
    pub fn ignore<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.ignore.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn env_file_policy(mut self, policy: EnvFilePolicy) -> Self {
        self.env_file_policy = policy;
        self
    }

    pub fn key_parsing_mode(mut self, mode: KeyParsingMode) -> Self {
        self.key_parsing_mode = mode;
        self
    }

    pub fn boolean_mode(mut self, mode: BooleanMode) -> Self {
        self.options.boolean_mode = mode;
        self
    }

    pub fn sensitive_ruleset(mut self, ruleset: SensitiveRuleset) -> Self {
        self.options.sensitive_ruleset = ruleset;
        self
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Load every input and compare.
    ///
    /// The example file is read on a scoped thread while env files are merged.
    pub fn check(&self) -> Result<DiagnosticSet, Error> {
        let (env, example) = thread::scope(|scope| {
            let example = scope.spawn(|| load_example(&self.example_path));
            let env = load_env_files(
                &self.env_paths,
                self.env_file_policy,
                self.key_parsing_mode,
            );
            let example = example
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload));
            (env, example)
        });

        let report = compare(&env?, &example?, &self.options);
        tracing::debug!(
            missing = report.missing.len(),
            extra = report.extra.len(),
            type_errors = report.type_errors.len(),
            sensitive_warnings = report.sensitive_warnings.len(),
            "check finished"
        );
        Ok(report)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self {
            env_paths: Vec::new(),
            example_path: PathBuf::from(DEFAULT_EXAMPLE_FILE),
            env_file_policy: EnvFilePolicy::SkipMissing,
            key_parsing_mode: KeyParsingMode::Strict,
            options: CompareOptions::default(),
        }
    }
}

/// Diff a merged env map against a parsed example file.
pub fn compare(env: &EnvMap, example: &ExampleFile, options: &CompareOptions) -> DiagnosticSet {
    let validator = Validator::new(options.boolean_mode);

    let missing = example
        .keys()
        .filter(|key| !env.contains_key(key))
        .map(str::to_owned)
        .collect();

    let extra = env
        .keys()
        .filter(|key| !example.contains_key(key) && !options.ignore.contains(*key))
        .map(str::to_owned)
        .collect();

    let type_errors = example
        .entries()
        .iter()
        .filter_map(|entry| {
            let value = env.get(&entry.key)?;
            validator.validate(&entry.key, Some(value), &entry.directive)
        })
        .collect();

    let sensitive_warnings = env
        .iter()
        .filter_map(|(key, value)| {
            options
                .sensitive_ruleset
                .scan(key, value)
                .map(|heuristic| warning(key, heuristic))
        })
        .collect();

    DiagnosticSet {
        missing,
        extra,
        type_errors,
        sensitive_warnings,
    }
}
