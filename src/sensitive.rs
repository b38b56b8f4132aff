//! Heuristics for values that look like leaked credentials.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

static JWT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("jwt pattern is valid")
});
static AWS_ACCESS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^AKIA[0-9A-Z]{16}$").expect("access key pattern is valid"));
static PRIVATE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-----BEGIN [A-Z ]*PRIVATE KEY-----").expect("private key pattern is valid")
});
static LONG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{32,}$").expect("long token pattern is valid"));
static KEYWORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{20,}$").expect("keyword token pattern is valid"));

const SENSITIVE_KEYWORDS: [&str; 7] = [
    "KEY", "TOKEN", "SECRET", "PASSWORD", "PWD", "AUTH", "ACCESS",
];

/// Which rule set decides that a value looks sensitive.
///
/// The two shapes trade recall for precision differently and are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensitiveRuleset {
    /// Value-shape checks only, applied to every key.
    #[default]
    Patterns,
    /// The key name must contain a sensitive keyword and the value must look
    /// like a token of 20 or more `[A-Za-z0-9_-]` characters.
    KeywordGated,
}

/// The heuristic that flagged a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Jwt,
    AwsAccessKey,
    PrivateKey,
    LongToken,
    SensitiveKeyName,
}

impl Heuristic {
    pub fn label(self) -> &'static str {
        match self {
            Self::Jwt => "JWT-like",
            Self::AwsAccessKey => "AWS Access Key (AKIA...)",
            Self::PrivateKey => "Private key block",
            Self::LongToken => "Long token (>=32 chars alnum/-._)",
            Self::SensitiveKeyName => "Token-like value in sensitive key",
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Run the value-shape heuristics in order; the first match wins.
pub fn scan(value: &str) -> Option<Heuristic> {
    if value.is_empty() {
        return None;
    }

    [
        (&JWT, Heuristic::Jwt),
        (&AWS_ACCESS_KEY, Heuristic::AwsAccessKey),
        (&PRIVATE_KEY, Heuristic::PrivateKey),
        (&LONG_TOKEN, Heuristic::LongToken),
    ]
    .into_iter()
    .find(|(pattern, _)| pattern.is_match(value))
    .map(|(_, heuristic)| heuristic)
}

impl SensitiveRuleset {
    /// Scan one key/value pair under this rule set.
    pub fn scan(self, key: &str, value: &str) -> Option<Heuristic> {
        match self {
            Self::Patterns => scan(value),
            Self::KeywordGated => {
                let upper = key.to_ascii_uppercase();
                let gated = SENSITIVE_KEYWORDS
                    .iter()
                    .any(|keyword| upper.contains(keyword));
                (gated && KEYWORD_TOKEN.is_match(value)).then_some(Heuristic::SensitiveKeyName)
            }
        }
    }
}

/// Human-readable warning for a flagged key.
pub fn warning(key: &str, heuristic: Heuristic) -> String {
    format!("Possible sensitive value in {key}: {heuristic}")
}
