//! Type directives embedded in example-file comments.
//!
//! Parsing happens in two stages so each can be tested on its own:
//! [`extract_type_token`] finds the raw `type: <token>` in a comment, and
//! [`TypeDirective::from_token`] turns that token into a tagged variant.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;

static TYPE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)type\s*:\s*([a-z0-9_]+\([^)]*\)|[a-z0-9_]+)")
        .expect("type directive pattern is valid")
});

/// Constraint attached to one example key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeDirective {
    /// Any non-empty value. Used when no directive, or an unknown one, is present.
    #[default]
    String,
    Number,
    Boolean,
    /// Exact, case-sensitive membership in the listed values.
    Enum(Vec<String>),
}

impl TypeDirective {
    /// Parse the directive out of an inline comment, falling back to `String`.
    pub fn from_comment(comment: &str) -> Self {
        extract_type_token(comment)
            .map(Self::from_token)
            .unwrap_or_default()
    }

    /// Interpret a token such as `number`, `Boolean` or `enum(a, b)`.
    ///
    /// Keywords are case-insensitive; enum members are kept verbatim apart
    /// from surrounding whitespace.
    pub fn from_token(token: &str) -> Self {
        let lowered = token.to_ascii_lowercase();
        if lowered.starts_with("enum(")
            && let (Some(open), Some(close)) = (token.find('('), token.rfind(')'))
        {
            let members = token[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(str::to_owned)
                .collect();
            return Self::Enum(members);
        }

        match lowered.as_str() {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            unknown => {
                tracing::debug!(
                    directive = unknown,
                    "unrecognized type directive, treating as string"
                );
                Self::String
            }
        }
    }
}

impl Display for TypeDirective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Enum(members) => write!(f, "enum({})", members.join(", ")),
        }
    }
}

/// Find the first `type: <token>` in a comment, case-insensitively.
pub fn extract_type_token(comment: &str) -> Option<&str> {
    TYPE_TOKEN
        .captures(comment)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
}
