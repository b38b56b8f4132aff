use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Findings of one check run.
///
/// All four sequences are always present; an empty report means the env
/// files match the example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSet {
    /// Keys documented in the example but absent from the merged env.
    pub missing: Vec<String>,
    /// Keys present in the merged env but not documented, minus ignored keys.
    pub extra: Vec<String>,
    pub type_errors: Vec<String>,
    pub sensitive_warnings: Vec<String>,
}

impl DiagnosticSet {
    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }

    pub fn issue_count(&self) -> usize {
        self.missing.len()
            + self.extra.len()
            + self.type_errors.len()
            + self.sensitive_warnings.len()
    }

    /// Whether the report should fail a pipeline.
    ///
    /// Extra keys only count when `strict` is set.
    pub fn has_failures(&self, strict: bool) -> bool {
        !self.missing.is_empty()
            || !self.type_errors.is_empty()
            || !self.sensitive_warnings.is_empty()
            || (strict && !self.extra.is_empty())
    }
}

impl Display for DiagnosticSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "env-checker report")?;
        writeln!(f)?;

        if self.is_clean() {
            return writeln!(f, "All checks passed");
        }

        let sections = [
            ("Missing variables", &self.missing),
            ("Extra variables", &self.extra),
            ("Type/format errors", &self.type_errors),
            ("Suspicious/sensitive values", &self.sensitive_warnings),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            writeln!(f, "{title} ({}):", items.len())?;
            for item in items {
                writeln!(f, "  - {item}")?;
            }
        }

        Ok(())
    }
}
