use crate::directive::TypeDirective;

/// Which literals count as booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanMode {
    /// Only `true` and `false`, in any letter case.
    #[default]
    Strict,
    /// Also accept `0` and `1`.
    Lenient,
}

/// Checks values against their example directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    boolean_mode: BooleanMode,
}

impl Validator {
    pub fn new(boolean_mode: BooleanMode) -> Self {
        Self { boolean_mode }
    }

    /// Validate `value` for `key`, returning a diagnostic when it fails.
    ///
    /// An absent value always yields the missing diagnostic and an empty one
    /// the empty diagnostic, whatever the directive.
    pub fn validate(
        &self,
        key: &str,
        value: Option<&str>,
        directive: &TypeDirective,
    ) -> Option<String> {
        let Some(value) = value else {
            return Some(format!("Missing variable: {key}"));
        };
        if value.is_empty() {
            return Some(format!("Variable \"{key}\" is empty"));
        }

        match directive {
            TypeDirective::String => None,
            TypeDirective::Number if is_number(value) => None,
            TypeDirective::Number => Some(format!(
                "Variable \"{key}\" should be a number but got \"{value}\""
            )),
            TypeDirective::Boolean if self.is_boolean(value) => None,
            TypeDirective::Boolean => Some(match self.boolean_mode {
                BooleanMode::Strict => format!(
                    "Variable \"{key}\" should be a boolean (\"true\" or \"false\") but got \"{value}\""
                ),
                BooleanMode::Lenient => format!(
                    "Variable \"{key}\" should be a boolean (\"true\", \"false\", \"0\" or \"1\") but got \"{value}\""
                ),
            }),
            TypeDirective::Enum(members) if members.iter().any(|member| member == value) => None,
            TypeDirective::Enum(members) => Some(format!(
                "Variable \"{key}\" should be one of [{}] but got \"{value}\"",
                members.join(", ")
            )),
        }
    }

    fn is_boolean(&self, value: &str) -> bool {
        let lowered = value.to_ascii_lowercase();
        match self.boolean_mode {
            BooleanMode::Strict => matches!(lowered.as_str(), "true" | "false"),
            BooleanMode::Lenient => matches!(lowered.as_str(), "true" | "false" | "0" | "1"),
        }
    }
}

/// Validate with the default (strict boolean) rules.
pub fn validate(key: &str, value: Option<&str>, directive: &TypeDirective) -> Option<String> {
    Validator::default().validate(key, value, directive)
}

fn is_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}
