//! Parsing of example (template) files together with their inline annotations.

use std::collections::HashMap;

use crate::directive::TypeDirective;

/// One documented key from the example file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleEntry {
    pub key: String,
    /// Illustrative value, usually empty.
    pub raw_value: String,
    pub comment: Option<String>,
    pub directive: TypeDirective,
    pub line: u32,
}

/// Example keys in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleFile {
    entries: Vec<ExampleEntry>,
    by_key: HashMap<String, usize>,
}

impl ExampleFile {
    pub fn get(&self, key: &str) -> Option<&ExampleEntry> {
        self.by_key.get(key).map(|idx| &self.entries[*idx])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn entries(&self) -> &[ExampleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: ExampleEntry) {
        if let Some(existing_idx) = self.by_key.get(&entry.key).copied() {
            self.entries[existing_idx] = entry;
        } else {
            self.by_key.insert(entry.key.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }
}

/// Parse example file text.
///
/// Parsing is permissive: blank lines, comment lines and lines without `=`
/// are skipped rather than reported.
pub fn parse_example_str(input: &str) -> ExampleFile {
    let mut example = ExampleFile::default();

    for (idx, line) in input.lines().enumerate() {
        let line_num = idx as u32 + 1;
        match parse_example_line(line, line_num) {
            Some(entry) => {
                tracing::trace!(
                    key = %entry.key,
                    line = line_num,
                    directive = %entry.directive,
                    "parsed example entry"
                );
                example.insert(entry);
            }
            None => tracing::trace!(line = line_num, "skipped example line"),
        }
    }

    example
}

fn parse_example_line(line: &str, line_num: u32) -> Option<ExampleEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (key, rest) = trimmed.split_once('=')?;
    let key = strip_export(key.trim());
    if key.is_empty() {
        return None;
    }

    let (value, comment) = split_value_and_comment(rest);
    let directive = comment
        .map(TypeDirective::from_comment)
        .unwrap_or_default();

    Some(ExampleEntry {
        key: key.to_owned(),
        raw_value: unquote(value).to_owned(),
        comment: comment.map(str::to_owned),
        directive,
        line: line_num,
    })
}

fn strip_export(key: &str) -> &str {
    match key.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => key,
    }
}

/// Split the text after `=` at the first `#` that is outside quotes.
///
/// Only a quote opening the value is honored, so an apostrophe inside an
/// unquoted value does not hide the comment. Both halves are trimmed; an
/// empty comment after `#` still counts as a comment.
pub fn split_value_and_comment(raw: &str) -> (&str, Option<&str>) {
    let value_start = raw.len() - raw.trim_start().len();
    let mut active_quote = None;

    for (idx, ch) in raw.char_indices() {
        match (active_quote, ch) {
            (Some(quote), _) if ch == quote => active_quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if idx == value_start => active_quote = Some(ch),
            (None, '#') => return (raw[..idx].trim(), Some(raw[idx + 1..].trim())),
            _ => {}
        }
    }

    (raw.trim(), None)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
