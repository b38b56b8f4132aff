use std::borrow::Cow;
use std::path::Path;

use crate::error::{ParseError, ParseErrorKind};
use crate::model::{Entry, EnvMap, KeyParsingMode};

/// Parse env file text into an ordered map using strict key rules.
pub fn parse_str(input: &str) -> Result<EnvMap, ParseError> {
    parse_str_with_mode(input, KeyParsingMode::Strict)
}

/// Parse env file text into an ordered map using a specific key parsing mode.
pub fn parse_str_with_mode(
    input: &str,
    key_parsing_mode: KeyParsingMode,
) -> Result<EnvMap, ParseError> {
    parse_str_with_source(input, None, key_parsing_mode)
}

pub(crate) fn parse_str_with_source(
    input: &str,
    source: Option<&Path>,
    key_parsing_mode: KeyParsingMode,
) -> Result<EnvMap, ParseError> {
    let normalized = normalize_newlines(input);
    let mut map = EnvMap::new();

    for statement in Statements::new(normalized.as_ref()) {
        let parsed = parse_statement(statement.text, statement.line, source, key_parsing_mode)
            .map_err(|err| match source {
                Some(path) => err.with_path(path),
                None => err,
            })?;
        if let Some(entry) = parsed {
            map.insert(entry);
        }
    }

    Ok(map)
}

/// One logical statement: a single line, or several when a quoted value spans newlines.
struct Statement<'a> {
    text: &'a str,
    line: u32,
}

/// Only a quote that opens a value can span lines; quotes in comments,
/// keys or unquoted values cannot.
#[derive(Clone, Copy)]
enum ScanState {
    LineStart,
    Key,
    ValueStart,
    Rest,
}

struct Statements<'a> {
    input: &'a str,
    offset: usize,
    line: u32,
}

impl<'a> Statements<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = Statement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        if self.offset >= bytes.len() {
            return None;
        }

        let start = self.offset;
        let line = self.line;
        let mut idx = start;
        let mut newlines = 0u32;
        let mut active_quote: Option<u8> = None;
        let mut state = ScanState::LineStart;

        while idx < bytes.len() {
            let byte = bytes[idx];
            if byte == b'\n' {
                newlines += 1;
                if active_quote.is_none() {
                    break;
                }
            } else if let Some(quote) = active_quote {
                if byte == quote && !is_preceded_by_odd_backslashes(bytes, idx) {
                    active_quote = None;
                }
            } else {
                state = match (state, byte) {
                    (ScanState::LineStart, b' ' | b'\t') => ScanState::LineStart,
                    (ScanState::LineStart, b'#') => ScanState::Rest,
                    (ScanState::LineStart | ScanState::Key, b'=') => ScanState::ValueStart,
                    (ScanState::LineStart | ScanState::Key, _) => ScanState::Key,
                    (ScanState::ValueStart, b' ' | b'\t') => ScanState::ValueStart,
                    (ScanState::ValueStart, b'"' | b'\'' | b'`') => {
                        active_quote = Some(byte);
                        ScanState::Rest
                    }
                    (ScanState::ValueStart | ScanState::Rest, _) => ScanState::Rest,
                };
            }
            idx += 1;
        }

        let text = &self.input[start..idx];
        if idx < bytes.len() && bytes[idx] == b'\n' {
            idx += 1;
        }
        self.offset = idx;
        self.line += newlines;

        Some(Statement { text, line })
    }
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            out.push('\n');
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            continue;
        }
        out.push(ch);
    }

    Cow::Owned(out)
}

fn is_preceded_by_odd_backslashes(bytes: &[u8], idx: usize) -> bool {
    let backslashes = bytes[..idx]
        .iter()
        .rev()
        .take_while(|byte| **byte == b'\\')
        .count();
    backslashes % 2 == 1
}

fn parse_statement(
    line: &str,
    line_num: u32,
    source: Option<&Path>,
    key_parsing_mode: KeyParsingMode,
) -> Result<Option<Entry>, ParseError> {
    let mut working = line.trim_start();
    if working.is_empty() || working.starts_with('#') {
        return Ok(None);
    }

    if let Some(rest) = working.strip_prefix("export")
        && rest.starts_with(char::is_whitespace)
    {
        working = rest.trim_start();
    }

    if working.is_empty() {
        return malformed(line_num, 1, ParseErrorKind::MissingKey, key_parsing_mode);
    }

    let Some(eq_idx) = working.find('=') else {
        let column = working.chars().count() as u32 + 1;
        return malformed(line_num, column, ParseErrorKind::InvalidSyntax, key_parsing_mode);
    };

    let key = working[..eq_idx].trim_end();
    if key.is_empty() {
        return malformed(line_num, 1, ParseErrorKind::MissingKey, key_parsing_mode);
    }
    if !is_valid_key(key, key_parsing_mode) {
        return malformed(line_num, 1, ParseErrorKind::InvalidKey, key_parsing_mode);
    }

    let value_input = working[eq_idx + 1..].trim_start();
    let value_column = (line.len() - value_input.len()) as u32 + 1;
    let value = parse_value(value_input, line_num, value_column)?;

    Ok(Some(Entry {
        key: key.to_owned(),
        value,
        source: source.map(Path::to_path_buf),
        line: line_num,
    }))
}

/// A statement that is not a key/value pair: fatal in strict mode, skipped
/// in permissive mode. Broken values are fatal in both modes.
fn malformed(
    line_num: u32,
    column: u32,
    kind: ParseErrorKind,
    key_parsing_mode: KeyParsingMode,
) -> Result<Option<Entry>, ParseError> {
    match key_parsing_mode {
        KeyParsingMode::Strict => Err(ParseError::new(line_num, column, kind)),
        KeyParsingMode::Permissive => {
            tracing::debug!(line = line_num, reason = %kind, "skipping malformed env line");
            Ok(None)
        }
    }
}

fn parse_value(input: &str, line_num: u32, column: u32) -> Result<String, ParseError> {
    match input.chars().next() {
        None => Ok(String::new()),
        Some(quote @ ('\'' | '`')) => parse_literal_quoted(input, quote, line_num, column),
        Some('"') => parse_double_quoted(input, line_num, column),
        Some(_) => {
            let value = input
                .split_once('#')
                .map(|(head, _)| head)
                .unwrap_or(input)
                .trim_end();
            Ok(value.to_owned())
        }
    }
}

fn parse_literal_quoted(
    input: &str,
    quote: char,
    line_num: u32,
    column: u32,
) -> Result<String, ParseError> {
    let closing_idx = input
        .char_indices()
        .skip(1)
        .find(|(idx, ch)| *ch == quote && !is_preceded_by_odd_backslashes(input.as_bytes(), *idx))
        .map(|(idx, _)| idx);

    let Some(end_idx) = closing_idx else {
        return Err(ParseError::new(
            line_num,
            column,
            ParseErrorKind::UnterminatedQuote,
        ));
    };

    ensure_only_comment_follows(input, end_idx, line_num, column)?;
    Ok(input[1..end_idx].to_owned())
}

fn parse_double_quoted(input: &str, line_num: u32, column: u32) -> Result<String, ParseError> {
    let mut out = String::with_capacity(input.len().saturating_sub(2));
    let mut escaped = false;
    let mut closing_idx = None;

    for (idx, ch) in input.char_indices().skip(1) {
        if escaped {
            out.push(match ch {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            });
            escaped = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '"' => {
                closing_idx = Some(idx);
                break;
            }
            _ => out.push(ch),
        }
    }

    let Some(end_idx) = closing_idx else {
        return Err(ParseError::new(
            line_num,
            column,
            ParseErrorKind::UnterminatedQuote,
        ));
    };

    ensure_only_comment_follows(input, end_idx, line_num, column)?;
    Ok(out)
}

fn ensure_only_comment_follows(
    input: &str,
    end_idx: usize,
    line_num: u32,
    column: u32,
) -> Result<(), ParseError> {
    let tail = input[end_idx + 1..].trim_start();
    if tail.is_empty() || tail.starts_with('#') {
        return Ok(());
    }
    Err(ParseError::new(
        line_num,
        column + end_idx as u32 + 1,
        ParseErrorKind::InvalidSyntax,
    ))
}

fn is_valid_key(key: &str, key_parsing_mode: KeyParsingMode) -> bool {
    match key_parsing_mode {
        KeyParsingMode::Strict => key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')),
        KeyParsingMode::Permissive => key
            .chars()
            .all(|ch| ch.is_ascii_graphic() && ch != '='),
    }
}
