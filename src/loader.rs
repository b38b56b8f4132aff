use std::io::ErrorKind;
use std::path::Path;

use crate::annotation::{ExampleFile, parse_example_str};
use crate::error::Error;
use crate::model::{EnvMap, KeyParsingMode};
use crate::parser::parse_str_with_source;

/// What to do with an env file that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvFilePolicy {
    /// Skip it; overlays such as `.env.local` are optional.
    #[default]
    SkipMissing,
    /// Fail the whole check.
    RequireAll,
}

/// Load and merge env files in order; later files override earlier ones.
pub fn load_env_files<I, P>(
    paths: I,
    policy: EnvFilePolicy,
    key_parsing_mode: KeyParsingMode,
) -> Result<EnvMap, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut merged = EnvMap::new();

    for path in paths {
        let path = path.as_ref();
        let Some(content) = read_text(path)? else {
            if policy == EnvFilePolicy::RequireAll {
                return Err(Error::EnvFileNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "skipping missing env file");
            continue;
        };

        let parsed = parse_str_with_source(&content, Some(path), key_parsing_mode)?;
        tracing::debug!(path = %path.display(), entries = parsed.len(), "loaded env file");
        merged.merge(parsed.into_entries());
    }

    Ok(merged)
}

/// Read the example file; its absence is always fatal.
pub fn load_example_file(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    read_text(path)?.ok_or_else(|| Error::ExampleNotFound(path.to_path_buf()))
}

/// Read and parse the example file.
pub fn load_example(path: impl AsRef<Path>) -> Result<ExampleFile, Error> {
    let content = load_example_file(&path)?;
    let example = parse_example_str(&content);
    tracing::debug!(path = %path.as_ref().display(), keys = example.len(), "loaded example file");
    Ok(example)
}

/// `Ok(None)` when the file does not exist.
fn read_text(path: &Path) -> Result<Option<String>, Error> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    String::from_utf8(bytes)
        .map(Some)
        .map_err(|err| Error::InvalidEncoding {
            path: path.to_path_buf(),
            source: err.utf8_error(),
        })
}
