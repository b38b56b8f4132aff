//! Check `.env` files against an annotated `.env.example` template.
//!
//! The example file lists every expected key. Inline comments may carry a
//! type directive:
//!
//! ```text
//! PORT=        # type: number
//! DEBUG=       # type: boolean
//! MODE=        # type: enum(dev, staging, prod)
//! NAME=        # no directive, any non-empty value
//! ```
//!
//! [`Checker::check`] merges the env files (later files win), then reports
//! missing keys, undocumented keys, values that break their directive, and
//! values that look like leaked secrets. Per-key findings never fail the
//! call; only unreadable or malformed inputs and a missing example do.
//!
//! ```no_run
//! let report = env_checker::Checker::new()
//!     .env_paths([".env", ".env.local"])
//!     .example_path(".env.example")
//!     .ignore(["CI"])
//!     .check()?;
//! println!("{report}");
//! # Ok::<(), env_checker::Error>(())
//! ```

mod annotation;
mod check;
mod directive;
mod error;
mod loader;
mod model;
mod parser;
mod report;
mod sensitive;
mod validate;

pub use annotation::{ExampleEntry, ExampleFile, parse_example_str, split_value_and_comment};
pub use check::{Checker, CompareOptions, check, compare};
pub use directive::{TypeDirective, extract_type_token};
pub use error::{Error, ParseError, ParseErrorKind};
pub use loader::{EnvFilePolicy, load_env_files, load_example, load_example_file};
pub use model::{Entry, EnvMap, KeyParsingMode};
pub use parser::{parse_str, parse_str_with_mode};
pub use report::DiagnosticSet;
pub use sensitive::{Heuristic, SensitiveRuleset, scan};
pub use validate::{BooleanMode, Validator, validate};
