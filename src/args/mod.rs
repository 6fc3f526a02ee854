//! Argument spec compiler.
//!
//! Turns a declared signature into clap registrations:
//!
//! ```text
//! Signature → Descriptors → ArgumentSpecs → Validate → Assemble → clap::Command
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently.

mod annotation;
mod assembler;
mod help;
mod pipeline;
mod registry;
mod spec;

pub use annotation::{direct_converter, hint, is_list, list_element};
pub use assembler::{ParserAssembler, HELP_ID, KEYWORD_HEADING, POSITIONAL_HEADING};
pub use help::HelpText;
pub use pipeline::{apply_help, assemble, compile, validate};
pub use registry::{word_initials, ShortOptionRegistry, HELP_SHORT};
pub use spec::{build_spec, long_name, ArgumentSpec, Arity};
