//! Derive a command-line interface from a declared parameter signature.
//!
//! A [`Signature`] lists a handler's parameters (positional, optional,
//! variadic, keyword-only) with their annotations and defaults. It is compiled
//! once into clap argument registrations; at run time the parsed values are
//! routed back into positional / variadic / keyword shape, the handler is
//! called, and declared error kinds are mapped to exit codes `3, 4, …`.
//!
//! ```no_run
//! use std::process::ExitCode;
//! use sigcmd::{Command, Parameter, Signature};
//!
//! fn main() -> anyhow::Result<ExitCode> {
//!     let signature = Signature::new(vec![
//!         Parameter::positional("path"),
//!         Parameter::keyword("retries").with_default(3),
//!     ])?;
//!     let command = Command::from_signature("fetch", signature)
//!         .help("path", "What to fetch")
//!         .catch::<std::io::Error>()
//!         .build(|args| {
//!             println!("{:?}", args.positional());
//!             Ok(())
//!         })?;
//!     Ok(ExitCode::from(command.run()?))
//! }
//! ```

pub mod args;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod signature;
pub mod value;

pub use args::{ArgumentSpec, Arity};
pub use command::{Arguments, Command, CommandBuilder, Outcome};
pub use config::{CommandMeta, MetaError};
pub use error::ConfigurationError;
pub use signature::{Annotation, Parameter, ParameterKind, Signature};
pub use value::{Complex, Converter, Value};
