//! Command: a parser bound to a handler and its declared error kinds.
//!
//! Exit codes:
//!
//! | code     | meaning                                   |
//! |----------|-------------------------------------------|
//! | `0`      | handler returned `Ok`, or `--help`        |
//! | `1`      | undeclared error (propagated, not caught) |
//! | `2`      | malformed argv                            |
//! | `3 + n`  | the `n`-th declared error kind            |

use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};

use clap::ArgMatches;

use crate::args::{self, ArgumentSpec, Arity};
use crate::config::CommandMeta;
use crate::error::ConfigurationError;
use crate::signature::Signature;
use crate::value::Value;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
/// Exit code of the first declared error kind.
pub const EXIT_FIRST_DECLARED: u8 = 3;

/// The handler a command dispatches to.
pub type Handler = Box<dyn Fn(&Arguments) -> anyhow::Result<()>>;

/// Parsed values, split back into the shape the handler expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    variadic: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new(positional: Vec<Value>, variadic: Vec<Value>, keywords: Vec<(String, Value)>) -> Self {
        Self {
            positional,
            variadic,
            keywords,
        }
    }

    /// One value per positional parameter, in declaration order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The collected variadic tail (empty when there is none).
    pub fn variadic(&self) -> &[Value] {
        &self.variadic
    }

    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Positional values followed by the variadic tail.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.positional.iter().chain(self.variadic.iter())
    }
}

/// Result of running the handler, when it did not fail unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// The handler failed with the `index`-th declared error kind.
    ExpectedFailure {
        index: usize,
        kind: &'static str,
        message: String,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Succeeded => EXIT_SUCCESS,
            Outcome::ExpectedFailure { index, .. } => declared_exit_code(*index),
        }
    }
}

fn declared_exit_code(index: usize) -> u8 {
    u8::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(EXIT_FIRST_DECLARED))
        .unwrap_or(u8::MAX)
}

/// A declared, recoverable error kind.
#[derive(Clone, Copy)]
struct ErrorKind {
    name: &'static str,
    /// The kind's own message, or `None` when the error is of another kind.
    /// Context added on top of the error is skipped.
    message: fn(&anyhow::Error) -> Option<String>,
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn kind_message<E>(error: &anyhow::Error) -> Option<String>
where
    E: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    error.downcast_ref::<E>().map(ToString::to_string)
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Debug)]
enum Source {
    Signature(Signature),
    Specs(Vec<ArgumentSpec>),
}

/// Builder for a [`Command`].
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    source: Source,
    meta: CommandMeta,
    kinds: Vec<ErrorKind>,
}

impl CommandBuilder {
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.meta.description = Some(text.into());
        self
    }

    pub fn epilog(mut self, text: impl Into<String>) -> Self {
        self.meta.epilog = Some(text.into());
        self
    }

    /// User help for one parameter.
    pub fn help(mut self, parameter: impl Into<String>, text: impl Into<String>) -> Self {
        self.meta.help.insert(parameter.into(), text.into());
        self
    }

    /// Replace all metadata at once.
    pub fn meta(mut self, meta: CommandMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Declare `E` as recoverable. Declaration order fixes the exit code:
    /// the first kind exits with 3, the second with 4, and so on.
    pub fn catch<E>(mut self) -> Self
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.kinds.push(ErrorKind {
            name: short_type_name::<E>(),
            message: kind_message::<E>,
        });
        self
    }

    /// Compile the arguments and bind the handler.
    pub fn build<F>(self, handler: F) -> Result<Command, ConfigurationError>
    where
        F: Fn(&Arguments) -> anyhow::Result<()> + 'static,
    {
        let max = usize::from(u8::MAX - EXIT_FIRST_DECLARED) + 1;
        if self.kinds.len() > max {
            return Err(ConfigurationError::TooManyErrorKinds {
                count: self.kinds.len(),
                max,
            });
        }

        let (specs, routing) = match self.source {
            Source::Signature(signature) => {
                let specs = args::compile(&signature, &self.meta)?;
                let routing = Routing {
                    positional: signature.positional_names(),
                    variadic: signature.variadic_name().map(str::to_string),
                };
                (specs, routing)
            }
            Source::Specs(specs) => {
                let specs = args::apply_help(specs, &self.meta)?;
                let routing = Routing::from_specs(&specs);
                (specs, routing)
            }
        };
        args::validate(&specs)?;

        let parser = args::assemble(&self.name, &specs, &self.meta);
        tracing::debug!(
            command = %self.name,
            arguments = specs.len(),
            error_kinds = self.kinds.len(),
            "built command"
        );

        Ok(Command {
            parser,
            specs,
            routing,
            kinds: self.kinds,
            handler: Box::new(handler),
        })
    }
}

/// Where parsed values go when the handler is called.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Routing {
    positional: Vec<String>,
    variadic: Option<String>,
}

impl Routing {
    fn from_specs(specs: &[ArgumentSpec]) -> Self {
        let positional = specs
            .iter()
            .filter(|s| s.is_positional() && !s.is_variadic())
            .map(|s| s.id.clone())
            .collect();
        let variadic = specs.iter().find(|s| s.is_variadic()).map(|s| s.id.clone());
        Self {
            positional,
            variadic,
        }
    }
}

/// A ready-to-run command line.
pub struct Command {
    parser: clap::Command,
    specs: Vec<ArgumentSpec>,
    routing: Routing,
    kinds: Vec<ErrorKind>,
    handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.parser.get_name())
            .field("specs", &self.specs)
            .field("routing", &self.routing)
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

impl Command {
    /// Derive the command line from a declared signature.
    pub fn from_signature(name: impl Into<String>, signature: Signature) -> CommandBuilder {
        Self::builder(name, Source::Signature(signature))
    }

    /// Use hand-written argument specs.
    ///
    /// Positional specs taking several values form the variadic tail; other
    /// positional specs bind in order; keyword specs become keyword values.
    pub fn from_specs(name: impl Into<String>, specs: Vec<ArgumentSpec>) -> CommandBuilder {
        Self::builder(name, Source::Specs(specs))
    }

    fn builder(name: impl Into<String>, source: Source) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            source,
            meta: CommandMeta::default(),
            kinds: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.parser.get_name()
    }

    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    /// Declared error kinds with their exit codes, in declaration order.
    pub fn exit_codes(&self) -> Vec<(&'static str, u8)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| (kind.name, declared_exit_code(index)))
            .collect()
    }

    /// Rendered `--help` text.
    pub fn render_help(&self) -> String {
        self.parser.clone().render_help().to_string()
    }

    /// Parse argv (program name first) and route the values.
    pub fn parse<I, T>(&self, argv: I) -> Result<Arguments, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.parser.clone().try_get_matches_from(argv)?;
        let arguments = self.route(&matches);
        tracing::trace!(?arguments, "parsed arguments");
        Ok(arguments)
    }

    fn route(&self, matches: &ArgMatches) -> Arguments {
        let mut positional = Vec::with_capacity(self.routing.positional.len());
        let mut variadic = Vec::new();
        let mut keywords = Vec::new();

        for spec in &self.specs {
            let value = extract(matches, spec);
            if self.routing.variadic.as_deref() == Some(spec.id.as_str()) {
                variadic = match value {
                    Value::List(items) => items,
                    Value::None => Vec::new(),
                    other => vec![other],
                };
            } else if self.routing.positional.contains(&spec.id) {
                positional.push(value);
            } else {
                keywords.push((spec.id.clone(), value));
            }
        }

        Arguments::new(positional, variadic, keywords)
    }

    /// Call the handler and classify its result.
    ///
    /// Errors of a declared kind become [`Outcome::ExpectedFailure`]; any
    /// other error is returned unchanged.
    pub fn execute(&self, arguments: &Arguments) -> anyhow::Result<Outcome> {
        let Err(error) = (self.handler)(arguments) else {
            return Ok(Outcome::Succeeded);
        };

        let declared = self
            .kinds
            .iter()
            .enumerate()
            .find_map(|(index, kind)| {
                (kind.message)(&error).map(|message| (index, kind, message))
            });

        match declared {
            Some((index, kind, message)) => {
                tracing::debug!(
                    kind = kind.name,
                    index,
                    "handler failed with a declared error"
                );
                Ok(Outcome::ExpectedFailure {
                    index,
                    kind: kind.name,
                    message,
                })
            }
            None => {
                tracing::debug!(error = %error, "handler failed with an undeclared error");
                Err(error)
            }
        }
    }

    /// Parse, execute and report, returning the process exit code.
    ///
    /// Help goes to `out`; usage errors and declared failures go to `err` as
    /// `"{Kind}: {message}\n"`. Undeclared errors are returned.
    pub fn run_with<I, T>(
        &self,
        argv: I,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> anyhow::Result<u8>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let arguments = match self.parse(argv) {
            Ok(arguments) => arguments,
            Err(parse_error) => {
                let rendered = parse_error.render().to_string();
                if parse_error.use_stderr() {
                    err.write_all(rendered.as_bytes())?;
                } else {
                    out.write_all(rendered.as_bytes())?;
                }
                return Ok(u8::try_from(parse_error.exit_code()).unwrap_or(EXIT_USAGE));
            }
        };

        let outcome = self.execute(&arguments)?;
        if let Outcome::ExpectedFailure { kind, message, .. } = &outcome {
            writeln!(err, "{kind}: {message}")?;
        }
        Ok(outcome.exit_code())
    }

    /// Run against the process argv, stdout and stderr.
    pub fn run(&self) -> anyhow::Result<u8> {
        self.run_with(std::env::args_os(), &mut io::stdout(), &mut io::stderr())
    }
}

fn extract(matches: &ArgMatches, spec: &ArgumentSpec) -> Value {
    let absent = || spec.default.clone().unwrap_or(Value::None);
    match spec.arity {
        Arity::Flag => Value::Bool(matches.get_flag(&spec.id)),
        Arity::ZeroOrMore | Arity::OneOrMore => match matches.get_many::<Value>(&spec.id) {
            Some(values) => Value::List(values.cloned().collect()),
            None if spec.arity == Arity::ZeroOrMore && spec.default.is_none() => {
                Value::List(Vec::new())
            }
            None => absent(),
        },
        Arity::ExactlyOne | Arity::ZeroOrOne => matches
            .get_one::<Value>(&spec.id)
            .cloned()
            .unwrap_or_else(absent),
    }
}
