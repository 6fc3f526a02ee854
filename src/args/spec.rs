//! Argument specs: one parser registration record per parameter.

use crate::args::annotation;
use crate::args::help::HelpText;
use crate::args::registry::ShortOptionRegistry;
use crate::error::ConfigurationError;
use crate::signature::{Parameter, ParameterKind};
use crate::value::{Converter, Value};

/// How many argv tokens one argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    ExactlyOne,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    /// Boolean flag, no value; presence sets `true`.
    Flag,
}

impl Arity {
    /// Collects a list of values rather than a single one.
    pub fn is_multiple(self) -> bool {
        matches!(self, Self::ZeroOrMore | Self::OneOrMore)
    }
}

/// A single argument registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Parameter name; parsed values are routed back under it.
    pub id: String,
    /// Long form without dashes (e.g., "max-width"). `None` for positionals.
    pub long: Option<String>,
    /// Optional short form (e.g., 'm').
    pub short: Option<char>,
    pub arity: Arity,
    /// `None` means the raw string is kept.
    pub converter: Option<Converter>,
    /// Only meaningful for keyword arguments; positionals express it via arity.
    pub required: bool,
    /// Value bound when the argument is absent.
    pub default: Option<Value>,
    pub help: String,
}

impl ArgumentSpec {
    /// A positional argument taking exactly one value.
    pub fn positional(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            long: None,
            short: None,
            arity: Arity::ExactlyOne,
            converter: None,
            required: false,
            default: None,
            help: String::new(),
        }
    }

    /// An optional keyword argument taking exactly one value.
    pub fn keyword(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            long: Some(long_name(&id)),
            ..Self::positional(id)
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn is_positional(&self) -> bool {
        self.long.is_none()
    }

    /// A positional collecting the variadic tail.
    pub fn is_variadic(&self) -> bool {
        self.is_positional() && self.arity.is_multiple()
    }

    /// Whether the parser must see this argument.
    pub fn is_required(&self) -> bool {
        if self.is_positional() {
            matches!(self.arity, Arity::ExactlyOne | Arity::OneOrMore)
        } else {
            self.required
        }
    }

    /// Command-line spellings: `["name"]` or `["--long-name", "-l"]`.
    pub fn flags(&self) -> Vec<String> {
        match &self.long {
            None => vec![self.id.clone()],
            Some(long) => {
                let mut flags = vec![format!("--{long}")];
                if let Some(short) = self.short {
                    flags.push(format!("-{short}"));
                }
                flags
            }
        }
    }
}

/// Long option name: underscores become hyphens.
pub fn long_name(id: &str) -> String {
    id.replace('_', "-")
}

/// Build the argument spec for one parameter.
///
/// Keyword parameters claim a short alias from `shorts`.
pub fn build_spec(
    param: &Parameter,
    user_help: Option<&str>,
    shorts: &mut ShortOptionRegistry,
) -> Result<ArgumentSpec, ConfigurationError> {
    let kind = param.kind();
    let name = param.name();
    let ann = param.annotation();
    let default = param.default_value();

    if kind == ParameterKind::VariadicPositional && ann.is_some_and(annotation::is_list) {
        return Err(ConfigurationError::ListOnVariadic {
            name: name.to_string(),
        });
    }

    let element = ann.and_then(annotation::list_element);
    if matches!(default, Some(Value::List(_))) && element.is_none() {
        return Err(ConfigurationError::UntypedListDefault {
            name: name.to_string(),
        });
    }

    let is_flag = default.is_some_and(Value::is_false);
    if is_flag && !kind.is_keyword() {
        return Err(ConfigurationError::PositionalFlag {
            name: name.to_string(),
        });
    }

    let mut spec = if kind.is_keyword() {
        let spec = ArgumentSpec::keyword(name).required(kind == ParameterKind::KeywordRequired);
        match shorts.allocate(name) {
            Some(short) => spec.with_short(short),
            None => spec,
        }
    } else {
        ArgumentSpec::positional(name)
    };

    let hint = ann.and_then(annotation::hint);

    if is_flag {
        spec.arity = Arity::Flag;
        spec.default = Some(Value::Bool(false));
        spec.help = HelpText::new()
            .with_hint(hint)
            .with_user(user_help)
            .build();
        return Ok(spec);
    }

    spec.arity = if element.is_some() {
        Arity::OneOrMore
    } else {
        match kind {
            ParameterKind::VariadicPositional => Arity::ZeroOrMore,
            ParameterKind::PositionalOptional => Arity::ZeroOrOne,
            ParameterKind::PositionalRequired
            | ParameterKind::KeywordRequired
            | ParameterKind::KeywordOptional => Arity::ExactlyOne,
        }
    };

    spec.converter = element
        .or_else(|| ann.and_then(annotation::direct_converter))
        .or_else(|| default.and_then(Converter::for_default));
    spec.default = default.cloned();
    // A one-or-more positional must be given, so its default never applies.
    let shown_default = if element.is_some() && !kind.is_keyword() {
        None
    } else {
        default
    };
    spec.help = HelpText::new()
        .with_converter(spec.converter)
        .with_default(shown_default)
        .with_hint(hint)
        .with_user(user_help)
        .build();

    Ok(spec)
}
