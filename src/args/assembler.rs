//! Parser assembler: registers argument specs with clap.

use clap::{Arg, ArgAction, ColorChoice};

use crate::args::registry::HELP_SHORT;
use crate::args::spec::{ArgumentSpec, Arity};
use crate::value::Converter;

/// Section header for positional arguments.
pub const POSITIONAL_HEADING: &str = "positional arguments";
/// Section header for keyword arguments, in place of clap's "Options".
pub const KEYWORD_HEADING: &str = "keyword arguments";
/// Id of the built-in help flag.
pub const HELP_ID: &str = "help";
/// Help line of the built-in help flag.
pub const HELP_TEXT: &str = "show this help message and exit";

const TERM_WIDTH: usize = 80;

/// Builder for the clap command backing one derived CLI.
///
/// Arguments are displayed in registration order. The help flag is inserted
/// just before the first keyword argument, opening the keyword section.
#[derive(Debug, Clone)]
pub struct ParserAssembler {
    command: clap::Command,
    registered: usize,
    help_added: bool,
}

impl ParserAssembler {
    pub fn new(name: &str) -> Self {
        let command = clap::Command::new(name.to_string())
            .bin_name(name.to_string())
            .disable_help_flag(true)
            .args_override_self(true)
            .color(ColorChoice::Never)
            .term_width(TERM_WIDTH);
        Self {
            command,
            registered: 0,
            help_added: false,
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        if let Some(text) = description {
            self.command = self.command.about(text.to_string());
        }
        self
    }

    pub fn with_epilog(mut self, epilog: Option<&str>) -> Self {
        if let Some(text) = epilog {
            self.command = self.command.after_help(text.to_string());
        }
        self
    }

    /// Register one spec. Positionals bind in the order they are added.
    pub fn with_argument(mut self, spec: &ArgumentSpec) -> Self {
        if !spec.is_positional() {
            self = self.with_help_flag();
        }
        let arg = to_clap_arg(spec).display_order(self.registered);
        self.command = self.command.arg(arg);
        self.registered += 1;
        self
    }

    fn with_help_flag(mut self) -> Self {
        if self.help_added {
            return self;
        }
        let arg = Arg::new(HELP_ID)
            .short(HELP_SHORT)
            .long(HELP_ID)
            .action(ArgAction::Help)
            .help(HELP_TEXT)
            .help_heading(KEYWORD_HEADING)
            .display_order(self.registered);
        self.command = self.command.arg(arg);
        self.registered += 1;
        self.help_added = true;
        self
    }

    /// Build the final parser.
    pub fn build(self) -> clap::Command {
        self.with_help_flag().command
    }
}

fn to_clap_arg(spec: &ArgumentSpec) -> Arg {
    let mut arg = Arg::new(spec.id.clone())
        .help(spec.help.clone())
        .required(spec.is_required());

    arg = match &spec.long {
        None => arg
            .value_name(spec.id.clone())
            .help_heading(POSITIONAL_HEADING),
        Some(long) => {
            let arg = arg
                .long(long.clone())
                .value_name(spec.id.to_uppercase())
                .help_heading(KEYWORD_HEADING);
            match spec.short {
                Some(short) => arg.short(short),
                None => arg,
            }
        }
    };

    if spec.arity == Arity::Flag {
        return arg.action(ArgAction::SetTrue);
    }

    let converter = spec.converter.unwrap_or(Converter::STR);
    let arg = arg
        .allow_negative_numbers(true)
        .value_parser(move |raw: &str| converter.convert(raw));

    match (spec.arity, spec.is_positional()) {
        (Arity::ZeroOrMore | Arity::OneOrMore, true) => {
            arg.num_args(1..).action(ArgAction::Append)
        }
        (Arity::ZeroOrMore, false) => arg.num_args(0..).action(ArgAction::Set),
        (Arity::OneOrMore, false) => arg.num_args(1..).action(ArgAction::Set),
        (Arity::ZeroOrOne, false) => arg.num_args(0..=1).action(ArgAction::Set),
        _ => arg.num_args(1).action(ArgAction::Set),
    }
}
