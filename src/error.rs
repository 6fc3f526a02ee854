//! Build-time errors: a parameter shape the command line cannot express.

use thiserror::Error;

/// Raised while turning a signature or a list of specs into a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Parameter name '{name}' is not an identifier")]
    InvalidName { name: String },

    #[error("Parameter '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("Only one variadic parameter is allowed, found '{first}' and '{second}'")]
    MultipleVariadic { first: String, second: String },

    #[error("Parameter '{name}' cannot follow '{previous}'")]
    OutOfOrder { name: String, previous: String },

    #[error("Variadic parameter '{name}' cannot have a default")]
    VariadicDefault { name: String },

    #[error("Variadic parameter '{name}' cannot take a list annotation")]
    ListOnVariadic { name: String },

    #[error("Parameter '{name}' has a list default but no list annotation")]
    UntypedListDefault { name: String },

    #[error("Positional parameter '{name}' cannot default to false")]
    PositionalFlag { name: String },

    #[error("Help text given for unknown parameter '{name}'")]
    UnknownHelpTarget { name: String },

    #[error("Short option '-{short}' is used by both '{first}' and '{second}'")]
    DuplicateShort {
        short: char,
        first: String,
        second: String,
    },

    #[error("Too many error kinds declared: {count} (at most {max})")]
    TooManyErrorKinds { count: usize, max: usize },
}
