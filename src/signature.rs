//! Parameter descriptors: the declared shape of a handler's inputs.
//!
//! A [`Signature`] plays the role reflection plays elsewhere: the integrator
//! lists the parameters once, and everything downstream (argument specs,
//! routing of parsed values) is derived from it.

use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::value::{Converter, Value};

/// Parameter kind, derived from shape and the presence of a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Positional without default.
    PositionalRequired,
    /// Positional with default.
    PositionalOptional,
    /// Catch-all trailing positional.
    VariadicPositional,
    /// Keyword-only without default.
    KeywordRequired,
    /// Keyword-only with default.
    KeywordOptional,
}

impl ParameterKind {
    pub fn is_keyword(self) -> bool {
        matches!(self, Self::KeywordRequired | Self::KeywordOptional)
    }

    /// Declaration rank; a parameter may never follow one of higher rank.
    fn rank(self) -> u8 {
        match self {
            Self::PositionalRequired => 0,
            Self::PositionalOptional => 1,
            Self::VariadicPositional => 2,
            Self::KeywordRequired | Self::KeywordOptional => 3,
        }
    }
}

/// What a parameter's annotation says about its values.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Values are converted with this converter.
    Converter(Converter),
    /// One or more values, each converted with the element converter.
    List(Converter),
    /// Free text shown in help; no effect on conversion.
    Hint(String),
}

impl Annotation {
    pub fn list(element: Converter) -> Self {
        Self::List(element)
    }

    pub fn hint(text: impl Into<String>) -> Self {
        Self::Hint(text.into())
    }
}

impl From<Converter> for Annotation {
    fn from(converter: Converter) -> Self {
        Self::Converter(converter)
    }
}

impl From<&str> for Annotation {
    fn from(text: &str) -> Self {
        Self::Hint(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Positional,
    Variadic,
    Keyword,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    shape: Shape,
    annotation: Option<Annotation>,
    default: Option<Value>,
}

impl Parameter {
    fn with_shape(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            annotation: None,
            default: None,
        }
    }

    /// A positional parameter; required unless given a default.
    pub fn positional(name: impl Into<String>) -> Self {
        Self::with_shape(name, Shape::Positional)
    }

    /// The catch-all trailing positional parameter.
    pub fn variadic(name: impl Into<String>) -> Self {
        Self::with_shape(name, Shape::Variadic)
    }

    /// A keyword-only parameter; required unless given a default.
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::with_shape(name, Shape::Keyword)
    }

    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn kind(&self) -> ParameterKind {
        match (self.shape, self.default.is_some()) {
            (Shape::Positional, false) => ParameterKind::PositionalRequired,
            (Shape::Positional, true) => ParameterKind::PositionalOptional,
            (Shape::Variadic, _) => ParameterKind::VariadicPositional,
            (Shape::Keyword, false) => ParameterKind::KeywordRequired,
            (Shape::Keyword, true) => ParameterKind::KeywordOptional,
        }
    }
}

/// An ordered, validated parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Validate the declared parameters, preserving their order.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        let mut variadic: Option<&str> = None;
        let mut previous: Option<&Parameter> = None;

        for param in &parameters {
            if !is_identifier(&param.name) {
                return Err(ConfigurationError::InvalidName {
                    name: param.name.clone(),
                });
            }
            if !seen.insert(param.name.as_str()) {
                return Err(ConfigurationError::DuplicateName {
                    name: param.name.clone(),
                });
            }

            if param.shape == Shape::Variadic {
                if param.default.is_some() {
                    return Err(ConfigurationError::VariadicDefault {
                        name: param.name.clone(),
                    });
                }
                if let Some(first) = variadic {
                    return Err(ConfigurationError::MultipleVariadic {
                        first: first.to_string(),
                        second: param.name.clone(),
                    });
                }
                variadic = Some(&param.name);
            }

            if let Some(prev) = previous {
                if param.kind().rank() < prev.kind().rank() {
                    return Err(ConfigurationError::OutOfOrder {
                        name: param.name.clone(),
                        previous: prev.name.clone(),
                    });
                }
            }
            previous = Some(param);
        }

        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of positional (non-variadic) parameters, in declaration order.
    pub fn positional_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.shape == Shape::Positional)
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn variadic_name(&self) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.shape == Shape::Variadic)
            .map(|p| p.name.as_str())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
