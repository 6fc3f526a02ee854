//! Help text composer: all fragments of one argument's help in one place.

use crate::value::{Converter, Value};

/// Builder for a per-argument help string.
///
/// Fragments render in a fixed order, joined with `". "`:
/// converter name, `Default: …`, annotation hint, user-supplied help.
#[derive(Debug, Clone, Default)]
pub struct HelpText {
    converter: Option<&'static str>,
    default: Option<String>,
    hint: Option<String>,
    user: Option<String>,
}

impl HelpText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the converter applied to each value.
    pub fn with_converter(mut self, converter: Option<Converter>) -> Self {
        self.converter = converter.map(|c| c.name());
        self
    }

    /// `false` and `None` defaults are never stated; every other default is,
    /// including zero and the empty string.
    pub fn with_default(mut self, default: Option<&Value>) -> Self {
        self.default = default
            .filter(|v| !v.is_false() && !v.is_none())
            .map(|v| format!("Default: {v}"));
        self
    }

    /// Free-text annotation hint.
    pub fn with_hint(mut self, hint: Option<&str>) -> Self {
        self.hint = hint.map(str::to_string);
        self
    }

    /// Text supplied by the integrator for this parameter.
    pub fn with_user(mut self, user: Option<&str>) -> Self {
        self.user = user.map(str::to_string);
        self
    }

    pub fn build(self) -> String {
        [
            self.converter.map(str::to_string),
            self.default,
            self.hint,
            self.user,
        ]
        .into_iter()
        .flatten()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
    }
}
