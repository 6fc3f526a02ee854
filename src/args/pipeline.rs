//! Pipeline: ties the spec-building stages together.

use std::collections::{HashMap, HashSet};

use crate::args::assembler::{ParserAssembler, HELP_ID};
use crate::args::help::HelpText;
use crate::args::registry::{ShortOptionRegistry, HELP_SHORT};
use crate::args::spec::{build_spec, ArgumentSpec, Arity};
use crate::config::CommandMeta;
use crate::error::ConfigurationError;
use crate::signature::Signature;

/// Compile a signature into one argument spec per parameter, in order.
///
/// The short option registry lives only for the duration of this call.
pub fn compile(
    signature: &Signature,
    meta: &CommandMeta,
) -> Result<Vec<ArgumentSpec>, ConfigurationError> {
    check_help_targets(meta, |name| signature.get(name).is_some())?;

    let mut shorts = ShortOptionRegistry::new();
    signature
        .parameters()
        .iter()
        .map(|param| {
            let spec = build_spec(param, meta.help_for(param.name()), &mut shorts)?;
            tracing::debug!(
                parameter = %spec.id,
                arity = ?spec.arity,
                short = ?spec.short,
                converter = spec.converter.map(|c| c.name()),
                "compiled argument spec"
            );
            Ok(spec)
        })
        .collect()
}

/// Merge metadata help into hand-written specs.
///
/// Metadata text is appended after whatever help the spec already carries.
pub fn apply_help(
    specs: Vec<ArgumentSpec>,
    meta: &CommandMeta,
) -> Result<Vec<ArgumentSpec>, ConfigurationError> {
    check_help_targets(meta, |name| specs.iter().any(|s| s.id == name))?;

    Ok(specs
        .into_iter()
        .map(|mut spec| {
            if let Some(text) = meta.help_for(&spec.id) {
                spec.help = HelpText::new()
                    .with_hint(Some(spec.help.as_str()))
                    .with_user(Some(text))
                    .build();
            }
            spec
        })
        .collect())
}

/// Structural checks the underlying parser would otherwise reject at runtime.
pub fn validate(specs: &[ArgumentSpec]) -> Result<(), ConfigurationError> {
    let mut ids = HashSet::from([HELP_ID]);
    let mut shorts: HashMap<char, &str> = HashMap::from([(HELP_SHORT, HELP_ID)]);
    let mut longs = HashSet::from([HELP_ID]);
    let mut variadic: Option<&ArgumentSpec> = None;
    let mut previous: Option<&ArgumentSpec> = None;

    for spec in specs {
        if !ids.insert(spec.id.as_str()) {
            return Err(ConfigurationError::DuplicateName {
                name: spec.id.clone(),
            });
        }
        if let Some(long) = &spec.long {
            if !longs.insert(long.as_str()) {
                return Err(ConfigurationError::DuplicateName {
                    name: spec.id.clone(),
                });
            }
        }
        if let Some(short) = spec.short {
            if let Some(first) = shorts.insert(short, spec.id.as_str()) {
                return Err(ConfigurationError::DuplicateShort {
                    short,
                    first: first.to_string(),
                    second: spec.id.clone(),
                });
            }
        }

        if !spec.is_positional() {
            continue;
        }
        if spec.arity == Arity::Flag {
            return Err(ConfigurationError::PositionalFlag {
                name: spec.id.clone(),
            });
        }
        if spec.is_variadic() {
            if let Some(first) = variadic {
                return Err(ConfigurationError::MultipleVariadic {
                    first: first.id.clone(),
                    second: spec.id.clone(),
                });
            }
        }
        if let Some(prev) = previous {
            // Only the last positional may take several values, and a
            // required positional may not follow an optional one.
            if prev.arity.is_multiple() || (spec.is_required() && !prev.is_required()) {
                return Err(ConfigurationError::OutOfOrder {
                    name: spec.id.clone(),
                    previous: prev.id.clone(),
                });
            }
        }
        if spec.is_variadic() {
            variadic = Some(spec);
        }
        previous = Some(spec);
    }

    Ok(())
}

/// Assemble the parser for validated specs.
pub fn assemble(name: &str, specs: &[ArgumentSpec], meta: &CommandMeta) -> clap::Command {
    specs
        .iter()
        .fold(
            ParserAssembler::new(name)
                .with_description(meta.description.as_deref())
                .with_epilog(meta.epilog.as_deref()),
            |assembler, spec| assembler.with_argument(spec),
        )
        .build()
}

fn check_help_targets(
    meta: &CommandMeta,
    exists: impl Fn(&str) -> bool,
) -> Result<(), ConfigurationError> {
    match meta.help.keys().find(|name| !exists(name.as_str())) {
        Some(name) => Err(ConfigurationError::UnknownHelpTarget { name: name.clone() }),
        None => Ok(()),
    }
}
