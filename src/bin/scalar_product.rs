//! Computes `a + (lcoord|rcoord)/b` for two complex vectors.
//!
//! The command line is derived from a signature:
//!
//! ```text
//! a: float, b = 1.0, *lcoord: complex, rcoord: list[complex],
//! name = "result", polar: "Return in polar form" = false
//! ```
//!
//! Mismatched vector lengths exit with 3, `b == 0` with 4. A NaN `a` is
//! deliberately left undeclared and exits with 1.

use std::process::ExitCode;

use anyhow::{bail, Context};
use sigcmd::{
    Annotation, Arguments, Command, CommandMeta, Complex, Converter, Parameter, Signature, Value,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Vectors should have the same dimension")]
struct DimensionMismatchError;

#[derive(Debug, Error)]
#[error("complex division by zero")]
struct ZeroDivisionError;

fn main() -> anyhow::Result<ExitCode> {
    sigcmd::logging::init_tracing();

    let signature = Signature::new(vec![
        Parameter::positional("a").annotated(Converter::FLOAT),
        Parameter::positional("b").with_default(1.0),
        Parameter::variadic("lcoord").annotated(Converter::COMPLEX),
        Parameter::keyword("rcoord").annotated(Annotation::list(Converter::COMPLEX)),
        Parameter::keyword("name").with_default("result"),
        Parameter::keyword("polar")
            .annotated("Return in polar form")
            .with_default(false),
    ])?;
    let meta = CommandMeta::from_toml_str(include_str!("scalar_product.toml"))?;

    let command = Command::from_signature("scalar_product", signature)
        .meta(meta)
        .catch::<DimensionMismatchError>()
        .catch::<ZeroDivisionError>()
        .build(scalar_product)?;

    Ok(ExitCode::from(command.run()?))
}

fn complexes(values: &[Value]) -> Option<Vec<Complex>> {
    values.iter().map(Value::as_complex).collect()
}

fn scalar_product(args: &Arguments) -> anyhow::Result<()> {
    let a = args.get(0).and_then(Value::as_float).context("a must be a float")?;
    let b = args.get(1).and_then(Value::as_float).context("b must be a float")?;
    let lcoord = complexes(args.variadic()).context("lcoord must be complex")?;
    let rcoord = args
        .keyword("rcoord")
        .and_then(Value::as_list)
        .and_then(complexes)
        .context("rcoord must be complex")?;
    let name = args.keyword("name").map(Value::to_string).unwrap_or_default();
    let polar = args.keyword("polar").and_then(Value::as_bool).unwrap_or(false);

    if lcoord.len() != rcoord.len() {
        return Err(DimensionMismatchError.into());
    }
    if a.is_nan() {
        bail!("cannot offset by NaN");
    }
    if b == 0.0 {
        return Err(ZeroDivisionError.into());
    }

    let dot = lcoord
        .iter()
        .zip(&rcoord)
        .fold(Complex::default(), |acc, (x, y)| acc + *x * y.conj());
    let result = Complex::from(a) + dot / b;
    let out = if polar {
        format!(
            "({}, {})",
            Value::Float(result.norm()),
            Value::Float(result.arg())
        )
    } else {
        result.to_string()
    };

    let list = |zs: Vec<Complex>| Value::List(zs.into_iter().map(Value::Complex).collect());
    println!(
        "{name} = {} + {}x{}/{} = {out}",
        Value::Float(a),
        list(lcoord),
        list(rcoord),
        Value::Float(b)
    );
    Ok(())
}
