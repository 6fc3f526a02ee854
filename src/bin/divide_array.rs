//! Divides a list of integers by a common divisor.
//!
//! Hand-written argument specs: `num` takes one or more integers and
//! `--divide/-d` defaults to 1. Dividing by zero exits with code 3.

use std::process::ExitCode;

use anyhow::Context;
use sigcmd::{ArgumentSpec, Arguments, Arity, Command, Converter, Value};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("division by zero")]
struct ZeroDivisionError;

fn main() -> anyhow::Result<ExitCode> {
    sigcmd::logging::init_tracing();

    let command = Command::from_specs(
        "divide_array",
        vec![
            ArgumentSpec::positional("num")
                .with_arity(Arity::OneOrMore)
                .with_converter(Converter::INT)
                .with_help("int list"),
            ArgumentSpec::keyword("divide")
                .with_short('d')
                .with_default(1)
                .with_converter(Converter::INT),
        ],
    )
    .catch::<ZeroDivisionError>()
    .build(divide)?;

    Ok(ExitCode::from(command.run()?))
}

fn divide(args: &Arguments) -> anyhow::Result<()> {
    let divisor = args
        .keyword("divide")
        .and_then(Value::as_int)
        .context("--divide must be an integer")?;
    if divisor == 0 {
        return Err(ZeroDivisionError.into());
    }

    let quotients = args
        .variadic()
        .iter()
        .map(|n| n.as_int().map(|n| Value::Float(n as f64 / divisor as f64)))
        .collect::<Option<Vec<_>>>()
        .context("num must be integers")?;

    println!("{}", Value::List(quotients));
    Ok(())
}
