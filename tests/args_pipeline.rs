//! Integration tests for the signature → parser → dispatch pipeline.

use std::io::Write;

use sigcmd::args::{compile, KEYWORD_HEADING, POSITIONAL_HEADING};
use sigcmd::{
    Annotation, ArgumentSpec, Arguments, Arity, Command, CommandMeta, ConfigurationError,
    Converter, MetaError, Outcome, Parameter, Signature, Value,
};
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
#[error("Vectors should have the same dimension")]
struct DimensionMismatchError;

#[derive(Debug, thiserror::Error)]
#[error("division by zero")]
struct ZeroDivisionError;

fn mixed_signature() -> Signature {
    Signature::new(vec![
        Parameter::positional("a").annotated(Converter::FLOAT),
        Parameter::positional("b").with_default(1.0),
        Parameter::variadic("v").annotated(Converter::COMPLEX),
        Parameter::keyword("w").annotated(Annotation::list(Converter::COMPLEX)),
        Parameter::keyword("name").with_default("result"),
        Parameter::keyword("polar")
            .annotated("text")
            .with_default(false),
    ])
    .unwrap()
}

fn dimension_check(args: &Arguments) -> anyhow::Result<()> {
    let w = args.keyword("w").and_then(Value::as_list).unwrap_or_default();
    if args.variadic().len() != w.len() {
        return Err(DimensionMismatchError.into());
    }
    if args.get(1).and_then(Value::as_float) == Some(0.0) {
        return Err(ZeroDivisionError.into());
    }
    Ok(())
}

fn mixed_command() -> Command {
    Command::from_signature("mixed", mixed_signature())
        .description("Mixed signature")
        .epilog("The end")
        .catch::<DimensionMismatchError>()
        .catch::<ZeroDivisionError>()
        .build(dimension_check)
        .unwrap()
}

fn run(command: &Command, argv: &[&str]) -> (u8, String, String) {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = command
        .run_with(argv.iter().copied(), &mut out, &mut err)
        .unwrap();
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

// =============================================================================
// BUILD
// =============================================================================

#[test]
fn building_twice_is_identical() {
    let first = mixed_command();
    let second = mixed_command();

    assert_eq!(first.render_help(), second.render_help());
    assert_eq!(first.specs(), second.specs());
    assert_eq!(first.exit_codes(), second.exit_codes());
    assert_eq!(
        first.exit_codes(),
        vec![("DimensionMismatchError", 3), ("ZeroDivisionError", 4)]
    );
}

#[test]
fn help_uses_keyword_heading() {
    let help = mixed_command().render_help();

    let positional = help.find(&format!("{POSITIONAL_HEADING}:")).unwrap();
    let keyword = help.find(&format!("{KEYWORD_HEADING}:")).unwrap();
    assert!(positional < keyword);
    assert!(!help.contains("Options:"));
    assert!(help.contains("Mixed signature"));
    assert!(help.contains("The end"));
    assert!(help.contains("float. Default: 1.0"));
    assert!(help.contains("-w, --w <W>..."));
    assert!(help.contains("-n, --name <NAME>"));
    assert!(help.contains("-p, --polar"));
}

#[test]
fn list_annotation_on_variadic_is_rejected() {
    let signature = Signature::new(vec![
        Parameter::variadic("v").annotated(Annotation::list(Converter::INT))
    ])
    .unwrap();

    let err = Command::from_signature("bad", signature)
        .build(|_| Ok(()))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::ListOnVariadic { name: "v".into() }
    );
}

#[test]
fn help_for_unknown_parameter_is_rejected() {
    let err = Command::from_signature("bad", mixed_signature())
        .help("nope", "??")
        .build(|_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::UnknownHelpTarget { name } if name == "nope"));
}

// =============================================================================
// PARSE
// =============================================================================

#[test]
fn false_default_becomes_value_less_flag() {
    let command = mixed_command();

    let off = command.parse(["mixed", "1", "--w", "2"]).unwrap();
    assert_eq!(off.keyword("polar"), Some(&Value::Bool(false)));

    let on = command.parse(["mixed", "1", "--w", "2", "-p"]).unwrap();
    assert_eq!(on.keyword("polar"), Some(&Value::Bool(true)));

    // A flag never consumes a value.
    let err = command
        .parse(["mixed", "1", "--w", "2", "--polar=yes"])
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn list_keyword_accepts_one_or_more() {
    let command = mixed_command();

    for n in 1..=4 {
        let mut argv = vec!["mixed".to_string(), "1".to_string(), "-w".to_string()];
        argv.extend((0..n).map(|i| i.to_string()));
        let parsed = command.parse(&argv).unwrap();
        assert_eq!(parsed.keyword("w").and_then(Value::as_list).map(<[_]>::len), Some(n));
    }

    let err = command.parse(["mixed", "1", "-w"]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn keyword_names_round_trip() {
    let signature = Signature::new(vec![
        Parameter::keyword("max_width").with_default(80),
        Parameter::keyword("dry_run").with_default(false),
    ])
    .unwrap();
    let command = Command::from_signature("t", signature)
        .build(|_| Ok(()))
        .unwrap();

    let parsed = command
        .parse(["t", "--max-width", "120", "--dry-run"])
        .unwrap();
    assert_eq!(
        parsed.keywords(),
        &[
            ("max_width".to_string(), Value::Int(120)),
            ("dry_run".to_string(), Value::Bool(true)),
        ]
    );
    assert!(parsed.positional().is_empty());
}

#[test]
fn repeated_option_last_wins() {
    let command = mixed_command();
    let parsed = command
        .parse(["mixed", "1", "-w", "1", "--name", "x", "--name", "y"])
        .unwrap();
    assert_eq!(parsed.keyword("name"), Some(&Value::from("y")));
}

// =============================================================================
// DISPATCH
// =============================================================================

#[test]
fn exit_codes_follow_declaration_order() {
    let command = mixed_command();

    assert_eq!(run(&command, &["mixed", "1", "2", "3", "-w", "4"]).0, 0);

    let (code, out, err) = run(&command, &["mixed", "1", "2", "-w", "4"]);
    assert_eq!(code, 3);
    assert_eq!(out, "");
    assert_eq!(err, "DimensionMismatchError: Vectors should have the same dimension\n");

    let (code, _, err) = run(&command, &["mixed", "1", "0", "3", "-w", "4"]);
    assert_eq!(code, 4);
    assert_eq!(err, "ZeroDivisionError: division by zero\n");

    let (code, out, err) = run(&command, &["mixed"]);
    assert_eq!(code, 2);
    assert_eq!(out, "");
    assert!(err.contains("<a>"));

    let (code, out, err) = run(&command, &["mixed", "-h"]);
    assert_eq!(code, 0);
    assert!(out.contains("keyword arguments:"));
    assert_eq!(err, "");
}

#[test]
fn undeclared_errors_are_not_caught() {
    let command = Command::from_signature("t", Signature::new(vec![]).unwrap())
        .catch::<ZeroDivisionError>()
        .build(|_| Err(std::io::Error::other("disk on fire").into()))
        .unwrap();

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let error = command.run_with(["t"], &mut out, &mut err).unwrap_err();
    assert!(error.is::<std::io::Error>());
    assert!(out.is_empty() && err.is_empty());
}

#[test]
fn matching_is_by_exact_type() {
    #[derive(Debug, thiserror::Error)]
    #[error("wrapped: {0}")]
    struct Wrapper(#[source] ZeroDivisionError);

    let command = Command::from_signature("t", Signature::new(vec![]).unwrap())
        .catch::<ZeroDivisionError>()
        .build(|_| Err(Wrapper(ZeroDivisionError).into()))
        .unwrap();

    let err = command.execute(&Arguments::default()).unwrap_err();
    assert!(err.is::<Wrapper>());
}

#[test]
fn declared_message_ignores_added_context() {
    use anyhow::Context;

    let command = Command::from_signature("t", Signature::new(vec![]).unwrap())
        .catch::<ZeroDivisionError>()
        .build(|_| Err(ZeroDivisionError).context("while dividing item 2"))
        .unwrap();

    let (code, out, err) = run(&command, &["t"]);
    assert_eq!(code, 3);
    assert_eq!(out, "");
    assert_eq!(err, "ZeroDivisionError: division by zero\n");
}

// =============================================================================
// MANUAL SPECS
// =============================================================================

fn divide_command() -> Command {
    Command::from_specs(
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
    .build(|args| {
        let divisor = args.keyword("divide").and_then(Value::as_int).unwrap_or(1);
        if divisor == 0 {
            return Err(ZeroDivisionError.into());
        }
        Ok(())
    })
    .unwrap()
}

#[test]
fn manual_specs_route_multi_valued_positional_as_variadic() {
    let parsed = divide_command().parse(["divide_array", "5", "7"]).unwrap();

    assert!(parsed.positional().is_empty());
    assert_eq!(parsed.variadic(), &[Value::Int(5), Value::Int(7)]);
    assert_eq!(parsed.keyword("divide"), Some(&Value::Int(1)));
}

#[test]
fn manual_specs_dispatch() {
    let command = divide_command();

    let outcome = command
        .execute(&command.parse(["divide_array", "2", "-d", "0"]).unwrap())
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::ExpectedFailure {
            index: 0,
            kind: "ZeroDivisionError",
            message: "division by zero".into()
        }
    );

    let (code, _, err) = run(&command, &["divide_array"]);
    assert_eq!(code, 2);
    assert!(err.contains("<num>"));
}

// =============================================================================
// METADATA
// =============================================================================

#[test]
fn metadata_file_supplies_help() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "description = \"From a file\"\n[help]\nname = \"Give this name to the result\""
    )
    .unwrap();

    let meta = CommandMeta::load(&path).unwrap();
    let specs = compile(&mixed_signature(), &meta).unwrap();
    let name = specs.iter().find(|s| s.id == "name").unwrap();
    assert_eq!(name.help, "str. Default: result. Give this name to the result");

    let command = Command::from_signature("mixed", mixed_signature())
        .meta(meta)
        .build(|_| Ok(()))
        .unwrap();
    assert!(command.render_help().contains("From a file"));
}

#[test]
fn missing_metadata_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = CommandMeta::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, MetaError::ReadError { .. }));
}
