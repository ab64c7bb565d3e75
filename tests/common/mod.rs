#![allow(dead_code)]

use monkey::interpreter::{parse, Environment, Evaluator};
use monkey::Object;

/// Parses and evaluates `source` in a fresh environment, discarding `puts` output.
pub fn run(source: &str) -> Object {
    run_with_output(source).0
}

/// Parses and evaluates `source`, returning the result and everything `puts` wrote.
pub fn run_with_output(source: &str) -> (Object, String) {
    let (program, errors) = parse(source);
    assert!(
        errors.is_empty(),
        "unexpected parse errors for {:?}: {:?}",
        source,
        errors
    );
    let mut evaluator = Evaluator::new(Vec::new());
    let result = evaluator.eval_program(&program, &Environment::new());
    let output = String::from_utf8(evaluator.into_output()).expect("output is valid UTF-8");
    (result, output)
}

/// Evaluates `source` and returns the message of the runtime error it must produce.
pub fn run_error(source: &str) -> String {
    match run(source) {
        Object::Error(err) => err.to_string(),
        other => panic!("expected an error from {:?}, got {}", source, other),
    }
}

/// Collects the parse error messages for `source`.
pub fn parse_errors(source: &str) -> Vec<String> {
    parse(source).1.into_iter().map(|e| e.message).collect()
}

pub fn int(value: i64) -> Object {
    Object::Integer(value)
}

pub fn boolean(value: bool) -> Object {
    Object::Boolean(value)
}

pub fn string(value: &str) -> Object {
    Object::string(value)
}

pub fn array(elements: Vec<Object>) -> Object {
    Object::array(elements)
}
