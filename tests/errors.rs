mod common;

use common::{parse_errors, run, run_error, run_with_output};
use monkey::diagnostic::render_diagnostics;
use monkey::interpreter::{parse_and_run, parse_and_run_with_diagnostics, Environment};
use monkey::Object;

// ============================================================================
// Runtime errors
// ============================================================================

#[test]
fn test_type_mismatch() {
    assert_eq!(run_error("5 + true;"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(run_error("5 + true; 5;"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(run_error(r#""a" + 1"#), "type mismatch: STRING + INTEGER");
    assert_eq!(run_error("1 == true"), "type mismatch: INTEGER == BOOLEAN");
    assert_eq!(run_error(r#"[1] == "a""#), "type mismatch: ARRAY == STRING");
}

#[test]
fn test_unknown_operator() {
    assert_eq!(run_error("-true"), "unknown operator: -BOOLEAN");
    assert_eq!(run_error(r#"-"a""#), "unknown operator: -STRING");
    assert_eq!(run_error("true + false;"), "unknown operator: BOOLEAN + BOOLEAN");
    assert_eq!(run_error("5; true + false; 5"), "unknown operator: BOOLEAN + BOOLEAN");
    assert_eq!(run_error(r#""Hello" - "World""#), "unknown operator: STRING - STRING");
    assert_eq!(run_error("true < false"), "unknown operator: BOOLEAN < BOOLEAN");
    assert_eq!(run_error("[1] == [1]"), "unknown operator: ARRAY == ARRAY");
}

#[test]
fn test_errors_propagate_out_of_blocks() {
    assert_eq!(
        run_error("if (10 > 1) { true + false; }"),
        "unknown operator: BOOLEAN + BOOLEAN"
    );
    let source = "
        if (10 > 1) {
            if (10 > 1) {
                return true + false;
            }
            return 1;
        }
    ";
    assert_eq!(run_error(source), "unknown operator: BOOLEAN + BOOLEAN");
}

#[test]
fn test_identifier_not_found() {
    assert_eq!(run_error("foobar"), "identifier not found: foobar");
    assert_eq!(run_error("let f = fn() { missing }; f()"), "identifier not found: missing");
}

#[test]
fn test_division_by_zero() {
    assert_eq!(run_error("1 / 0"), "division by zero");
    assert_eq!(run_error("let zero = 1 - 1; 10 / zero"), "division by zero");
}

#[test]
fn test_errors_short_circuit_arguments() {
    let (result, output) = run_with_output(r#"let f = fn(a, b) { a }; f(missing, puts("b"))"#);
    assert_eq!(result.to_string(), "ERROR: identifier not found: missing");
    assert_eq!(output, "");
}

#[test]
fn test_errors_short_circuit_array_elements() {
    let (result, output) = run_with_output(r#"[puts("a"), 1 + true, puts("c")]"#);
    assert!(result.is_error());
    assert_eq!(output, "a\n");
}

#[test]
fn test_error_inside_called_function_reaches_top() {
    assert_eq!(
        run_error("let f = fn() { len(1) }; let x = f(); 5"),
        "argument to `len` not supported, got INTEGER"
    );
}

#[test]
fn test_error_display() {
    assert_eq!(run("-true").to_string(), "ERROR: unknown operator: -BOOLEAN");
}

// ============================================================================
// Parse errors
// ============================================================================

#[test]
fn test_parse_error_messages() {
    assert_eq!(parse_errors("let x 5;"), vec!["expected next token to be =, got INT instead"]);
    assert_eq!(parse_errors("let = 10;"), vec!["expected next token to be IDENT, got = instead"]);
    assert_eq!(parse_errors("let 838383;"), vec!["expected next token to be IDENT, got INT instead"]);
    assert_eq!(parse_errors("if (x { x }")[0], "expected next token to be ), got { instead");
    assert_eq!(parse_errors("fn(x, 1) { x }")[0], "expected next token to be IDENT, got INT instead");
    assert_eq!(parse_errors("{\"a\" 1}")[0], "expected next token to be :, got INT instead");
}

#[test]
fn test_multiple_parse_errors_are_collected() {
    let errors = parse_errors("let x 5; let = 10; let 838383;");
    assert_eq!(
        errors,
        vec![
            "expected next token to be =, got INT instead",
            "expected next token to be IDENT, got = instead",
            "expected next token to be IDENT, got INT instead",
        ]
    );
}

#[test]
fn test_missing_prefix() {
    assert_eq!(parse_errors("+ 1"), vec!["no prefix parse function for + found"]);
    assert_eq!(parse_errors("}"), vec!["no prefix parse function for } found"]);
}

#[test]
fn test_illegal_characters() {
    assert_eq!(parse_errors("let a = 1 # 2;"), vec!["illegal token \"#\""]);
    assert_eq!(parse_errors("\"open"), vec!["illegal token \"\"open\""]);
}

#[test]
fn test_parse_errors_prevent_evaluation() {
    let env = Environment::new();
    let errors = parse_and_run("let a = 1; let b = ;", &env).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(env.get("a"), None);
}

#[test]
fn test_parse_and_run_returns_values() {
    let env = Environment::new();
    assert_eq!(parse_and_run("let a = 2;", &env), Ok(Object::Null));
    assert_eq!(parse_and_run("a * 21", &env), Ok(Object::Integer(42)));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_parse_diagnostics_point_at_source() {
    let source = "let x = 1;\nlet y = ;";
    let diagnostics = parse_and_run_with_diagnostics(source, &Environment::new()).unwrap_err();
    let rendered = render_diagnostics(source, "script.mk", &diagnostics, false);
    assert!(rendered.contains("error[E0102]: no prefix parse function for ; found"));
    assert!(rendered.contains("--> script.mk:2:9"));
    assert!(rendered.contains("2 | let y = ;"));
    assert!(rendered.ends_with("error: aborting due to 1 error\n"));
}

#[test]
fn test_unterminated_string_has_hint() {
    let diagnostics =
        parse_and_run_with_diagnostics("puts(\"hi)", &Environment::new()).unwrap_err();
    assert_eq!(diagnostics[0].code.as_deref(), Some("E0104"));
    assert!(diagnostics[0].notes[0].contains("closed"));
}

#[test]
fn test_runtime_diagnostics() {
    let diagnostics =
        parse_and_run_with_diagnostics("let h = {}; h[[1]]", &Environment::new()).unwrap_err();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "unusable as hash key: ARRAY");
    assert_eq!(diagnostics[0].code.as_deref(), Some("E0206"));
}
