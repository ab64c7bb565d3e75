use monkey::interpreter::{parse, Parser};
use monkey::{Lexer, Program, TokenKind};

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "parse errors for {:?}: {:?}", source, errors);
    program
}

/// Parses, prints, and parses the printed form again; both trees must be equal.
fn assert_round_trip(source: &str) {
    let program = parse_ok(source);
    let printed = program.to_string();
    let reparsed = parse_ok(&printed);
    assert_eq!(program, reparsed, "printed form was {:?}", printed);
    assert_eq!(printed, reparsed.to_string());
}

#[test]
fn test_round_trip_statements() {
    assert_round_trip("let x = 5; let y = x; return y;");
    assert_round_trip("let x = 5\nx\ny");
    assert_round_trip("a; b; c");
}

#[test]
fn test_round_trip_expressions() {
    assert_round_trip("-a * b + !c");
    assert_round_trip("a + b * c + d / e - f == 3 < 4");
    assert_round_trip("add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))");
    assert_round_trip("a * [1, 2, 3, 4][b * c] * d");
    assert_round_trip(r#"{"one": 1, true: [2, 3], 4: {"nested": fn(x) { x }}}"#);
    assert_round_trip(r#""spaces and symbols !=""#);
}

#[test]
fn test_round_trip_functions_and_conditionals() {
    assert_round_trip(
        "let fib = fn(n) { if (n < 2) { return n; } fib(n - 1) + fib(n - 2) }; fib(10)",
    );
    assert_round_trip("if (x) { } else { let y = 1; y }");
    assert_round_trip("fn() { }()");
    assert_round_trip("let newAdder = fn(x) { fn(y) { x + y } }; newAdder(1)(2)");
}

#[test]
fn test_canonical_form() {
    assert_eq!(
        parse_ok("let add = fn(a, b) { return a + b; };").to_string(),
        "let add = fn(a, b) { return (a + b); };"
    );
    assert_eq!(parse_ok("if (a) { b } else { c }").to_string(), "if (a) { b } else { c }");
    assert_eq!(parse_ok("x[1][2]").to_string(), "((x[1])[2])");
}

#[test]
fn test_parser_api_with_explicit_lexer() {
    let mut parser = Parser::new(Lexer::new("let a = 1; a"));
    let program = parser.parse_program();
    assert!(parser.errors().is_empty());
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_lexer_pull_api() {
    let mut lexer = Lexer::new("let five = 5;");
    let kinds: Vec<TokenKind> = std::iter::from_fn(|| {
        let token = lexer.next_token();
        (!token.is(TokenKind::Eof)).then_some(token.kind)
    })
    .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Int,
            TokenKind::Semicolon
        ]
    );
}
