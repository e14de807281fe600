//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs:
//! - Let and return statements
//! - Literal, prefix and infix expressions
//! - Operator precedence and associativity
//! - If expressions and function literals
//! - Diagnostics and recovery from syntax errors

use crate::{
    ast::ast::{Expr, Node, Program, Stmt},
    lexer::lexer::Lexer,
};

use super::parser::{parse, Parser, MAX_NESTING_DEPTH};

fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source.to_string(), Some("test.mk".to_string()));
    let messages: Vec<String> = errors.iter().map(|error| error.to_string()).collect();
    assert!(messages.is_empty(), "parser errors for {:?}: {:?}", source, messages);

    program
}

fn parse_errors(source: &str) -> (Program, Vec<String>) {
    let (program, errors) = parse(source.to_string(), Some("test.mk".to_string()));
    (program, errors.iter().map(|error| error.to_string()).collect())
}

fn single_expression(program: &Program) -> &Expr {
    assert_eq!(program.len(), 1, "expected one statement in {}", program);
    match &program.statements[0] {
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn assert_identifier(expr: &Expr, name: &str) {
    match expr {
        Expr::Identifier(ident) => {
            assert_eq!(ident.value, name);
            assert_eq!(ident.token_literal(), name);
        }
        other => panic!("expected identifier {}, got {:?}", name, other),
    }
}

fn assert_integer(expr: &Expr, value: i64) {
    match expr {
        Expr::Integer(integer) => {
            assert_eq!(integer.value, value);
            assert_eq!(integer.token_literal(), value.to_string());
        }
        other => panic!("expected integer {}, got {:?}", value, other),
    }
}

fn assert_infix<'a>(expr: &'a Expr, operator: &str) -> (&'a Expr, &'a Expr) {
    match expr {
        Expr::Infix(infix) => {
            assert_eq!(infix.operator, operator);
            (infix.left.as_ref(), infix.right.as_ref())
        }
        other => panic!("expected infix {}, got {:?}", operator, other),
    }
}

#[test]
fn test_parse_let_statements() {
    let program = parse_ok("let x = 5;\nlet y = 10;\nlet foobar = 838383;");

    assert_eq!(program.len(), 3);
    let expected = [("x", 5), ("y", 10), ("foobar", 838383)];

    for (stmt, (name, value)) in program.iter().zip(expected) {
        match stmt {
            Stmt::Let(let_stmt) => {
                assert_eq!(let_stmt.token_literal(), "let");
                assert_eq!(let_stmt.name.value, name);
                assert_eq!(let_stmt.name.token_literal(), name);
                assert_integer(&let_stmt.value, value);
            }
            other => panic!("expected let statement, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_let_with_expression_values() {
    let program = parse_ok("let y = true; let foobar = y; let z = 1 + 2 * 3;");

    assert_eq!(program.to_string(), "let y = true;let foobar = y;let z = (1 + (2 * 3));");
}

#[test]
fn test_parse_return_statements() {
    let program = parse_ok("return 5;\nreturn 10;\nreturn add;");

    assert_eq!(program.len(), 3);
    for stmt in program.iter() {
        match stmt {
            Stmt::Return(return_stmt) => assert_eq!(return_stmt.token_literal(), "return"),
            other => panic!("expected return statement, got {:?}", other),
        }
    }
    assert_eq!(program.to_string(), "return 5;return 10;return add;");
}

#[test]
fn test_semicolons_are_optional() {
    let program = parse_ok("let x = 5 let y = x return y");

    assert_eq!(program.len(), 3);
    assert_eq!(program.to_string(), "let x = 5;let y = x;return y;");
}

#[test]
fn test_parse_identifier_expression() {
    let program = parse_ok("foobar;");
    assert_identifier(single_expression(&program), "foobar");
}

#[test]
fn test_parse_integer_expression() {
    let program = parse_ok("5;");
    assert_integer(single_expression(&program), 5);
}

#[test]
fn test_parse_max_integer() {
    let program = parse_ok("9223372036854775807");
    assert_integer(single_expression(&program), i64::MAX);
}

#[test]
fn test_parse_boolean_expressions() {
    for (source, expected) in [("true;", true), ("false;", false)] {
        let program = parse_ok(source);
        match single_expression(&program) {
            Expr::Boolean(boolean) => assert_eq!(boolean.value, expected),
            other => panic!("expected boolean, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_prefix_expressions() {
    let cases = [("!5;", "!", "5"), ("-15;", "-", "15"), ("!true;", "!", "true")];

    for (source, operator, right) in cases {
        let program = parse_ok(source);
        match single_expression(&program) {
            Expr::Prefix(prefix) => {
                assert_eq!(prefix.operator, operator);
                assert_eq!(prefix.right.to_string(), right);
            }
            other => panic!("expected prefix expression, got {:?}", other),
        }
    }
}

#[test]
fn test_parse_infix_expressions() {
    let operators = ["+", "-", "*", "/", ">", "<", "==", "!="];

    for operator in operators {
        let program = parse_ok(&format!("5 {} 6;", operator));
        let (left, right) = assert_infix(single_expression(&program), operator);
        assert_integer(left, 5);
        assert_integer(right, 6);
    }

    let program = parse_ok("true != false");
    assert_eq!(program.to_string(), "(true != false)");
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("a + b", "(a + b)"),
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b * c", "(a + (b * c))"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true", "true"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("3 < 5 == true", "((3 < 5) == true)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a - -b", "(a - (-b))"),
        ("a == b == c", "((a == b) == c)"),
    ];

    for (source, expected) in cases {
        assert_eq!(parse_ok(source).to_string(), expected, "source: {}", source);
    }
}

#[test]
fn test_parse_if_expression() {
    let program = parse_ok("if (x < y) { x }");

    match single_expression(&program) {
        Expr::If(if_expr) => {
            let (left, right) = assert_infix(&if_expr.condition, "<");
            assert_identifier(left, "x");
            assert_identifier(right, "y");

            assert_eq!(if_expr.consequence.body.len(), 1);
            match &if_expr.consequence.body[0] {
                Stmt::Expression(stmt) => assert_identifier(&stmt.expression, "x"),
                other => panic!("expected expression statement, got {:?}", other),
            }
            assert!(if_expr.alternative.is_none());
        }
        other => panic!("expected if expression, got {:?}", other),
    }
}

#[test]
fn test_parse_if_else_expression() {
    let program = parse_ok("if (x < y) { x } else { y }");

    match single_expression(&program) {
        Expr::If(if_expr) => {
            assert_infix(&if_expr.condition, "<");
            assert_eq!(if_expr.consequence.body.len(), 1);

            let alternative = if_expr.alternative.as_ref().expect("alternative block");
            assert_eq!(alternative.body.len(), 1);
            match &alternative.body[0] {
                Stmt::Expression(stmt) => assert_identifier(&stmt.expression, "y"),
                other => panic!("expected expression statement, got {:?}", other),
            }
        }
        other => panic!("expected if expression, got {:?}", other),
    }
    assert_eq!(program.to_string(), "if(x < y) xelse y");
}

#[test]
fn test_parse_nested_blocks() {
    let program = parse_ok("if (a) { if (b) { return 1; } else { let c = 2; c } }");

    assert_eq!(program.to_string(), "ifa ifb return 1;else let c = 2;c");
}

#[test]
fn test_unclosed_block_stops_at_eof() {
    let program = parse_ok("if (x) { y");

    match single_expression(&program) {
        Expr::If(if_expr) => assert_eq!(if_expr.consequence.body.len(), 1),
        other => panic!("expected if expression, got {:?}", other),
    }
}

#[test]
fn test_parse_function_literal() {
    let program = parse_ok("fn(x, y) { x + y; }");

    match single_expression(&program) {
        Expr::Function(function) => {
            let names: Vec<&str> = function
                .parameters
                .iter()
                .map(|param| param.value.as_str())
                .collect();
            assert_eq!(names, vec!["x", "y"]);

            assert_eq!(function.body.body.len(), 1);
            match &function.body.body[0] {
                Stmt::Expression(stmt) => {
                    let (left, right) = assert_infix(&stmt.expression, "+");
                    assert_identifier(left, "x");
                    assert_identifier(right, "y");
                }
                other => panic!("expected expression statement, got {:?}", other),
            }
        }
        other => panic!("expected function literal, got {:?}", other),
    }
    assert_eq!(program.to_string(), "fn(x, y) (x + y)");
}

#[test]
fn test_parse_function_parameters() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn() {};", &[]),
        ("fn(x) {};", &["x"]),
        ("fn(x, y, z) {};", &["x", "y", "z"]),
    ];

    for (source, expected) in cases {
        let program = parse_ok(source);
        match single_expression(&program) {
            Expr::Function(function) => {
                let names: Vec<&str> = function
                    .parameters
                    .iter()
                    .map(|param| param.value.as_str())
                    .collect();
                assert_eq!(names, expected.to_vec());
            }
            other => panic!("expected function literal, got {:?}", other),
        }
    }
}

#[test]
fn test_let_bound_function() {
    let program = parse_ok("let add = fn(a, b) { return a + b; };");

    assert_eq!(program.len(), 1);
    assert_eq!(program.to_string(), "let add = fn(a, b) return (a + b);;");
}

#[test]
fn test_parse_empty_program() {
    let program = parse_ok("");
    assert!(program.is_empty());
}

#[test]
fn test_let_missing_identifier() {
    let (program, errors) = parse_errors("let = 5;");

    assert_eq!(errors, vec!["expected next token to be IDENT, got = instead"]);
    assert!(program.is_empty());
}

#[test]
fn test_let_missing_assign() {
    let (_, errors) = parse_errors("let x 5;");

    assert_eq!(errors, vec!["expected next token to be =, got INT instead"]);
}

#[test]
fn test_recovery_keeps_following_statements() {
    let (program, errors) = parse_errors("let x = 5; let = 10; let y = 15;");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let x = 5;let y = 15;");
}

#[test]
fn test_errors_accumulate_in_order() {
    let (_, errors) = parse_errors("let = 1; ) let x 2;");

    assert_eq!(
        errors,
        vec![
            "expected next token to be IDENT, got = instead",
            "no prefix parse function for ) found",
            "expected next token to be =, got INT instead",
        ]
    );
}

#[test]
fn test_no_prefix_parse_function() {
    let (program, errors) = parse_errors("}; 5");

    assert_eq!(errors, vec!["no prefix parse function for } found"]);
    assert_eq!(program.to_string(), "5");
}

#[test]
fn test_illegal_token_in_expression() {
    let (_, errors) = parse_errors("let x = @;");

    assert_eq!(errors, vec!["no prefix parse function for ILLEGAL found"]);
}

#[test]
fn test_integer_overflow() {
    let (program, errors) = parse_errors("9223372036854775808");

    assert_eq!(
        errors,
        vec!["could not parse \"9223372036854775808\" as integer"]
    );
    assert!(program.is_empty());
}

#[test]
fn test_missing_closing_paren() {
    let (_, errors) = parse_errors("(1 + 2");

    assert_eq!(errors, vec!["expected next token to be ), got EOF instead"]);
}

#[test]
fn test_bad_function_parameter() {
    let (_, errors) = parse_errors("fn(x, 1) { x }");

    assert_eq!(errors[0], "expected next token to be IDENT, got INT instead");
}

#[test]
fn test_if_requires_parenthesised_condition() {
    let (_, errors) = parse_errors("if x { 1 }");

    assert_eq!(errors[0], "expected next token to be (, got IDENT instead");
}

#[test]
fn test_else_requires_block() {
    let (_, errors) = parse_errors("if (x) { 1 } else 2");

    assert_eq!(errors, vec!["expected next token to be {, got INT instead"]);
}

#[test]
fn test_recovery_inside_block() {
    let (program, errors) = parse_errors("if (x) { let = 1; y } else { z }");

    assert_eq!(errors, vec!["expected next token to be IDENT, got = instead"]);
    assert_eq!(program.len(), 1);
    assert_eq!(program.to_string(), "ifx yelse z");
}

#[test]
fn test_error_inside_block_does_not_eat_closing_brace() {
    let (program, errors) = parse_errors("fn() { 1 + } ; 7");

    assert_eq!(errors, vec!["no prefix parse function for } found"]);
    assert_eq!(program.to_string(), "fn() 7");
}

#[test]
fn test_error_position() {
    let (_, errors) = parse("let = 5;".to_string(), Some("pos.mk".to_string()));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_position().0, 4);
    assert_eq!(errors[0].get_position().1.as_str(), "pos.mk");
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parser_api() {
    let lexer = Lexer::new("let a = 1; )".to_string(), None);
    let mut parser = Parser::new(lexer);

    assert_eq!(parser.current_token().value, "let");
    assert_eq!(parser.peek_token().value, "a");

    let program = parser.parse_program();

    assert_eq!(program.len(), 1);
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].to_string(),
        "no prefix parse function for ) found"
    );
}

#[test]
fn test_error_skips_nested_braces() {
    let (program, errors) = parse_errors("if (x) { (a { b } c } 7");

    assert_eq!(errors, vec!["expected next token to be ), got { instead"]);
    assert_eq!(program.len(), 2);
    assert_eq!(program.to_string(), "ifx 7");
}

#[test]
fn test_nesting_within_limit() {
    let depth = MAX_NESTING_DEPTH - 1;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(parse_ok(&source).to_string(), "1");
}

fn nesting_error() -> String {
    format!(
        "expression nesting exceeds maximum depth of {}",
        MAX_NESTING_DEPTH
    )
}

#[test]
fn test_nesting_too_deep() {
    let depth = MAX_NESTING_DEPTH * 4;
    let source = format!("-{}1{}; 2", "(".repeat(depth), ")".repeat(depth));
    let (program, errors) = parse_errors(&source);

    assert_eq!(errors, vec![nesting_error()]);
    assert_eq!(program.to_string(), "2");
}

#[test]
fn test_deeply_nested_if_blocks() {
    let (program, errors) = parse_errors(&"if (x) { ".repeat(1024));

    assert_eq!(errors, vec![nesting_error()]);
    assert_eq!(program.len(), 1);
}

#[test]
fn test_deeply_nested_function_literals() {
    let (program, errors) = parse_errors(&"fn() { ".repeat(254));

    assert_eq!(errors, vec![nesting_error()]);
    assert_eq!(program.len(), 1);
}

#[test]
fn test_deep_nesting_recovers_at_closing_brace() {
    let depth = MAX_NESTING_DEPTH * 2;
    let source = format!("{}{}; 7", "if (x) { ".repeat(depth), "}".repeat(depth));
    let (program, errors) = parse_errors(&source);

    assert_eq!(errors, vec![nesting_error()]);
    assert_eq!(program.len(), 2);
    assert!(program.to_string().ends_with("7"));
}
