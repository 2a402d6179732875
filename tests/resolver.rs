mod common;

use rox::ast::{Expr, ExprId, Stmt};
use rox::error::Diagnostics;
use rox::interpreter::Interpreter;
use rox::parser::Parser;
use rox::resolver::Resolver;
use rox::scanner::scan_tokens;

use common::{output_of, static_errors_of};

/// Every `Variable`, `This` and `Super` reference in source order.
fn references(statements: &[Stmt]) -> Vec<(String, ExprId)> {
    fn walk_expr(expr: &Expr, out: &mut Vec<(String, ExprId)>) {
        match expr {
            Expr::Variable { id, name } => out.push((name.lexeme.clone(), *id)),
            Expr::This { id, .. } => out.push(("this".to_string(), *id)),
            Expr::Super { id, .. } => out.push(("super".to_string(), *id)),
            Expr::Assign { value, .. } => walk_expr(value, out),
            Expr::Grouping(inner) | Expr::Unary { right: inner, .. } => walk_expr(inner, out),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                walk_expr(left, out);
                walk_expr(right, out);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                walk_expr(callee, out);
                arguments.iter().for_each(|a| walk_expr(a, out));
            }
            Expr::Get { object, .. } => walk_expr(object, out),
            Expr::Set { object, value, .. } => {
                walk_expr(object, out);
                walk_expr(value, out);
            }
            Expr::Literal(_) => {}
        }
    }

    fn walk_stmt(stmt: &Stmt, out: &mut Vec<(String, ExprId)>) {
        match stmt {
            Stmt::Expression(e) | Stmt::Print(e) => walk_expr(e, out),
            Stmt::Var {
                initializer: Some(e),
                ..
            } => walk_expr(e, out),
            Stmt::Return { value: Some(e), .. } => walk_expr(e, out),
            Stmt::Block(body) => body.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::Function(decl) => decl.body.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::Class {
                superclass,
                methods,
                ..
            } => {
                if let Some(e) = superclass {
                    walk_expr(e, out);
                }
                methods
                    .iter()
                    .flat_map(|m| m.body.iter())
                    .for_each(|s| walk_stmt(s, out));
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                walk_expr(condition, out);
                walk_stmt(then_branch, out);
                if let Some(e) = else_branch {
                    walk_stmt(e, out);
                }
            }
            Stmt::While { condition, body } => {
                walk_expr(condition, out);
                walk_stmt(body, out);
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    statements.iter().for_each(|s| walk_stmt(s, &mut out));
    out
}

/// Resolve `source` and report the depth of each reference, in source order.
fn depths(source: &str) -> Vec<(String, Option<usize>)> {
    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(source, &mut diagnostics);
    let statements = Parser::new(tokens).parse(&mut diagnostics);

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
    assert!(!diagnostics.has_errors(), "{}", diagnostics);

    references(&statements)
        .into_iter()
        .map(|(name, id)| (name, interpreter.resolved_depth(id)))
        .collect()
}

#[test]
fn distance_counts_enclosing_scopes() {
    assert_eq!(
        depths("{ var a = 1; { { print a; } } }"),
        vec![("a".to_string(), Some(2))]
    );
}

#[test]
fn unresolved_references_are_globals() {
    assert_eq!(
        depths("var g = 1; { print g; print clock; }"),
        vec![("g".to_string(), None), ("clock".to_string(), None)]
    );
}

#[test]
fn parameters_share_the_function_body_scope() {
    assert_eq!(
        depths("fun f(x) { print x; { print x; } }"),
        vec![("x".to_string(), Some(0)), ("x".to_string(), Some(1))]
    );
}

#[test]
fn nearest_declaration_wins() {
    assert_eq!(
        depths("{ var a = 1; { var a = 2; print a; } print a; }"),
        vec![("a".to_string(), Some(0)), ("a".to_string(), Some(0))]
    );
}

#[test]
fn this_and_super_live_in_synthetic_scopes() {
    assert_eq!(
        depths("class A { m() { return this; } }"),
        vec![("this".to_string(), Some(1))]
    );

    assert_eq!(
        depths("class A {} class B < A { m() { return super.m; } }"),
        vec![("A".to_string(), None), ("super".to_string(), Some(2))]
    );
}

#[test]
fn redeclaration_in_one_scope_is_an_error() {
    assert_eq!(
        static_errors_of("{ var a = 1; var a = 2; }"),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn globals_may_be_redeclared() {
    assert_eq!(output_of("var a = 1; var a = 2; print a;"), vec!["2"]);
}

#[test]
fn reading_a_local_in_its_own_initializer_is_an_error() {
    assert_eq!(
        static_errors_of("var a = 1; { var a = a; }"),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn return_outside_a_function_is_an_error() {
    assert_eq!(
        static_errors_of("return 1;"),
        vec!["[line 1] Error at 'return': Can't return from top-level code."]
    );
}

#[test]
fn initializer_may_not_return_a_value() {
    assert_eq!(
        static_errors_of("class A { init() { return 1; } }"),
        vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
    );

    assert!(common::run("class A { init() { return; } }").0.is_success());
}

#[test]
fn this_outside_a_class_is_an_error() {
    assert_eq!(
        static_errors_of("print this;"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
    assert_eq!(
        static_errors_of("fun f() { return this; }"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );
}

#[test]
fn misplaced_super_is_an_error() {
    assert_eq!(
        static_errors_of("super.x;"),
        vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
    );
    assert_eq!(
        static_errors_of("class A { m() { super.m(); } }"),
        vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );
}

#[test]
fn class_cannot_inherit_from_itself() {
    assert_eq!(
        static_errors_of("class A < A {}"),
        vec!["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn every_resolve_error_is_reported() {
    assert_eq!(
        static_errors_of("return 1;\nprint this;\n{ var x; var x; }"),
        vec![
            "[line 1] Error at 'return': Can't return from top-level code.",
            "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            "[line 3] Error at 'x': Already a variable with this name in this scope.",
        ]
    );
}
