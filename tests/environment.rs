use std::cell::RefCell;
use std::rc::Rc;

use rox::environment::{ancestor, assign_at, get_at, lookup_at, EnvRef, Environment};
use rox::token::{Token, TokenType};
use rox::value::Value;

fn ident(name: &str) -> Token {
    Token::new(TokenType::IDENTIFIER, name, 7)
}

fn root() -> EnvRef {
    Rc::new(RefCell::new(Environment::new()))
}

#[test]
fn get_walks_outward_to_the_defining_frame() {
    let globals = root();
    globals.borrow_mut().define("a", Value::Number(1.0));

    let inner = Environment::child_of(&Environment::child_of(&globals));

    assert_eq!(inner.borrow().get(&ident("a")).ok(), Some(Value::Number(1.0)));
}

#[test]
fn define_shadows_and_redefines() {
    let globals = root();
    globals.borrow_mut().define("a", Value::Number(1.0));
    globals.borrow_mut().define("a", Value::Bool(true));

    let inner = Environment::child_of(&globals);
    inner.borrow_mut().define("a", Value::Nil);

    assert_eq!(inner.borrow().get(&ident("a")).ok(), Some(Value::Nil));
    assert_eq!(globals.borrow().get(&ident("a")).ok(), Some(Value::Bool(true)));
}

#[test]
fn assign_updates_the_nearest_existing_binding() {
    let globals = root();
    globals.borrow_mut().define("a", Value::Number(1.0));
    let inner = Environment::child_of(&globals);

    inner
        .borrow_mut()
        .assign(&ident("a"), Value::Number(2.0))
        .expect("a is bound in globals");

    assert_eq!(globals.borrow().get(&ident("a")).ok(), Some(Value::Number(2.0)));
}

#[test]
fn undefined_names_are_runtime_errors() {
    let inner = Environment::child_of(&root());

    let read = inner.borrow().get(&ident("missing"));
    assert_eq!(
        read.map_err(|e| e.to_string()),
        Err("Undefined variable 'missing'.\n[line 7]".to_string())
    );

    let write = inner.borrow_mut().assign(&ident("missing"), Value::Nil);
    assert!(write.is_err());
}

#[test]
fn resolved_access_agrees_with_walking() {
    let globals = root();
    let middle = Environment::child_of(&globals);
    middle.borrow_mut().define("x", Value::String("middle".into()));
    let inner = Environment::child_of(&middle);
    let innermost = Environment::child_of(&inner);

    let walked = innermost.borrow().get(&ident("x")).ok();
    let resolved = get_at(&innermost, 2, &ident("x")).ok();

    assert_eq!(walked, resolved);
    assert_eq!(resolved, Some(Value::String("middle".into())));
}

#[test]
fn resolved_access_does_not_walk_past_its_distance() {
    let globals = root();
    globals.borrow_mut().define("x", Value::Number(1.0));
    let inner = Environment::child_of(&globals);

    assert_eq!(lookup_at(&inner, 0, "x"), None);
    assert!(get_at(&inner, 0, &ident("x")).is_err());
    assert!(ancestor(&inner, 2).is_none());
}

#[test]
fn assign_at_writes_the_exact_frame() {
    let globals = root();
    globals.borrow_mut().define("x", Value::Number(1.0));
    let inner = Environment::child_of(&globals);
    inner.borrow_mut().define("x", Value::Number(2.0));

    assign_at(&inner, 1, &ident("x"), Value::Number(3.0)).expect("x is bound one frame out");

    assert_eq!(lookup_at(&inner, 0, "x"), Some(Value::Number(2.0)));
    assert_eq!(lookup_at(&inner, 1, "x"), Some(Value::Number(3.0)));
}

#[test]
fn writes_are_visible_through_every_holder() {
    let shared = root();
    let first = Environment::child_of(&shared);
    let second = Environment::child_of(&shared);

    shared.borrow_mut().define("count", Value::Number(0.0));
    assign_at(&first, 1, &ident("count"), Value::Number(5.0)).expect("count is bound");

    assert_eq!(lookup_at(&second, 1, "count"), Some(Value::Number(5.0)));
}
