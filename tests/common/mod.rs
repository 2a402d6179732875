#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::lox::{Lox, Outcome};

/// A `Write` sink the test keeps a handle to after giving it away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session writing into a buffer the caller can inspect.
pub fn session() -> (Lox, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let lox = Lox::with_output(Box::new(buffer.clone()));
    (lox, buffer)
}

/// Run `source` in a fresh session; return the outcome and printed lines.
pub fn run(source: &str) -> (Outcome<()>, Vec<String>) {
    let (mut lox, buffer) = session();
    let outcome = lox.run(source);
    (outcome, buffer.lines())
}

/// Run a program that must succeed and return its printed lines.
pub fn output_of(source: &str) -> Vec<String> {
    let (outcome, lines) = run(source);
    match outcome {
        Outcome::Success(()) => lines,
        Outcome::StaticErrors(diagnostics) => panic!("static errors:\n{}", diagnostics),
        Outcome::RuntimeError(e) => panic!("runtime error: {}", e),
    }
}

/// Run a program that must fail at run time; return the error text and the
/// lines printed before the failure.
pub fn runtime_error_of(source: &str) -> (String, Vec<String>) {
    let (outcome, lines) = run(source);
    match outcome {
        Outcome::RuntimeError(e) => (e.to_string(), lines),
        Outcome::Success(()) => panic!("expected a runtime error, printed {:?}", lines),
        Outcome::StaticErrors(diagnostics) => panic!("static errors:\n{}", diagnostics),
    }
}

/// Run a program that must be rejected statically; return each diagnostic.
pub fn static_errors_of(source: &str) -> Vec<String> {
    let (outcome, lines) = run(source);
    assert!(lines.is_empty(), "nothing may run after a static error");
    match outcome {
        Outcome::StaticErrors(diagnostics) => diagnostics.iter().map(|e| e.to_string()).collect(),
        Outcome::Success(()) => panic!("expected static errors"),
        Outcome::RuntimeError(e) => panic!("runtime error: {}", e),
    }
}
