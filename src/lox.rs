//! The source-to-result pipeline: scan → parse → resolve → interpret.
//!
//! A [`Lox`] session owns one interpreter, so consecutive calls to
//! [`Lox::run`] share globals (the REPL); a file run uses a fresh session.

use std::io::Write;

use log::{debug, info};

use crate::error::{Diagnostics, LoxError};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;
use crate::value::Value;

/// Exit status for static (scan/parse/resolve) errors.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit status for runtime errors.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Result of pushing one unit of source through the pipeline.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    /// Interpretation was suppressed; every static error found is listed.
    StaticErrors(Diagnostics),
    RuntimeError(LoxError),
}

impl<T> Outcome<T> {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success(_) => 0,
            Outcome::StaticErrors(_) => EXIT_STATIC_ERROR,
            Outcome::RuntimeError(_) => EXIT_RUNTIME_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

pub struct Lox {
    interpreter: Interpreter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    /// Run `source` as a program.
    pub fn run(&mut self, source: &str) -> Outcome<()> {
        info!("Running {} byte(s) of source", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        // Resolving a tree with syntax errors only produces noise.
        if diagnostics.has_errors() {
            debug!("{} static error(s), skipping resolve", diagnostics.len());
            return Outcome::StaticErrors(diagnostics);
        }

        Resolver::new(&mut self.interpreter).resolve(&statements, &mut diagnostics);

        if diagnostics.has_errors() {
            return Outcome::StaticErrors(diagnostics);
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => Outcome::Success(()),
            Err(e) => Outcome::RuntimeError(e),
        }
    }

    /// Evaluate `source` as a single expression and return its value.
    pub fn evaluate(&mut self, source: &str) -> Outcome<Value> {
        info!("Evaluating {} byte(s) of source", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = scan_tokens(source, &mut diagnostics);
        let expr = Parser::new(tokens).parse_expression(&mut diagnostics);

        let Some(expr) = expr.filter(|_| !diagnostics.has_errors()) else {
            return Outcome::StaticErrors(diagnostics);
        };

        Resolver::new(&mut self.interpreter).resolve_expression(&expr, &mut diagnostics);

        if diagnostics.has_errors() {
            return Outcome::StaticErrors(diagnostics);
        }

        match self.interpreter.evaluate(&expr) {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::RuntimeError(e),
        }
    }
}
