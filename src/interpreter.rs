//! Tree-walking evaluator.
//!
//! `execute` runs statements and reports how control left them ([`Flow`]);
//! `evaluate` computes expression values.  A `return` travels back up as
//! `Flow::Return` until the enclosing call consumes it, so it is never
//! confused with an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::class::{LoxClass, LoxInstance};
use crate::environment::{self, EnvRef, Environment};
use crate::error::{LoxError, Result};
use crate::function::{LoxFunction, NativeFunction};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How control left a statement.
#[derive(Debug, Clone)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Deepest chain of Lox calls allowed before the run fails.
pub const MAX_CALL_DEPTH: usize = 4096;

/// Native stack to keep free before entering a call; grow below this.
const RED_ZONE: usize = 100 * 1024;

/// Size of each native stack segment added when the red zone is reached.
const STACK_GROWTH: usize = 1024 * 1024;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Seconds since the interpreter first started in this process.
fn clock(_args: &[Value]) -> Value {
    let start = PROCESS_START.get_or_init(Instant::now);

    Value::Number(start.elapsed().as_secs_f64())
}

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    /// Resolver output: expression id → number of frames to walk out.
    locals: HashMap<ExprId, usize>,
    out: Box<dyn Write>,
    /// Lox calls currently in progress.
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to stdout, with the native `clock` defined.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter whose `print` statements write to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        PROCESS_START.get_or_init(Instant::now);

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: clock,
            })),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
            depth: 0,
        }
    }

    /// Called by the resolver for every local reference it binds.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Resolved distance of `id`, or `None` for a global reference.
    pub fn resolved_depth(&self, id: ExprId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Run a resolved program.  A runtime error stops the run; the interpreter
    /// is left ready for the next one with the same globals.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            if let Err(e) = self.execute(stmt) {
                debug!("Runtime error: {}", e);

                self.environment = Rc::clone(&self.globals);
                let _ = self.out.flush();

                return Err(e);
            }
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");

        Ok(())
    }

    // ───────────────────────────── statements ──────────────────────────────

    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Defining variable '{}' = {}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let frame = Environment::child_of(&self.environment);
                return self.execute_block(statements, frame);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_stmt) = else_branch {
                    return self.execute(else_stmt);
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods)?,

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                return Ok(Flow::Return(value));
            }

            Stmt::Empty => {}
        }

        Ok(Flow::Normal)
    }

    /// Execute `statements` with `frame` as the current environment, restoring
    /// the previous one on every exit path.
    pub fn execute_block(&mut self, statements: &[Stmt], frame: EnvRef) -> Result<Flow> {
        let previous = mem::replace(&mut self.environment, frame);

        let result = self.execute_all(statements);

        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> Result<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),
                _ => {
                    let token = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => name,
                    };

                    return Err(LoxError::runtime(token, "Superclass must be a class."));
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        let method_env: EnvRef = match &superclass {
            Some(superclass) => {
                let frame = Environment::child_of(&self.environment);
                frame
                    .borrow_mut()
                    .define("super", Value::Class(Rc::clone(superclass)));
                frame
            }
            None => Rc::clone(&self.environment),
        };

        let methods: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|declaration| {
                let is_initializer = declaration.name.lexeme == "init";
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&method_env),
                    is_initializer,
                );

                (declaration.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        let class = LoxClass::new(name.lexeme.clone(), superclass, methods);

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))
    }

    // ───────────────────────────── expressions ─────────────────────────────

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;

                match (&operator.token_type, right) {
                    (TokenType::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
                    (TokenType::MINUS, _) => {
                        Err(LoxError::runtime(operator, "Operand must be a number."))
                    }
                    (_, right) => Ok(Value::Bool(!right.is_truthy())),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                binary(operator, left, right)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuits = if operator.token_type == TokenType::OR {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values: Vec<Value> = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                self.call_value(callee, paren, values)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());

                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    /// `super.method`: look up from the superclass bound `distance` frames out
    /// and bind the result to the `this` one frame closer.
    fn evaluate_super(&self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance = self
            .locals
            .get(&id)
            .copied()
            .ok_or_else(|| LoxError::runtime(keyword, "Can't use 'super' outside of a class."))?;

        let Value::Class(superclass) = environment::get_at(&self.environment, distance, keyword)?
        else {
            return Err(LoxError::runtime(keyword, "Superclass must be a class."));
        };

        let instance = match distance
            .checked_sub(1)
            .and_then(|d| environment::lookup_at(&self.environment, d, "this"))
        {
            Some(Value::Instance(instance)) => instance,
            _ => return Err(LoxError::runtime(keyword, "Can't use 'super' outside of a method.")),
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),
            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> Result<Value> {
        debug!("Calling {} with {} argument(s)", callee, arguments.len());

        match callee {
            Value::Native(native) => {
                check_arity(paren, native.arity, arguments.len())?;
                Ok((native.func)(&arguments))
            }

            Value::Function(function) => {
                check_arity(paren, function.arity(), arguments.len())?;
                self.nested_call(paren, |interpreter| function.call(interpreter, arguments))
            }

            Value::Class(class) => {
                check_arity(paren, class.arity(), arguments.len())?;
                self.nested_call(paren, |interpreter| {
                    LoxClass::instantiate(&class, interpreter, arguments)
                })
            }

            other => {
                debug!("Refusing to call a {}", other.type_name());

                Err(LoxError::runtime(
                    paren,
                    "Can only call functions and classes.",
                ))
            }
        }
    }

    /// Enter one level of Lox call, bounded by [`MAX_CALL_DEPTH`].  The native
    /// stack grows on demand once less than the red zone is left.
    fn nested_call<F>(&mut self, paren: &Token, call: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        if self.depth >= MAX_CALL_DEPTH {
            debug!("Call depth limit {} reached", MAX_CALL_DEPTH);

            return Err(LoxError::runtime(paren, "Stack overflow."));
        }

        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || call(self));
        self.depth -= 1;

        result
    }
}

/// Arity is checked before any argument is bound or any body runs.
fn check_arity(paren: &Token, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        return Ok(());
    }

    Err(LoxError::runtime(
        paren,
        format!("Expected {} arguments but got {}.", expected, got),
    ))
}

/// Arithmetic, comparison and equality on two evaluated operands.
fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    use Value::{Bool, Number};

    match (&operator.token_type, left, right) {
        (TokenType::EQUAL_EQUAL, l, r) => Ok(Bool(l == r)),
        (TokenType::BANG_EQUAL, l, r) => Ok(Bool(l != r)),

        (TokenType::PLUS, Number(a), Number(b)) => Ok(Number(a + b)),
        (TokenType::PLUS, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (TokenType::PLUS, _, _) => Err(LoxError::runtime(
            operator,
            "Operands must be two numbers or two strings.",
        )),

        (TokenType::MINUS, Number(a), Number(b)) => Ok(Number(a - b)),
        (TokenType::STAR, Number(a), Number(b)) => Ok(Number(a * b)),
        (TokenType::SLASH, Number(a), Number(b)) => Ok(Number(a / b)),
        (TokenType::GREATER, Number(a), Number(b)) => Ok(Bool(a > b)),
        (TokenType::GREATER_EQUAL, Number(a), Number(b)) => Ok(Bool(a >= b)),
        (TokenType::LESS, Number(a), Number(b)) => Ok(Bool(a < b)),
        (TokenType::LESS_EQUAL, Number(a), Number(b)) => Ok(Bool(a <= b)),

        _ => Err(LoxError::runtime(operator, "Operands must be numbers.")),
    }
}
