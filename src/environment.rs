//! Lexical scope frames.
//!
//! Frames are shared through `Rc<RefCell<_>>`: a child frame and every closure
//! that captured a frame hold a strong reference to it, so a frame lives as
//! long as anything can still reach it, and a write through one holder is seen
//! by all of them.

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a frame.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root (global) frame.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Convenience: a fresh child frame of `enclosing`, already shared.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Insert or overwrite `name` in this frame.  Never fails.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define '{}'", name);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up, walking outward until the root.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite an existing binding, walking outward until the root.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }
}

/// The frame exactly `distance` hops out from `env` (0 is `env` itself).
pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
    let mut frame: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let parent = frame.borrow().enclosing.clone()?;
        frame = parent;
    }

    Some(frame)
}

/// Read `name` from the frame exactly `distance` hops out, if bound there.
pub fn lookup_at(env: &EnvRef, distance: usize, name: &str) -> Option<Value> {
    let frame = ancestor(env, distance)?;
    let value = frame.borrow().values.get(name).cloned();
    value
}

/// Resolver‑informed read: no walking beyond the known distance.
pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
    lookup_at(env, distance, &name.lexeme).ok_or_else(|| undefined(name))
}

/// Resolver‑informed write into the frame `distance` hops out.
pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
    let frame = ancestor(env, distance).ok_or_else(|| undefined(name))?;
    let mut frame = frame.borrow_mut();

    match frame.values.get_mut(&name.lexeme) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(undefined(name)),
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}
