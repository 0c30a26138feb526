use crate::error::{LoxError, Result};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope frame.  Closures hold clones of this handle, so
/// a frame lives as long as any closure that captured it.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// The global frame: no enclosing link.
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

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Insert or overwrite in *this* frame only.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str, offset: usize) -> Result<Value> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name, offset)
        } else {
            Err(LoxError::runtime(
                offset,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    pub fn assign(&mut self, name: &str, value: Value, offset: usize) -> Result<()> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value, offset)
        } else {
            Err(LoxError::runtime(
                offset,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    /// Value bound in this frame only, no outward walk.
    pub fn get_here(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

/// Walk exactly `distance` enclosing links out from `env`.
pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
    let mut frame: EnvRef = Rc::clone(env);

    for _ in 0..distance {
        let next: EnvRef = frame.borrow().enclosing()?;
        frame = next;
    }

    Some(frame)
}

/// Resolver‑backed read.  A miss means the resolver and the runtime frame
/// chain disagree, which is an interpreter bug rather than a script error.
pub fn get_at(env: &EnvRef, distance: usize, name: &str, offset: usize) -> Result<Value> {
    let frame: EnvRef =
        ancestor(env, distance).ok_or_else(|| scope_mismatch(name, distance, offset))?;

    let value: Option<Value> = frame.borrow().get_here(name);
    value.ok_or_else(|| scope_mismatch(name, distance, offset))
}

/// Resolver‑backed write; same contract as [`get_at`].
pub fn assign_at(
    env: &EnvRef,
    distance: usize,
    name: &str,
    value: Value,
    offset: usize,
) -> Result<()> {
    let frame: EnvRef =
        ancestor(env, distance).ok_or_else(|| scope_mismatch(name, distance, offset))?;

    let mut frame = frame.borrow_mut();

    let Some(slot) = frame.values.get_mut(name) else {
        return Err(scope_mismatch(name, distance, offset));
    };

    *slot = value;
    Ok(())
}

fn scope_mismatch(name: &str, distance: usize, offset: usize) -> LoxError {
    LoxError::runtime(
        offset,
        format!(
            "Internal scope mismatch: '{}' not bound {} frame(s) out.",
            name, distance
        ),
    )
}
