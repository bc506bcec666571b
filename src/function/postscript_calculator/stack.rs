use std::rc::Rc;

use crate::error::{PostScriptError, PostScriptResult};

use super::procedure::Procedure;

/// Procedures are immutable once closed, so a value on the stack only needs a
/// shared handle to one
pub type ProcedureHandle = Rc<Procedure>;

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Procedure(ProcedureHandle),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self, Self::Procedure(..))
    }

    pub fn into_number(self) -> PostScriptResult<f64> {
        match self {
            Value::Number(n) => Ok(n),
            _ => anyhow::bail!(PostScriptError::TypeCheck),
        }
    }
}

/// Numbers and booleans compare by value; procedures compare by identity,
/// matching `eq`
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// The operand stack of a single function evaluation
#[derive(Debug, Default, Clone)]
pub struct OperandStack {
    stack: Vec<Value>,

    /// Pushing beyond this many values is a `stackoverflow`
    max_depth: Option<usize>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Bottom to top
    pub fn as_slice(&self) -> &[Value] {
        &self.stack
    }

    pub fn into_values(self) -> Vec<Value> {
        self.stack
    }

    /// Converts the stack, bottom to top, into function outputs. Anything other
    /// than a number left on the stack is a `typecheck`
    pub fn into_numbers(self) -> PostScriptResult<Vec<f64>> {
        self.stack.into_iter().map(Value::into_number).collect()
    }

    pub fn push(&mut self, value: impl Into<Value>) -> PostScriptResult<()> {
        if let Some(max) = self.max_depth {
            if self.stack.len() >= max {
                anyhow::bail!(PostScriptError::StackOverflow);
            }
        }

        self.stack.push(value.into());

        Ok(())
    }

    pub fn pop(&mut self) -> PostScriptResult<Value> {
        match self.stack.pop() {
            Some(v) => Ok(v),
            None => anyhow::bail!(PostScriptError::StackUnderflow),
        }
    }

    pub fn pop_number(&mut self) -> PostScriptResult<f64> {
        match self.pop()? {
            Value::Number(n) => Ok(n),
            _ => anyhow::bail!(PostScriptError::TypeCheck),
        }
    }

    /// Pops a number and truncates it toward zero
    pub fn pop_int(&mut self) -> PostScriptResult<i64> {
        Ok(self.pop_number()?.trunc() as i64)
    }

    /// Pops a non-negative integer, used for counts and depths
    pub fn pop_count(&mut self) -> PostScriptResult<usize> {
        match usize::try_from(self.pop_int()?) {
            Ok(n) => Ok(n),
            Err(..) => anyhow::bail!(PostScriptError::RangeCheck),
        }
    }

    pub fn pop_bool(&mut self) -> PostScriptResult<bool> {
        match self.pop()? {
            Value::Boolean(b) => Ok(b),
            _ => anyhow::bail!(PostScriptError::TypeCheck),
        }
    }

    pub fn pop_procedure(&mut self) -> PostScriptResult<ProcedureHandle> {
        match self.pop()? {
            Value::Procedure(proc) => Ok(proc),
            _ => anyhow::bail!(PostScriptError::TypeCheck),
        }
    }

    /// `n` positions below the top, 0 being the top itself
    pub fn peek(&self, n: usize) -> PostScriptResult<&Value> {
        match self.stack.len().checked_sub(n + 1) {
            Some(idx) => Ok(&self.stack[idx]),
            None => anyhow::bail!(PostScriptError::StackUnderflow),
        }
    }

    pub fn dup(&mut self) -> PostScriptResult<()> {
        let top = self.peek(0)?.clone();
        self.push(top)
    }

    pub fn exch(&mut self) -> PostScriptResult<()> {
        let len = self.stack.len();

        if len < 2 {
            anyhow::bail!(PostScriptError::StackUnderflow);
        }

        self.stack.swap(len - 1, len - 2);

        Ok(())
    }

    /// Duplicates the top `n` values, keeping their order
    pub fn copy(&mut self, n: usize) -> PostScriptResult<()> {
        let len = self.stack.len();

        if n > len {
            anyhow::bail!(PostScriptError::StackUnderflow);
        }

        if let Some(max) = self.max_depth {
            if len + n > max {
                anyhow::bail!(PostScriptError::StackOverflow);
            }
        }

        self.stack.extend_from_within(len - n..);

        Ok(())
    }

    /// Pushes a copy of the value `n` positions below the top
    pub fn index(&mut self, n: usize) -> PostScriptResult<()> {
        let value = self.peek(n)?.clone();
        self.push(value)
    }

    /// Rotates the top `n` values by `j` positions. For positive `j` each step
    /// moves the top value down to position `n - 1`; negative `j` rotates the
    /// other way
    pub fn roll(&mut self, n: usize, j: i64) -> PostScriptResult<()> {
        let len = self.stack.len();

        if n > len {
            anyhow::bail!(PostScriptError::StackUnderflow);
        }

        if n == 0 {
            return Ok(());
        }

        let shift = j.rem_euclid(n as i64) as usize;

        self.stack[len - n..].rotate_right(shift);

        Ok(())
    }
}
