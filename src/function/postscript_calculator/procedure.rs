use crate::error::PostScriptResult;

use super::{
    operator::OperatorId,
    registry,
    stack::{OperandStack, Value},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Pushed as is when replayed. This includes nested procedures, which are
    /// only run if a conditional consumes them
    Value(Value),
    Operator(OperatorId),
}

/// The recorded body of a `{ ... }` block nested inside the function body.
///
/// Procedures are plain data. They are run with [`replay`], which is how
/// `if` and `ifelse` evaluate the branch they select
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Procedure {
    instructions: Vec<Instruction>,
}

impl Procedure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromIterator<Instruction> for Procedure {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

/// Runs the recorded instructions of `proc` against the live stack, in the
/// order they were lexed
pub fn replay(proc: &Procedure, stack: &mut OperandStack) -> PostScriptResult<()> {
    for instruction in proc.instructions() {
        match instruction {
            Instruction::Value(value) => stack.push(value.clone())?,
            Instruction::Operator(op) => registry::execute(*op, stack)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn replay_runs_instructions_in_order() {
        let proc: Procedure = [
            Instruction::Value(Value::Number(10.0)),
            Instruction::Value(Value::Number(4.0)),
            Instruction::Operator(OperatorId::Sub),
        ]
        .into_iter()
        .collect();

        let mut stack = OperandStack::new();
        replay(&proc, &mut stack).unwrap();

        assert_eq!(stack.into_numbers().unwrap(), vec![6.0]);
    }

    #[test]
    fn replay_pushes_nested_procedures_without_running_them() {
        let inner: Procedure = [
            Instruction::Value(Value::Number(1.0)),
            Instruction::Operator(OperatorId::Add),
        ]
        .into_iter()
        .collect();
        let inner = Rc::new(inner);

        let outer: Procedure = [Instruction::Value(Value::Procedure(Rc::clone(&inner)))]
            .into_iter()
            .collect();

        let mut stack = OperandStack::new();
        replay(&outer, &mut stack).unwrap();

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop().unwrap(), Value::Procedure(inner));
    }

    #[test]
    fn same_procedure_replays_twice() {
        let proc: Procedure = [
            Instruction::Value(Value::Number(2.0)),
            Instruction::Operator(OperatorId::Mul),
        ]
        .into_iter()
        .collect();

        let mut stack = OperandStack::new();
        stack.push(3.0).unwrap();

        replay(&proc, &mut stack).unwrap();
        replay(&proc, &mut stack).unwrap();

        assert_eq!(stack.into_numbers().unwrap(), vec![12.0]);
    }

    #[test]
    fn replay_surfaces_operator_failures() {
        let proc: Procedure = [Instruction::Operator(OperatorId::Add)]
            .into_iter()
            .collect();

        assert!(replay(&proc, &mut OperandStack::new()).is_err());
    }
}
