use std::{borrow::Cow, io::Read, rc::Rc};

use crate::error::{PostScriptError, PostScriptResult};

use super::{
    lexer::{PostScriptFunctionLexer, PostScriptFunctionToken},
    operator::OperatorId,
    options::{CalculatorOptions, TruncatedInputPolicy, UnknownTokenPolicy},
    procedure::{Instruction, Procedure},
    registry,
    stack::{OperandStack, Value},
};

/// Evaluates one type 4 function body against one set of inputs.
///
/// Tokens of the outermost `{ ... }` are executed as soon as they are lexed.
/// Tokens inside further braces are recorded into a [`Procedure`], which is
/// pushed as a value once its `}` is reached and only runs if `if` or `ifelse`
/// picks it
#[derive(Debug)]
pub(crate) struct CalculatorInterpreter<R> {
    lexer: PostScriptFunctionLexer<R>,
    operand_stack: OperandStack,

    /// Procedures that are still being recorded, innermost last. While this is
    /// non-empty tokens are recorded rather than executed
    scopes: Vec<Procedure>,

    /// Number of unclosed `{`. The function body itself is depth 1
    depth: usize,
    max_nesting_depth: usize,

    unknown_tokens: UnknownTokenPolicy,
    on_truncated_input: TruncatedInputPolicy,
}

impl<R: Read> CalculatorInterpreter<R> {
    pub fn new(reader: R, options: &CalculatorOptions) -> Self {
        Self {
            lexer: PostScriptFunctionLexer::new(
                reader,
                options.buffer_capacity,
                options.unknown_tokens,
            ),
            operand_stack: OperandStack::with_max_depth(options.max_stack_depth),
            scopes: Vec::new(),
            depth: 0,
            max_nesting_depth: options.max_nesting_depth,
            unknown_tokens: options.unknown_tokens,
            on_truncated_input: options.on_truncated_input,
        }
    }

    pub fn push_inputs(&mut self, inputs: &[f64]) -> PostScriptResult<()> {
        for &input in inputs {
            self.operand_stack.push(input)?;
        }

        Ok(())
    }

    /// Consumes the entire stream, returning the final operand stack
    pub fn run(mut self) -> PostScriptResult<OperandStack> {
        while let Some(tok) = self.lexer.next() {
            self.execute_token(tok?)?;
        }

        if self.depth > 0 {
            match self.on_truncated_input {
                TruncatedInputPolicy::Fail => anyhow::bail!(PostScriptError::TruncatedInput {
                    depth: self.depth,
                }),
                TruncatedInputPolicy::Tolerate => {
                    log::warn!(
                        "function body ended with {} unclosed procedure(s)",
                        self.depth
                    );

                    self.close_open_procedures()?;
                }
            }
        }

        Ok(self.operand_stack)
    }

    fn execute_token(&mut self, tok: PostScriptFunctionToken) -> PostScriptResult<()> {
        match tok {
            PostScriptFunctionToken::Operator(OperatorId::ProcedureStart) => {
                self.procedure_start()
            }
            PostScriptFunctionToken::Operator(OperatorId::ProcedureEnd) => self.procedure_end(),
            PostScriptFunctionToken::Operator(op) => match self.scopes.last_mut() {
                Some(proc) => {
                    proc.push(Instruction::Operator(op));
                    Ok(())
                }
                None => registry::execute(op, &mut self.operand_stack),
            },
            PostScriptFunctionToken::Number(n) => self.push_or_record(Value::Number(n)),
            PostScriptFunctionToken::Boolean(b) => self.push_or_record(Value::Boolean(b)),
        }
    }

    fn push_or_record(&mut self, value: Value) -> PostScriptResult<()> {
        match self.scopes.last_mut() {
            Some(proc) => {
                proc.push(Instruction::Value(value));
                Ok(())
            }
            None => self.operand_stack.push(value),
        }
    }

    fn procedure_start(&mut self) -> PostScriptResult<()> {
        if self.depth >= self.max_nesting_depth {
            anyhow::bail!(PostScriptError::LimitCheck);
        }

        self.depth += 1;

        if self.depth > 1 {
            self.scopes.push(Procedure::new());
        }

        Ok(())
    }

    fn procedure_end(&mut self) -> PostScriptResult<()> {
        match self.depth {
            0 => match self.unknown_tokens {
                UnknownTokenPolicy::Strict => anyhow::bail!(PostScriptError::SyntaxError(
                    Cow::Borrowed("unmatched '}'")
                )),
                UnknownTokenPolicy::Lenient => {
                    log::warn!("ignoring unmatched '}}'");
                    return Ok(());
                }
            },
            1 => {}
            _ => {
                let proc = match self.scopes.pop() {
                    Some(proc) => Value::Procedure(Rc::new(proc)),
                    None => unreachable!("every `{{` past the body opens a scope"),
                };

                self.push_or_record(proc)?;
            }
        }

        self.depth -= 1;

        Ok(())
    }

    /// Ends every procedure still being recorded, innermost first, as if the
    /// missing `}` had all been read
    fn close_open_procedures(&mut self) -> PostScriptResult<()> {
        while let Some(proc) = self.scopes.pop() {
            self.push_or_record(Value::Procedure(Rc::new(proc)))?;
        }

        self.depth = 0;

        Ok(())
    }
}
