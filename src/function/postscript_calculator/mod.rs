use std::io::Read;

use crate::error::PostScriptResult;

use self::interpreter::CalculatorInterpreter;

pub use self::{
    operator::OperatorId,
    options::{CalculatorOptions, TruncatedInputPolicy, UnknownTokenPolicy},
    procedure::{replay, Instruction, Procedure},
    stack::{OperandStack, ProcedureHandle, Value},
};

mod classify;
mod interpreter;
mod lexer;
mod operator;
mod options;
mod procedure;
mod registry;
mod stack;

/// Evaluates a type 4 function body with the default options, returning the
/// operand stack bottom to top
pub fn evaluate(program: &[u8], inputs: &[f64]) -> PostScriptResult<Vec<Value>> {
    Ok(evaluate_stream(program, inputs, &CalculatorOptions::default())?.into_values())
}

/// Evaluates a type 4 function body read from `reader`.
///
/// The inputs are pushed in order before the body runs. Once the stream is
/// exhausted, the operand stack holds the function's results
pub fn evaluate_stream<R: Read>(
    reader: R,
    inputs: &[f64],
    options: &CalculatorOptions,
) -> PostScriptResult<OperandStack> {
    log::debug!("evaluating type 4 function with inputs {:?}", inputs);

    let mut interpreter = CalculatorInterpreter::new(reader, options);
    interpreter.push_inputs(inputs)?;

    let stack = interpreter.run()?;

    log::debug!("type 4 function left {} value(s)", stack.len());

    Ok(stack)
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::*;
    use crate::error::PostScriptError;

    /// Assert the operand stack holds exactly the given numbers, bottom to top
    macro_rules! assert_numbers {
        ($values:expr, [$($n:expr),* $(,)?]) => {
            let values: Vec<Value> = $values;
            assert_eq!(values, vec![$(Value::Number($n)),*]);
        };
    }

    #[test]
    fn arithmetic_only_body() {
        assert_numbers!(evaluate(b"{3 4 add}", &[]).unwrap(), [7.0]);
        assert_numbers!(evaluate(b"{ 2 3 4 mul add 5 sub }", &[]).unwrap(), [9.0]);
    }

    #[test]
    fn conditional_selects_one_branch() {
        assert_numbers!(evaluate(b"{true {1} {2} ifelse}", &[]).unwrap(), [1.0]);
        assert_numbers!(evaluate(b"{false {1} {2} ifelse}", &[]).unwrap(), [2.0]);
    }

    #[test]
    fn boolean_result_is_kept() {
        assert_eq!(
            evaluate(b"{ 1 2 lt }", &[]).unwrap(),
            vec![Value::Boolean(true)]
        );
    }

    #[test]
    fn empty_stack_add_is_underflow() {
        let err = evaluate(b"{add}", &[]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PostScriptError>(),
            Some(PostScriptError::StackUnderflow)
        ));
    }

    #[test]
    fn runaway_nesting_is_an_error() {
        let mut program = b"{ ".to_vec();
        program.extend(std::iter::repeat(b'{').take(200_000));
        program.extend(std::iter::repeat(b'}').take(200_000));
        program.extend_from_slice(b" pop 7 }");

        let err = evaluate(&program, &[]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PostScriptError>(),
            Some(PostScriptError::LimitCheck)
        ));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let program = b"{ 2 copy atan 3 1 roll mul sqrt dup 0.5 gt { 1 exch sub } if }";

        let first = evaluate(program, &[0.25, 0.75]).unwrap();
        let second = evaluate(program, &[0.25, 0.75]).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn evaluations_share_nothing_across_threads() {
        let program: &[u8] = b"{ dup 0.5 lt { 2 mul } { 0.5 sub 2 mul 1 exch sub } ifelse }";

        let results = thread::scope(|scope| {
            let handles = (0..8)
                .map(|i| {
                    scope.spawn(move || {
                        evaluate_stream(program, &[i as f64 / 8.0], &CalculatorOptions::default())
                            .unwrap()
                            .into_numbers()
                            .unwrap()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        for (i, result) in results.into_iter().enumerate() {
            let expected = evaluate_stream(program, &[i as f64 / 8.0], &CalculatorOptions::default())
                .unwrap()
                .into_numbers()
                .unwrap();

            assert_eq!(result, expected);
        }
    }

    #[test]
    fn real_world_tint_transform() {
        // a DeviceN to CMYK tint transform, as commonly emitted by layout tools
        let program = b"{ dup 0.0 mul exch dup 0.64 mul exch dup 0.95 mul exch 0.0 mul }";

        let outputs = evaluate_stream(&program[..], &[0.5], &CalculatorOptions::default())
            .unwrap()
            .into_numbers()
            .unwrap();

        assert_eq!(outputs, vec![0.0, 0.32, 0.475, 0.0]);
    }
}
