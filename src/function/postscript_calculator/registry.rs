use once_cell::sync::Lazy;

use crate::error::{PostScriptError, PostScriptResult};

use super::{
    operator::OperatorId,
    procedure::replay,
    stack::{OperandStack, Value},
};

/// The behavior of one operator. Operators hold no state of their own, so a
/// single function pointer per operator is shared by every evaluation
pub(crate) type OperatorFn = fn(&mut OperandStack) -> PostScriptResult<()>;

/// Built once, then only read
static REGISTRY: Lazy<[OperatorFn; OperatorId::COUNT]> =
    Lazy::new(|| OperatorId::ALL.map(behavior));

/// Runs `op` against `stack`
pub(crate) fn execute(op: OperatorId, stack: &mut OperandStack) -> PostScriptResult<()> {
    REGISTRY[op as usize](stack)
}

fn behavior(op: OperatorId) -> OperatorFn {
    match op {
        OperatorId::Abs => |stack| float_op(stack, f64::abs),
        OperatorId::Add => |stack| arith(stack, |a, b| a + b),
        OperatorId::Atan => atan,
        OperatorId::Ceiling => |stack| float_op(stack, f64::ceil),
        OperatorId::Cos => |stack| float_op(stack, |angle| angle.to_radians().cos()),
        OperatorId::Cvi => |stack| float_op(stack, f64::trunc),
        OperatorId::Cvr => |stack| float_op(stack, |n| n),
        OperatorId::Div => div,
        OperatorId::Exp => |stack| arith(stack, f64::powf),
        OperatorId::Floor => |stack| float_op(stack, f64::floor),
        OperatorId::Idiv => idiv,
        OperatorId::Ln => |stack| logarithm(stack, f64::ln),
        OperatorId::Log => |stack| logarithm(stack, f64::log10),
        OperatorId::Mod => modulo,
        OperatorId::Mul => |stack| arith(stack, |a, b| a * b),
        OperatorId::Neg => |stack| float_op(stack, |n| -n),
        OperatorId::Round => |stack| float_op(stack, round_half_up),
        OperatorId::Sin => |stack| float_op(stack, |angle| angle.to_radians().sin()),
        OperatorId::Sqrt => sqrt,
        OperatorId::Sub => |stack| arith(stack, |a, b| a - b),
        OperatorId::Truncate => |stack| float_op(stack, f64::trunc),

        OperatorId::And => |stack| logical(stack, |a, b| a && b, |a, b| a & b),
        OperatorId::Bitshift => bitshift,
        OperatorId::Eq => |stack| equality(stack, false),
        OperatorId::Ge => |stack| cmp(stack, |a, b| a >= b),
        OperatorId::Gt => |stack| cmp(stack, |a, b| a > b),
        OperatorId::Le => |stack| cmp(stack, |a, b| a <= b),
        OperatorId::Lt => |stack| cmp(stack, |a, b| a < b),
        OperatorId::Ne => |stack| equality(stack, true),
        OperatorId::Not => not,
        OperatorId::Or => |stack| logical(stack, |a, b| a || b, |a, b| a | b),
        OperatorId::Xor => |stack| logical(stack, |a, b| a ^ b, |a, b| a ^ b),

        OperatorId::If => if_op,
        OperatorId::IfElse => if_else,

        OperatorId::Copy => |stack| {
            let n = stack.pop_count()?;
            stack.copy(n)
        },
        OperatorId::Dup => OperandStack::dup,
        OperatorId::Exch => OperandStack::exch,
        OperatorId::Index => |stack| {
            let n = stack.pop_count()?;
            stack.index(n)
        },
        OperatorId::Pop => |stack| stack.pop().map(drop),
        OperatorId::Roll => roll,

        // braces are consumed by the interpreter before they reach the registry
        OperatorId::ProcedureStart | OperatorId::ProcedureEnd | OperatorId::NoOp => |_| Ok(()),
    }
}

/// Pushes `n`, rejecting infinities and NaN
fn push_result(stack: &mut OperandStack, n: f64) -> PostScriptResult<()> {
    if !n.is_finite() {
        anyhow::bail!(PostScriptError::UndefinedResult);
    }

    stack.push(n)
}

fn float_op(stack: &mut OperandStack, func: impl Fn(f64) -> f64) -> PostScriptResult<()> {
    let n = stack.pop_number()?;
    push_result(stack, func(n))
}

fn arith(stack: &mut OperandStack, func: impl Fn(f64, f64) -> f64) -> PostScriptResult<()> {
    let n2 = stack.pop_number()?;
    let n1 = stack.pop_number()?;

    push_result(stack, func(n1, n2))
}

fn cmp(stack: &mut OperandStack, func: impl Fn(f64, f64) -> bool) -> PostScriptResult<()> {
    let n2 = stack.pop_number()?;
    let n1 = stack.pop_number()?;

    stack.push(func(n1, n2))
}

fn div(stack: &mut OperandStack) -> PostScriptResult<()> {
    let n2 = stack.pop_number()?;
    let n1 = stack.pop_number()?;

    if n2 == 0.0 {
        anyhow::bail!(PostScriptError::UndefinedResult);
    }

    push_result(stack, n1 / n2)
}

fn idiv(stack: &mut OperandStack) -> PostScriptResult<()> {
    let n2 = stack.pop_number()?;
    let n1 = stack.pop_number()?;

    if n2 == 0.0 {
        anyhow::bail!(PostScriptError::UndefinedResult);
    }

    push_result(stack, (n1 / n2).trunc())
}

fn modulo(stack: &mut OperandStack) -> PostScriptResult<()> {
    let i2 = stack.pop_int()?;
    let i1 = stack.pop_int()?;

    match i1.checked_rem(i2) {
        Some(rem) => stack.push(rem as f64),
        None => anyhow::bail!(PostScriptError::UndefinedResult),
    }
}

fn sqrt(stack: &mut OperandStack) -> PostScriptResult<()> {
    let n = stack.pop_number()?;

    if n < 0.0 {
        anyhow::bail!(PostScriptError::RangeCheck);
    }

    stack.push(n.sqrt())
}

fn logarithm(stack: &mut OperandStack, func: impl Fn(f64) -> f64) -> PostScriptResult<()> {
    let n = stack.pop_number()?;

    if n <= 0.0 {
        anyhow::bail!(PostScriptError::RangeCheck);
    }

    push_result(stack, func(n))
}

/// num den `atan` angle, with the angle in degrees in `[0, 360)`
fn atan(stack: &mut OperandStack) -> PostScriptResult<()> {
    let den = stack.pop_number()?;
    let num = stack.pop_number()?;

    if num == 0.0 && den == 0.0 {
        anyhow::bail!(PostScriptError::UndefinedResult);
    }

    let mut angle = num.atan2(den).to_degrees().rem_euclid(360.0);

    // rem_euclid may round a tiny negative angle up to exactly 360
    if angle >= 360.0 {
        angle = 0.0;
    }

    push_result(stack, angle)
}

/// `and`, `or` and `xor` are logical on booleans and bitwise on integers
fn logical(
    stack: &mut OperandStack,
    on_bool: impl Fn(bool, bool) -> bool,
    on_int: impl Fn(i64, i64) -> i64,
) -> PostScriptResult<()> {
    match stack.pop()? {
        Value::Boolean(b2) => {
            let b1 = stack.pop_bool()?;
            stack.push(on_bool(b1, b2))
        }
        Value::Number(n2) => {
            let i1 = stack.pop_int()?;
            stack.push(on_int(i1, n2.trunc() as i64) as f64)
        }
        Value::Procedure(..) => anyhow::bail!(PostScriptError::TypeCheck),
    }
}

fn not(stack: &mut OperandStack) -> PostScriptResult<()> {
    match stack.pop()? {
        Value::Boolean(b) => stack.push(!b),
        Value::Number(n) => stack.push(!(n.trunc() as i64) as f64),
        Value::Procedure(..) => anyhow::bail!(PostScriptError::TypeCheck),
    }
}

/// Halves go toward positive infinity. `n + 0.5` is not used since the
/// addition itself can round up
fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();

    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn bitshift(stack: &mut OperandStack) -> PostScriptResult<()> {
    let shift = stack.pop_int()?;

    let int1 = match i32::try_from(stack.pop_int()?) {
        Ok(int1) => int1 as u32,
        Err(..) => anyhow::bail!(PostScriptError::RangeCheck),
    };

    let shifted = match shift {
        0 => int1,
        1..=31 => int1 << shift,
        -31..=-1 => int1 >> -shift,
        _ => 0,
    };

    stack.push(shifted as i32 as f64)
}

fn equality(stack: &mut OperandStack, negate: bool) -> PostScriptResult<()> {
    let b = stack.pop()?;
    let a = stack.pop()?;

    stack.push((a == b) != negate)
}

fn roll(stack: &mut OperandStack) -> PostScriptResult<()> {
    let j = stack.pop_int()?;
    let n = stack.pop_count()?;

    stack.roll(n, j)
}

/// bool proc `if` –
fn if_op(stack: &mut OperandStack) -> PostScriptResult<()> {
    let proc = stack.pop_procedure()?;
    let condition = stack.pop_bool()?;

    if condition {
        replay(&proc, stack)?;
    }

    Ok(())
}

/// bool proc1 proc2 `ifelse` –
fn if_else(stack: &mut OperandStack) -> PostScriptResult<()> {
    let proc_two = stack.pop_procedure()?;
    let proc_one = stack.pop_procedure()?;
    let condition = stack.pop_bool()?;

    let proc = if condition { proc_one } else { proc_two };

    replay(&proc, stack)
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::function::postscript_calculator::procedure::{Instruction, Procedure};

    fn run(op: OperatorId, operands: &[Value]) -> PostScriptResult<Vec<Value>> {
        let mut stack = OperandStack::new();

        for v in operands {
            stack.push(v.clone())?;
        }

        execute(op, &mut stack)?;

        Ok(stack.into_values())
    }

    fn run_numbers(op: OperatorId, operands: &[f64]) -> Vec<f64> {
        let operands = operands.iter().copied().map(Value::Number).collect::<Vec<_>>();

        run(op, &operands)
            .unwrap()
            .into_iter()
            .map(|v| v.into_number().unwrap())
            .collect()
    }

    fn error_of(op: OperatorId, operands: &[Value]) -> PostScriptError {
        run(op, operands)
            .unwrap_err()
            .downcast::<PostScriptError>()
            .unwrap()
    }

    fn proc_pushing(n: f64) -> Value {
        Value::Procedure(Rc::new(Procedure::from_iter([Instruction::Value(
            Value::Number(n),
        )])))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run_numbers(OperatorId::Add, &[3.0, 4.0]), vec![7.0]);
        assert_eq!(run_numbers(OperatorId::Sub, &[3.0, 4.0]), vec![-1.0]);
        assert_eq!(run_numbers(OperatorId::Mul, &[3.0, 4.0]), vec![12.0]);
        assert_eq!(run_numbers(OperatorId::Div, &[3.0, 4.0]), vec![0.75]);
        assert_eq!(run_numbers(OperatorId::Neg, &[3.0]), vec![-3.0]);
        assert_eq!(run_numbers(OperatorId::Abs, &[-3.5]), vec![3.5]);
        assert_eq!(run_numbers(OperatorId::Exp, &[2.0, 10.0]), vec![1024.0]);
        assert_eq!(run_numbers(OperatorId::Sqrt, &[16.0]), vec![4.0]);
        assert_eq!(run_numbers(OperatorId::Log, &[1000.0]), vec![3.0]);
        assert_eq!(run_numbers(OperatorId::Ln, &[1.0]), vec![0.0]);
    }

    #[test]
    fn idiv_discards_fraction() {
        assert_eq!(run_numbers(OperatorId::Idiv, &[7.0, 2.0]), vec![3.0]);
        assert_eq!(run_numbers(OperatorId::Idiv, &[-7.0, 2.0]), vec![-3.0]);
        assert_eq!(run_numbers(OperatorId::Idiv, &[2.0, 3.0]), vec![0.0]);
    }

    #[test]
    fn mod_takes_sign_of_dividend() {
        assert_eq!(run_numbers(OperatorId::Mod, &[5.0, 3.0]), vec![2.0]);
        assert_eq!(run_numbers(OperatorId::Mod, &[-5.0, 3.0]), vec![-2.0]);
        assert_eq!(run_numbers(OperatorId::Mod, &[5.0, -3.0]), vec![2.0]);
    }

    #[test]
    fn rounding_operators() {
        assert_eq!(run_numbers(OperatorId::Round, &[2.5]), vec![3.0]);
        assert_eq!(run_numbers(OperatorId::Round, &[-2.5]), vec![-2.0]);
        assert_eq!(run_numbers(OperatorId::Round, &[-2.6]), vec![-3.0]);
        assert_eq!(
            run_numbers(OperatorId::Round, &[0.49999999999999994]),
            vec![0.0]
        );
        assert_eq!(run_numbers(OperatorId::Round, &[-0.5]), vec![0.0]);
        assert_eq!(run_numbers(OperatorId::Floor, &[-3.2]), vec![-4.0]);
        assert_eq!(run_numbers(OperatorId::Ceiling, &[-3.2]), vec![-3.0]);
        assert_eq!(run_numbers(OperatorId::Truncate, &[-3.7]), vec![-3.0]);
        assert_eq!(run_numbers(OperatorId::Cvi, &[3.7]), vec![3.0]);
        assert_eq!(run_numbers(OperatorId::Cvr, &[3.7]), vec![3.7]);
    }

    #[test]
    fn trig_uses_degrees() {
        let sin = run_numbers(OperatorId::Sin, &[90.0]);
        let cos = run_numbers(OperatorId::Cos, &[180.0]);

        assert!((sin[0] - 1.0).abs() < 1e-12);
        assert!((cos[0] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn atan_is_normalized_in_every_quadrant() {
        let cases = [
            (1.0, 1.0, 45.0),
            (1.0, -1.0, 135.0),
            (-1.0, -1.0, 225.0),
            (-1.0, 1.0, 315.0),
            (0.0, 1.0, 0.0),
            (1.0, 0.0, 90.0),
            (0.0, -1.0, 180.0),
            (-1.0, 0.0, 270.0),
        ];

        for (num, den, expected) in cases {
            let angle = run_numbers(OperatorId::Atan, &[num, den])[0];

            assert!((0.0..360.0).contains(&angle), "{} {} => {}", num, den, angle);
            assert!((angle - expected).abs() < 1e-9, "{} {} => {}", num, den, angle);
        }

        let tiny_negative = run_numbers(OperatorId::Atan, &[-1e-300, 1.0])[0];
        assert!((0.0..360.0).contains(&tiny_negative));
    }

    #[test]
    fn undefined_results() {
        let zero = Value::Number(0.0);
        let one = Value::Number(1.0);

        for op in [OperatorId::Div, OperatorId::Idiv, OperatorId::Mod] {
            assert!(matches!(
                error_of(op, &[one.clone(), zero.clone()]),
                PostScriptError::UndefinedResult
            ));
        }

        assert!(matches!(
            error_of(OperatorId::Atan, &[zero.clone(), zero.clone()]),
            PostScriptError::UndefinedResult
        ));
        assert!(matches!(
            error_of(OperatorId::Exp, &[Value::Number(-8.0), Value::Number(0.5)]),
            PostScriptError::UndefinedResult
        ));
    }

    #[test]
    fn domain_errors_are_rangecheck() {
        for op in [OperatorId::Ln, OperatorId::Log] {
            assert!(matches!(
                error_of(op, &[Value::Number(0.0)]),
                PostScriptError::RangeCheck
            ));
        }

        assert!(matches!(
            error_of(OperatorId::Sqrt, &[Value::Number(-1.0)]),
            PostScriptError::RangeCheck
        ));
    }

    #[test]
    fn comparisons() {
        let two = Value::Number(2.0);
        let three = Value::Number(3.0);

        let cases = [
            (OperatorId::Lt, true),
            (OperatorId::Le, true),
            (OperatorId::Gt, false),
            (OperatorId::Ge, false),
            (OperatorId::Eq, false),
            (OperatorId::Ne, true),
        ];

        for (op, expected) in cases {
            assert_eq!(
                run(op, &[two.clone(), three.clone()]).unwrap(),
                vec![Value::Boolean(expected)],
                "{}",
                op
            );
        }
    }

    #[test]
    fn eq_across_types_is_false() {
        assert_eq!(
            run(OperatorId::Eq, &[Value::Number(1.0), Value::Boolean(true)]).unwrap(),
            vec![Value::Boolean(false)]
        );
        assert_eq!(
            run(OperatorId::Ne, &[Value::Boolean(true), Value::Boolean(true)]).unwrap(),
            vec![Value::Boolean(false)]
        );
    }

    #[test]
    fn relational_rejects_booleans() {
        assert!(matches!(
            error_of(OperatorId::Gt, &[Value::Boolean(true), Value::Number(1.0)]),
            PostScriptError::TypeCheck
        ));
    }

    #[test]
    fn logical_on_booleans() {
        let t = Value::Boolean(true);
        let f = Value::Boolean(false);

        assert_eq!(
            run(OperatorId::And, &[t.clone(), f.clone()]).unwrap(),
            vec![f.clone()]
        );
        assert_eq!(
            run(OperatorId::Or, &[t.clone(), f.clone()]).unwrap(),
            vec![t.clone()]
        );
        assert_eq!(
            run(OperatorId::Xor, &[t.clone(), t.clone()]).unwrap(),
            vec![f.clone()]
        );
        assert_eq!(run(OperatorId::Not, &[t]).unwrap(), vec![f]);
    }

    #[test]
    fn logical_on_integers_is_bitwise() {
        assert_eq!(run_numbers(OperatorId::And, &[12.0, 10.0]), vec![8.0]);
        assert_eq!(run_numbers(OperatorId::Or, &[12.0, 10.0]), vec![14.0]);
        assert_eq!(run_numbers(OperatorId::Xor, &[12.0, 10.0]), vec![6.0]);
        assert_eq!(run_numbers(OperatorId::Not, &[52.0]), vec![-53.0]);
        assert_eq!(run_numbers(OperatorId::And, &[12.9, 10.2]), vec![8.0]);
    }

    #[test]
    fn logical_rejects_mixed_operands() {
        assert!(matches!(
            error_of(OperatorId::And, &[Value::Number(1.0), Value::Boolean(true)]),
            PostScriptError::TypeCheck
        ));
        assert!(matches!(
            error_of(OperatorId::Or, &[Value::Boolean(true), Value::Number(1.0)]),
            PostScriptError::TypeCheck
        ));
    }

    #[test]
    fn bitshift_both_directions() {
        assert_eq!(run_numbers(OperatorId::Bitshift, &[7.0, 3.0]), vec![56.0]);
        assert_eq!(run_numbers(OperatorId::Bitshift, &[142.0, -3.0]), vec![17.0]);
        assert_eq!(run_numbers(OperatorId::Bitshift, &[1.0, 40.0]), vec![0.0]);
        assert_eq!(
            run_numbers(OperatorId::Bitshift, &[-2147483648.0, -31.0]),
            vec![1.0]
        );
    }

    #[test]
    fn bitshift_rejects_operands_wider_than_32_bits() {
        for int1 in [2147483648.0, -2147483649.0, 1e12] {
            assert!(matches!(
                error_of(
                    OperatorId::Bitshift,
                    &[Value::Number(int1), Value::Number(1.0)]
                ),
                PostScriptError::RangeCheck
            ));
        }
    }

    #[test]
    fn stack_operators() {
        assert_eq!(run_numbers(OperatorId::Dup, &[1.0]), vec![1.0, 1.0]);
        assert_eq!(run_numbers(OperatorId::Exch, &[1.0, 2.0]), vec![2.0, 1.0]);
        assert_eq!(run_numbers(OperatorId::Pop, &[1.0, 2.0]), vec![1.0]);
        assert_eq!(
            run_numbers(OperatorId::Copy, &[1.0, 2.0, 3.0, 2.0]),
            vec![1.0, 2.0, 3.0, 2.0, 3.0]
        );
        assert_eq!(
            run_numbers(OperatorId::Index, &[1.0, 2.0, 3.0, 4.0, 0.0]),
            vec![1.0, 2.0, 3.0, 4.0, 4.0]
        );
        assert_eq!(
            run_numbers(OperatorId::Roll, &[1.0, 2.0, 3.0, 3.0, -1.0]),
            vec![2.0, 3.0, 1.0]
        );
        assert_eq!(
            run_numbers(OperatorId::Roll, &[1.0, 2.0, 3.0, 3.0, 1.0]),
            vec![3.0, 1.0, 2.0]
        );
    }

    #[test]
    fn stack_operators_underflow() {
        for op in [OperatorId::Dup, OperatorId::Exch, OperatorId::Pop, OperatorId::Add] {
            assert!(matches!(error_of(op, &[]), PostScriptError::StackUnderflow));
        }

        assert!(matches!(
            error_of(OperatorId::Index, &[Value::Number(1.0), Value::Number(1.0)]),
            PostScriptError::StackUnderflow
        ));
    }

    #[test]
    fn if_runs_procedure_only_when_true() {
        assert_eq!(
            run(OperatorId::If, &[Value::Boolean(true), proc_pushing(5.0)]).unwrap(),
            vec![Value::Number(5.0)]
        );
        assert!(run(OperatorId::If, &[Value::Boolean(false), proc_pushing(5.0)])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn ifelse_selects_one_branch() {
        let operands = |condition| [Value::Boolean(condition), proc_pushing(1.0), proc_pushing(2.0)];

        assert_eq!(
            run(OperatorId::IfElse, &operands(true)).unwrap(),
            vec![Value::Number(1.0)]
        );
        assert_eq!(
            run(OperatorId::IfElse, &operands(false)).unwrap(),
            vec![Value::Number(2.0)]
        );
    }

    #[test]
    fn if_requires_boolean_and_procedure() {
        assert!(matches!(
            error_of(OperatorId::If, &[Value::Number(1.0), proc_pushing(5.0)]),
            PostScriptError::TypeCheck
        ));
        assert!(matches!(
            error_of(OperatorId::If, &[Value::Boolean(true), Value::Number(1.0)]),
            PostScriptError::TypeCheck
        ));
    }

    #[test]
    fn noop_has_no_stack_effect() {
        assert_eq!(run_numbers(OperatorId::NoOp, &[1.0]), vec![1.0]);
    }
}
