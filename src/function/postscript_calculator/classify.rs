use super::operator::OperatorId;

/// Resolves an operator name to its [`OperatorId`].
///
/// This walks a fixed decision tree: the first byte (ignoring ASCII case),
/// then the length, then as few of the remaining bytes as are needed to tell
/// names apart. Nothing is allocated and the name is never compared as a
/// whole string. Names that fall off the tree are [`OperatorId::NoOp`].
pub(crate) fn classify(span: &[u8]) -> OperatorId {
    let Some(&first) = span.first() else {
        return OperatorId::NoOp;
    };

    match first.to_ascii_lowercase() {
        b'a' => match span {
            [_, b'b', b's'] => OperatorId::Abs,
            [_, b'd', b'd'] => OperatorId::Add,
            [_, b'n', b'd'] => OperatorId::And,
            [_, b't', b'a', b'n'] => OperatorId::Atan,
            _ => OperatorId::NoOp,
        },
        b'b' => match span {
            [_, b'i', b't', b's', b'h', b'i', b'f', b't'] => OperatorId::Bitshift,
            _ => OperatorId::NoOp,
        },
        b'c' => classify_c(span),
        b'd' => match span {
            [_, b'i', b'v'] => OperatorId::Div,
            [_, b'u', b'p'] => OperatorId::Dup,
            _ => OperatorId::NoOp,
        },
        b'e' => match span {
            [_, b'q'] => OperatorId::Eq,
            [_, b'x', b'p'] => OperatorId::Exp,
            [_, b'x', b'c', b'h'] => OperatorId::Exch,
            _ => OperatorId::NoOp,
        },
        b'f' => match span {
            [_, b'l', b'o', b'o', b'r'] => OperatorId::Floor,
            _ => OperatorId::NoOp,
        },
        b'g' => match span {
            [_, b'e'] => OperatorId::Ge,
            [_, b't'] => OperatorId::Gt,
            _ => OperatorId::NoOp,
        },
        b'i' => classify_i(span),
        b'l' => match span {
            [_, b'e'] => OperatorId::Le,
            [_, b'n'] => OperatorId::Ln,
            [_, b't'] => OperatorId::Lt,
            [_, b'o', b'g'] => OperatorId::Log,
            _ => OperatorId::NoOp,
        },
        b'm' => match span {
            [_, b'o', b'd'] => OperatorId::Mod,
            [_, b'u', b'l'] => OperatorId::Mul,
            _ => OperatorId::NoOp,
        },
        b'n' => match span {
            [_, b'e'] => OperatorId::Ne,
            [_, b'e', b'g'] => OperatorId::Neg,
            [_, b'o', b't'] => OperatorId::Not,
            _ => OperatorId::NoOp,
        },
        b'o' => match span {
            [_, b'r'] => OperatorId::Or,
            _ => OperatorId::NoOp,
        },
        b'p' => match span {
            [_, b'o', b'p'] => OperatorId::Pop,
            _ => OperatorId::NoOp,
        },
        b'r' => match span {
            [_, b'o', b'l', b'l'] => OperatorId::Roll,
            [_, b'o', b'u', b'n', b'd'] => OperatorId::Round,
            _ => OperatorId::NoOp,
        },
        b's' => match span {
            [_, b'i', b'n'] => OperatorId::Sin,
            [_, b'u', b'b'] => OperatorId::Sub,
            [_, b'q', b'r', b't'] => OperatorId::Sqrt,
            _ => OperatorId::NoOp,
        },
        b't' => match span {
            [_, b'r', b'u', b'n', b'c', b'a', b't', b'e'] => OperatorId::Truncate,
            _ => OperatorId::NoOp,
        },
        b'x' => match span {
            [_, b'o', b'r'] => OperatorId::Xor,
            _ => OperatorId::NoOp,
        },
        b'{' if span.len() == 1 => OperatorId::ProcedureStart,
        b'}' if span.len() == 1 => OperatorId::ProcedureEnd,
        _ => OperatorId::NoOp,
    }
}

/// `ceiling`, `copy`, `cos`, `cvi` and `cvr`
fn classify_c(span: &[u8]) -> OperatorId {
    match span.len() {
        3 => match (span[1], span[2]) {
            (b'o', b's') => OperatorId::Cos,
            (b'v', b'i') => OperatorId::Cvi,
            (b'v', b'r') => OperatorId::Cvr,
            _ => OperatorId::NoOp,
        },
        4 => match span {
            [_, b'o', b'p', b'y'] => OperatorId::Copy,
            _ => OperatorId::NoOp,
        },
        7 => match span {
            [_, b'e', b'i', b'l', b'i', b'n', b'g'] => OperatorId::Ceiling,
            _ => OperatorId::NoOp,
        },
        _ => OperatorId::NoOp,
    }
}

/// `idiv`, `if`, `ifelse` and `index`
fn classify_i(span: &[u8]) -> OperatorId {
    match span.len() {
        2 if span[1] == b'f' => OperatorId::If,
        4 => match span {
            [_, b'd', b'i', b'v'] => OperatorId::Idiv,
            _ => OperatorId::NoOp,
        },
        5 => match span {
            [_, b'n', b'd', b'e', b'x'] => OperatorId::Index,
            _ => OperatorId::NoOp,
        },
        6 => match span {
            [_, b'f', b'e', b'l', b's', b'e'] => OperatorId::IfElse,
            _ => OperatorId::NoOp,
        },
        _ => OperatorId::NoOp,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_operator_name_round_trips() {
        for op in OperatorId::ALL {
            if op == OperatorId::NoOp {
                continue;
            }

            assert_eq!(classify(op.as_str().as_bytes()), op, "{}", op);
        }
    }

    #[test]
    fn first_byte_is_case_insensitive() {
        assert_eq!(classify(b"Add"), OperatorId::Add);
        assert_eq!(classify(b"IFELSE".as_slice()), OperatorId::NoOp);
        assert_eq!(classify(b"Ifelse"), OperatorId::IfElse);
    }

    #[test]
    fn unknown_names_are_noop() {
        let names: [&[u8]; 10] = [
            b"",
            b"a",
            b"adx",
            b"ceilings",
            b"cvx",
            b"def",
            b"true",
            b"nop",
            b"{{",
            b"\xff",
        ];

        for name in names {
            assert_eq!(classify(name), OperatorId::NoOp, "{:?}", name);
        }
    }

    #[test]
    fn prefixes_of_operators_are_noop() {
        assert_eq!(classify(b"ife"), OperatorId::NoOp);
        assert_eq!(classify(b"trunc"), OperatorId::NoOp);
        assert_eq!(classify(b"i"), OperatorId::NoOp);
    }
}
