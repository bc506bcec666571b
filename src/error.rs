use std::{borrow::Cow, fmt};

pub type PostScriptResult<T> = anyhow::Result<T>;

/*
PostScript Language Reference page 523, restricted to the errors a type 4 function can raise

limitcheck Implementation limit exceeded
rangecheck Operand out of bounds
stackoverflow Operand stack overflow
stackunderflow Operand stack underflow
syntaxerror PostScript language syntax error
typecheck Operand of wrong type
undefined Name not known
undefinedresult Overflow, underflow, or meaningless result
*/

#[derive(Debug)]
pub enum PostScriptError {
    /// PostScript language syntax error
    SyntaxError(Cow<'static, str>),

    /// Operand stack overflow
    StackOverflow,

    /// Operand stack underflow
    StackUnderflow,

    /// Operand of wrong type
    TypeCheck,

    /// Operand out of bounds
    RangeCheck,

    /// Overflow, underflow, or meaningless result
    UndefinedResult,

    /// Implementation limit exceeded
    LimitCheck,

    /// Name not known
    Undefined { name: String },

    /// The stream ended while `depth` procedures were still open
    TruncatedInput { depth: usize },
}

impl fmt::Display for PostScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyntaxError(msg) => write!(f, "syntaxerror: {}", msg),
            Self::StackOverflow => f.write_str("stackoverflow"),
            Self::StackUnderflow => f.write_str("stackunderflow"),
            Self::TypeCheck => f.write_str("typecheck"),
            Self::RangeCheck => f.write_str("rangecheck"),
            Self::UndefinedResult => f.write_str("undefinedresult"),
            Self::LimitCheck => f.write_str("limitcheck"),
            Self::Undefined { name } => write!(f, "undefined: {:?}", name),
            Self::TruncatedInput { depth } => {
                write!(f, "stream ended inside {} unclosed procedure(s)", depth)
            }
        }
    }
}

impl std::error::Error for PostScriptError {}
