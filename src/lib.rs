//! An interpreter for PDF type 4 functions, the restricted subset of PostScript
//! used by shadings and tint transforms.
//!
//! ```ignore
//! let outputs = pdf_calculator::evaluate(b"{ 2 mul 1 exch sub }", &[0.25])?;
//! ```

#[macro_use]
extern crate pdf_macro;

pub use crate::{
    error::{PostScriptError, PostScriptResult},
    function::{
        postscript_calculator::{
            evaluate, evaluate_stream, replay, CalculatorOptions, Instruction, OperandStack,
            OperatorId, Procedure, ProcedureHandle, TruncatedInputPolicy, UnknownTokenPolicy,
            Value,
        },
        Function,
    },
};

mod error;
pub mod function;
mod lex;
