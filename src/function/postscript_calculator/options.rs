/// What to do with a name that is not a type 4 operator, or a number that
/// does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTokenPolicy {
    /// Treat the token as an operator with no effect on the stack
    #[default]
    Lenient,

    /// Fail the evaluation with `undefined` (or `syntaxerror` for numbers)
    Strict,
}

/// What to do when the stream ends before every `{` has been closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncatedInputPolicy {
    /// Stop and return whatever is on the operand stack. Procedures that were
    /// still open are closed where the stream ended, so the outermost of them
    /// is left on the operand stack
    #[default]
    Tolerate,

    /// Fail the evaluation
    Fail,
}

/// Limits and leniency settings for evaluating a calculator function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorOptions {
    pub unknown_tokens: UnknownTokenPolicy,
    pub on_truncated_input: TruncatedInputPolicy,

    /// Maximum operand stack depth. PDF limits type 4 functions to 100 entries
    pub max_stack_depth: Option<usize>,

    /// Maximum number of open `{`, counting the braces around the function
    /// body. Deeper nesting is a `limitcheck`
    pub max_nesting_depth: usize,

    /// Size of the buffer the function body is read through. No single token
    /// may be longer than this
    pub buffer_capacity: usize,
}

impl CalculatorOptions {
    /// Operand stack limit for type 4 functions
    pub const PDF_STACK_LIMIT: usize = 100;

    /// Nesting limit, after the PostScript execution stack limit of 250
    pub const NESTING_LIMIT: usize = 250;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects unknown operators, malformed numbers, stray braces, and
    /// truncated bodies
    pub fn strict() -> Self {
        Self {
            unknown_tokens: UnknownTokenPolicy::Strict,
            on_truncated_input: TruncatedInputPolicy::Fail,
            ..Self::default()
        }
    }

    pub fn with_max_stack_depth(mut self, max_stack_depth: Option<usize>) -> Self {
        self.max_stack_depth = max_stack_depth;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            unknown_tokens: UnknownTokenPolicy::default(),
            on_truncated_input: TruncatedInputPolicy::default(),
            max_stack_depth: Some(Self::PDF_STACK_LIMIT),
            max_nesting_depth: Self::NESTING_LIMIT,
            buffer_capacity: 256,
        }
    }
}
