/// The operators permitted in a type 4 function, plus the procedure braces and
/// a sentinel for names the calculator does not know.
///
/// The discriminant of each variant indexes the operator registry.
#[pdf_enum]
pub enum OperatorId {
    // Arithmetic
    /// num1 `abs` num2
    Abs = "abs",

    /// num1 num2 `add` sum
    Add = "add",

    /// returns the angle (in degrees between 0 and 360) whose tangent is num/den
    ///
    /// num den `atan` angle
    Atan = "atan",

    /// num1 `ceiling` num2
    Ceiling = "ceiling",

    /// returns the cosine of angle, which is interpreted as an angle in degrees
    ///
    /// angle `cos` real
    Cos = "cos",

    /// num `cvi` int
    Cvi = "cvi",

    /// num `cvr` real
    Cvr = "cvr",

    /// divides num1 by num2, producing a result that is always a real number
    ///
    /// num1 num2 `div` quotient
    Div = "div",

    /// raises base to the exponent power
    ///
    /// base exponent `exp` real
    Exp = "exp",

    /// num1 `floor` num2
    Floor = "floor",

    /// divides int1 by int2 and returns the integer part of the quotient, with any
    /// fractional part discarded
    ///
    /// int1 int2 `idiv` quotient
    Idiv = "idiv",

    /// num `ln` real
    Ln = "ln",

    /// num `log` real
    Log = "log",

    /// returns the remainder that results from dividing int1 by int2. The sign of
    /// the result is the same as the sign of the dividend int1
    ///
    /// int1 int2 `mod` remainder
    Mod = "mod",

    /// num1 num2 `mul` product
    Mul = "mul",

    /// num1 `neg` num2
    Neg = "neg",

    /// returns the integer value nearest to num1. If num1 is equally close to its
    /// two nearest integers, round returns the greater of the two
    ///
    /// num1 `round` num2
    Round = "round",

    /// angle `sin` real
    Sin = "sin",

    /// num `sqrt` real
    Sqrt = "sqrt",

    /// num1 num2 `sub` difference
    Sub = "sub",

    /// truncates num1 toward 0 by removing its fractional part
    ///
    /// num1 `truncate` num2
    Truncate = "truncate",

    // Relational, boolean, and bitwise
    /// bool1|int1 bool2|int2 `and` bool3|int3
    And = "and",

    /// shifts the binary representation of int1 left by shift bits and returns the
    /// result. Bits shifted out are lost; bits shifted in are 0. If shift is
    /// negative, a right shift by -shift bits is performed
    ///
    /// int1 shift `bitshift` int2
    Bitshift = "bitshift",

    /// any1 any2 `eq` bool
    Eq = "eq",

    /// num1 num2 `ge` bool
    Ge = "ge",

    /// num1 num2 `gt` bool
    Gt = "gt",

    /// num1 num2 `le` bool
    Le = "le",

    /// num1 num2 `lt` bool
    Lt = "lt",

    /// any1 any2 `ne` bool
    Ne = "ne",

    /// bool1|int1 `not` bool2|int2
    Not = "not",

    /// bool1|int1 bool2|int2 `or` bool3|int3
    Or = "or",

    /// bool1|int1 bool2|int2 `xor` bool3|int3
    Xor = "xor",

    // Conditional
    /// bool proc `if` –
    If = "if",

    /// bool proc1 proc2 `ifelse` –
    IfElse = "ifelse",

    // Stack
    /// any1 ... anyn n `copy` any1 ... anyn any1 ... anyn
    Copy = "copy",

    /// any `dup` any any
    Dup = "dup",

    /// any1 any2 `exch` any2 any1
    Exch = "exch",

    /// anyn ... any0 n `index` anyn ... any0 anyn
    Index = "index",

    /// any `pop` –
    Pop = "pop",

    /// performs a circular shift of the objects anyn-1 through any0 on the operand
    /// stack by amount j. Positive j indicates upward motion on the stack, whereas
    /// negative j indicates downward motion
    ///
    /// anyn-1 ... any0 n j `roll` any(j-1) mod n ... any0 anyn-1 ... anyj mod n
    Roll = "roll",

    // Structure
    ProcedureStart = "{",
    ProcedureEnd = "}",

    /// Any name that is not a type 4 operator. Has no effect on the stack
    NoOp = "nop",
}
