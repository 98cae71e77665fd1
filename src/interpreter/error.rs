use thiserror::Error;

/// Everything a token can fail with. None of these stop the interpreter: the
/// driver shows the message and moves on to the next token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PSError {
    #[error("undefined: '{0}' not found")]
    UnresolvedName(String),

    #[error("stackunderflow: '{op}' needs {needed} operand(s), found {found}")]
    StackUnderflow {
        op: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("typecheck: operand types not supported by '{op}'")]
    TypeMismatch { op: &'static str },

    #[error("undefinedresult: division by zero in '{op}'")]
    DivideByZero { op: &'static str },

    #[error("rangecheck: operand out of range in '{op}'")]
    RangeCheck { op: &'static str },

    #[error("rangecheck: putinterval source does not fit in destination")]
    IntervalOverflow,

    #[error("execstackoverflow: blocks nested deeper than {0}")]
    RecursionLimit(usize),

    #[error("stackunderflow: operand stack is empty")]
    EmptyStack,
}

pub type PSResult<T> = Result<T, PSError>;
