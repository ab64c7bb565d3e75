use crate::ast::{BinaryOp, UnaryOp};
use crate::diagnostic::Diagnostic;
use crate::object::ObjectType;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    TypeMismatch {
        left: ObjectType,
        op: BinaryOp,
        right: ObjectType,
    },
    UnknownInfixOperator {
        left: ObjectType,
        op: BinaryOp,
        right: ObjectType,
    },
    UnknownPrefixOperator {
        op: UnaryOp,
        operand: ObjectType,
    },
    IdentifierNotFound(Rc<str>),
    NotAFunction(ObjectType),
    IndexNotSupported(ObjectType),
    UnusableHashKey(ObjectType),
    WrongArgumentCount {
        got: usize,
        want: usize,
    },
    UnsupportedArgument {
        builtin: &'static str,
        got: ObjectType,
    },
    ArgumentNotArray {
        builtin: &'static str,
        got: ObjectType,
    },
    DivisionByZero,
    Output(String),
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "E0201",
            Self::UnknownInfixOperator { .. } | Self::UnknownPrefixOperator { .. } => "E0202",
            Self::IdentifierNotFound(_) => "E0203",
            Self::NotAFunction(_) => "E0204",
            Self::IndexNotSupported(_) => "E0205",
            Self::UnusableHashKey(_) => "E0206",
            Self::WrongArgumentCount { .. } => "E0207",
            Self::UnsupportedArgument { .. } | Self::ArgumentNotArray { .. } => "E0208",
            Self::DivisionByZero => "E0209",
            Self::Output(_) => "E0210",
        }
    }

    /// Convert to a diagnostic for pretty printing. Evaluation has no source positions,
    /// so only the header and an occasional hint are produced.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            Self::IdentifierNotFound(_) => {
                diag.with_note("help: bind it first with `let`")
            }
            Self::UnusableHashKey(_) => {
                diag.with_note("only INTEGER, BOOLEAN and STRING values can be hash keys")
            }
            _ => diag,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::TypeMismatch { left, op, right } => {
                write!(f, "type mismatch: {} {} {}", left, op, right)
            }
            RuntimeError::UnknownInfixOperator { left, op, right } => {
                write!(f, "unknown operator: {} {} {}", left, op, right)
            }
            RuntimeError::UnknownPrefixOperator { op, operand } => {
                write!(f, "unknown operator: {}{}", op, operand)
            }
            RuntimeError::IdentifierNotFound(name) => write!(f, "identifier not found: {}", name),
            RuntimeError::NotAFunction(t) => write!(f, "not a function: {}", t),
            RuntimeError::IndexNotSupported(t) => write!(f, "index operator not supported: {}", t),
            RuntimeError::UnusableHashKey(t) => write!(f, "unusable as hash key: {}", t),
            RuntimeError::WrongArgumentCount { got, want } => {
                write!(f, "wrong number of arguments. got={}, want={}", got, want)
            }
            RuntimeError::UnsupportedArgument { builtin, got } => {
                write!(f, "argument to `{}` not supported, got {}", builtin, got)
            }
            RuntimeError::ArgumentNotArray { builtin, got } => {
                write!(f, "argument to `{}` must be ARRAY, got {}", builtin, got)
            }
            RuntimeError::DivisionByZero => write!(f, "division by zero"),
            RuntimeError::Output(reason) => write!(f, "could not write output: {}", reason),
        }
    }
}

impl std::error::Error for RuntimeError {}
