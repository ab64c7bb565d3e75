use super::error::RuntimeError;
use crate::object::Object;

/// Signals that unwind evaluation. A `return` stops at the nearest function call (or the
/// program), an error travels all the way to the top.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for ControlFlow {
    fn from(err: RuntimeError) -> Self {
        ControlFlow::Error(err)
    }
}

pub type EvalResult = Result<Object, ControlFlow>;
