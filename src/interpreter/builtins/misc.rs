use super::super::error::RuntimeError;
use super::require_args;
use crate::object::Object;

/// Length of a string in Unicode scalar values, or the element count of an array.
pub fn builtin_len(args: &[Object]) -> Result<Object, RuntimeError> {
    require_args!(args, 1);
    let len = match &args[0] {
        Object::String(s) => s.chars().count(),
        Object::Array(elements) => elements.len(),
        other => {
            return Err(RuntimeError::UnsupportedArgument {
                builtin: "len",
                got: other.object_type(),
            })
        }
    };
    Ok(Object::Integer(len as i64))
}
