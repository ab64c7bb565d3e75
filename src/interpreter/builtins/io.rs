//! Output built-in functions.

use super::super::error::RuntimeError;
use crate::object::Object;
use std::io::Write;

/// Writes each argument's display form on its own line.
pub fn builtin_puts(args: &[Object], out: &mut dyn Write) -> Result<Object, RuntimeError> {
    for arg in args {
        writeln!(out, "{}", arg).map_err(|e| RuntimeError::Output(e.to_string()))?;
    }
    out.flush().map_err(|e| RuntimeError::Output(e.to_string()))?;
    Ok(Object::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puts_writes_lines() {
        let mut out = Vec::new();
        let result = builtin_puts(&[Object::string("hello"), Object::Integer(5)], &mut out);
        assert_eq!(result, Ok(Object::Null));
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n5\n");
    }

    #[test]
    fn test_puts_without_arguments() {
        let mut out = Vec::new();
        assert_eq!(builtin_puts(&[], &mut out), Ok(Object::Null));
        assert!(out.is_empty());
    }
}
