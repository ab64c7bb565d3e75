//! Array built-in functions. None of them mutate their input.

use super::super::error::RuntimeError;
use super::{require_args, with_array};
use crate::object::Object;
use std::rc::Rc;

pub fn builtin_first(args: &[Object]) -> Result<Object, RuntimeError> {
    require_args!(args, 1);
    with_array!(args, "first", |elements: &Rc<Vec<Object>>| {
        Ok(elements.first().cloned().unwrap_or(Object::Null))
    })
}

pub fn builtin_last(args: &[Object]) -> Result<Object, RuntimeError> {
    require_args!(args, 1);
    with_array!(args, "last", |elements: &Rc<Vec<Object>>| {
        Ok(elements.last().cloned().unwrap_or(Object::Null))
    })
}

pub fn builtin_rest(args: &[Object]) -> Result<Object, RuntimeError> {
    require_args!(args, 1);
    with_array!(args, "rest", |elements: &Rc<Vec<Object>>| {
        if elements.is_empty() {
            Ok(Object::Null)
        } else {
            Ok(Object::array(elements[1..].to_vec()))
        }
    })
}

pub fn builtin_push(args: &[Object]) -> Result<Object, RuntimeError> {
    require_args!(args, 2);
    with_array!(args, "push", |elements: &Rc<Vec<Object>>| {
        let mut pushed = Vec::with_capacity(elements.len() + 1);
        pushed.extend(elements.iter().cloned());
        pushed.push(args[1].clone());
        Ok(Object::array(pushed))
    })
}
