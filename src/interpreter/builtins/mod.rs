//! Built-in functions of the Monkey interpreter.
//!
//! The table is fixed and read-only; identifiers fall back to it after the environment
//! chain is searched.
//! - **Array**: `first`, `last`, `rest`, `push`
//! - **Misc**: `len`
//! - **IO**: `puts`

mod array;
mod io;
mod misc;

pub use array::*;
pub use io::*;
pub use misc::*;

use super::error::RuntimeError;
use crate::object::Object;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    First,
    Last,
    Rest,
    Push,
    Puts,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Len,
        Builtin::First,
        Builtin::Last,
        Builtin::Rest,
        Builtin::Push,
        Builtin::Puts,
    ];

    pub fn lookup(name: &str) -> Option<Builtin> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Len => "len",
            Builtin::First => "first",
            Builtin::Last => "last",
            Builtin::Rest => "rest",
            Builtin::Push => "push",
            Builtin::Puts => "puts",
        }
    }

    /// Invokes the builtin. Only `puts` touches `out`.
    pub fn call(self, args: &[Object], out: &mut dyn Write) -> Result<Object, RuntimeError> {
        match self {
            Builtin::Len => builtin_len(args),
            Builtin::First => builtin_first(args),
            Builtin::Last => builtin_last(args),
            Builtin::Rest => builtin_rest(args),
            Builtin::Push => builtin_push(args),
            Builtin::Puts => builtin_puts(args, out),
        }
    }
}

macro_rules! require_args {
    ($args:expr, $n:expr) => {
        if $args.len() != $n {
            return Err(RuntimeError::WrongArgumentCount {
                got: $args.len(),
                want: $n,
            });
        }
    };
}

macro_rules! with_array {
    ($args:expr, $name:expr, $body:expr) => {
        match &$args[0] {
            Object::Array(elements) => $body(elements),
            other => Err(RuntimeError::ArgumentNotArray {
                builtin: $name,
                got: other.object_type(),
            }),
        }
    };
}

pub(crate) use require_args;
pub(crate) use with_array;
