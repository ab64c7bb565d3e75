use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{write_statements, BlockStmt};
use crate::interpreter::builtins::Builtin;
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;

/// Runtime type tag, as it appears in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Error => "ERROR",
        })
    }
}

/// Key of a hash object. The type tag is part of the key so `1` and `true` stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

/// Original key object kept next to the value so hashes can be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub type HashPairs = IndexMap<HashKey, HashPair>;

#[derive(Clone)]
pub struct Function {
    pub params: Rc<[Rc<str>]>,
    pub body: Rc<BlockStmt>,
    pub env: Environment,
}

// The captured environment may contain this very function.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashPairs>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Null,
    Error(RuntimeError),
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            (Object::Hash(a), Object::Hash(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Object {
    pub fn string(s: &str) -> Self {
        Object::String(Rc::from(s))
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(elements))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Null => ObjectType::Null,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Returns `None` for objects that cannot be used as hash keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(i) => *i as u64,
            Object::Boolean(b) => u64::from(*b),
            Object::String(s) => fnv1a(s.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            object_type: self.object_type(),
            value,
        })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(i) => write!(f, "{}", i),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => f.write_str(s),
            Object::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Object::Hash(pairs) => {
                f.write_str("{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_str("}")
            }
            Object::Function(function) => {
                writeln!(f, "fn({}) {{", function.params.join(", "))?;
                write_statements(f, &function.body.statements)?;
                f.write_str("\n}")
            }
            Object::Builtin(_) => f.write_str("builtin function"),
            Object::Null => f.write_str("null"),
            Object::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}
