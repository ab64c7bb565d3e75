//! Syntax tree produced by the parser.
//!
//! Every node implements `Display` as a canonical re-serialization: prefix and infix
//! operations are fully parenthesized, so the output re-parses to an identical tree.

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    NotEq,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { name: Rc<str>, value: Expr },
    Return(Expr),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
}

/// Function literal; the body sits behind an `Rc` so closures can share it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Rc<[Rc<str>]>,
    pub body: Rc<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Rc<str>),
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Array(Vec<Expr>),
    Hash(Vec<(Expr, Expr)>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: BlockStmt,
        alternative: Option<BlockStmt>,
    },
    Function(FunctionLiteral),
    Call {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

/// Writes statements separated by spaces. Expression statements that are not last get
/// a `;` so that adjacent expressions cannot fuse when re-parsed.
pub(crate) fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Stmt]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", stmt)?;
        if matches!(stmt, Stmt::Expr(_)) && i + 1 < statements.len() {
            f.write_str(";")?;
        }
    }
    Ok(())
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value } => write!(f, "let {} = {};", name, value),
            Stmt::Return(value) => write!(f, "return {};", value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        write_statements(f, &self.statements)?;
        f.write_str(" }")
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_list(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::Integer(value) => write!(f, "{}", value),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::String(value) => write!(f, "\"{}\"", value),
            Expr::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            Expr::Hash(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Expr::Unary { op, expr } => write!(f, "({}{})", op, expr),
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            Expr::Function(literal) => write!(f, "{}", literal),
            Expr::Call { function, args } => {
                write!(f, "{}(", function)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}
