pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod token;

pub use ast::{Expr, Program, Stmt};
pub use lexer::Lexer;
pub use object::Object;
pub use token::{Token, TokenKind};
