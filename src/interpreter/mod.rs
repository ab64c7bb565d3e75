pub mod parser;
pub mod environment;
pub mod error;
pub mod control_flow;
pub mod builtins;
pub mod evaluator;

pub use error::RuntimeError;
pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use parser::{parse, ParseError, Parser};
pub use evaluator::{eval, parse_and_run, parse_and_run_with_diagnostics, Evaluator};
