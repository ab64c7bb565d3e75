use crate::ast::{BinaryOp, BlockStmt, Expr, FunctionLiteral, Program, Stmt, UnaryOp};
use crate::diagnostic::Diagnostic;
use crate::object::{Function, HashPair, HashPairs, Object};
use super::builtins::Builtin;
use super::control_flow::{ControlFlow, EvalResult};
use super::environment::Environment;
use super::error::RuntimeError;
use super::parser::{parse, ParseError};
use std::io::{self, Write};
use std::rc::Rc;

/// Tree-walking evaluator. `puts` output goes to `out`.
pub struct Evaluator<W: Write> {
    out: W,
}

impl<W: Write> Evaluator<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Evaluates every statement and returns the value of the last one. A top-level
    /// `return` ends the program with its value; a runtime error becomes `Object::Error`.
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> Object {
        match self.eval_statements(&program.statements, env) {
            Ok(value) | Err(ControlFlow::Return(value)) => value,
            Err(ControlFlow::Error(err)) => Object::Error(err),
        }
    }

    fn eval_statements(&mut self, statements: &[Stmt], env: &Environment) -> EvalResult {
        let mut result = Object::Null;
        for statement in statements {
            result = self.eval_statement(statement, env)?;
        }
        Ok(result)
    }

    fn eval_block(&mut self, block: &BlockStmt, env: &Environment) -> EvalResult {
        self.eval_statements(&block.statements, env)
    }

    fn eval_statement(&mut self, statement: &Stmt, env: &Environment) -> EvalResult {
        match statement {
            Stmt::Let { name, value } => {
                let value = self.eval_expression(value, env)?;
                env.set(name.to_string(), value);
                Ok(Object::Null)
            }
            Stmt::Return(value) => {
                let value = self.eval_expression(value, env)?;
                Err(ControlFlow::Return(value))
            }
            Stmt::Expr(expr) => self.eval_expression(expr, env),
        }
    }

    fn eval_expression(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Identifier(name) => Ok(eval_identifier(name, env)?),
            Expr::Integer(value) => Ok(Object::Integer(*value)),
            Expr::Boolean(value) => Ok(Object::Boolean(*value)),
            Expr::String(value) => Ok(Object::String(Rc::clone(value))),

            Expr::Array(elements) => {
                let elements = self.eval_expressions(elements, env)?;
                Ok(Object::array(elements))
            }

            Expr::Hash(pairs) => self.eval_hash_literal(pairs, env),

            Expr::Unary { op, expr } => {
                let operand = self.eval_expression(expr, env)?;
                Ok(eval_prefix(*op, operand)?)
            }

            Expr::Binary { left, op, right } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Ok(eval_infix(*op, &left, &right)?)
            }

            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition, env)?;
                if condition.is_truthy() {
                    self.eval_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env)
                } else {
                    Ok(Object::Null)
                }
            }

            Expr::Function(FunctionLiteral { params, body }) => {
                Ok(Object::Function(Rc::new(Function {
                    params: Rc::clone(params),
                    body: Rc::clone(body),
                    env: env.clone(),
                })))
            }

            Expr::Call { function, args } => {
                let function = self.eval_expression(function, env)?;
                let args = self.eval_expressions(args, env)?;
                self.apply_function(&function, args)
            }

            Expr::Index { left, index } => {
                let left = self.eval_expression(left, env)?;
                let index = self.eval_expression(index, env)?;
                Ok(eval_index(&left, &index)?)
            }
        }
    }

    /// Evaluates left to right, stopping at the first error.
    fn eval_expressions(&mut self, exprs: &[Expr], env: &Environment) -> Result<Vec<Object>, ControlFlow> {
        exprs
            .iter()
            .map(|expr| self.eval_expression(expr, env))
            .collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)], env: &Environment) -> EvalResult {
        let mut map = HashPairs::with_capacity(pairs.len());
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr, env)?;
            let hash_key = key
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey(key.object_type()))?;
            let value = self.eval_expression(value_expr, env)?;
            map.insert(hash_key, HashPair { key, value });
        }
        Ok(Object::Hash(Rc::new(map)))
    }

    fn apply_function(&mut self, function: &Object, args: Vec<Object>) -> EvalResult {
        match function {
            Object::Function(function) => {
                if args.len() != function.params.len() {
                    return Err(RuntimeError::WrongArgumentCount {
                        got: args.len(),
                        want: function.params.len(),
                    }
                    .into());
                }

                let call_env = Environment::enclosed(Rc::new(function.env.clone()));
                for (param, arg) in function.params.iter().zip(args) {
                    call_env.set(param.to_string(), arg);
                }

                match self.eval_block(&function.body, &call_env) {
                    Ok(value) | Err(ControlFlow::Return(value)) => Ok(value),
                    Err(err) => Err(err),
                }
            }
            Object::Builtin(builtin) => Ok(builtin.call(&args, &mut self.out)?),
            other => Err(RuntimeError::NotAFunction(other.object_type()).into()),
        }
    }
}

fn eval_identifier(name: &Rc<str>, env: &Environment) -> Result<Object, RuntimeError> {
    env.get(name)
        .or_else(|| Builtin::lookup(name).map(Object::Builtin))
        .ok_or_else(|| RuntimeError::IdentifierNotFound(Rc::clone(name)))
}

fn eval_prefix(op: UnaryOp, operand: Object) -> Result<Object, RuntimeError> {
    match (op, operand) {
        (UnaryOp::Not, operand) => Ok(Object::Boolean(!operand.is_truthy())),
        (UnaryOp::Neg, Object::Integer(value)) => Ok(Object::Integer(value.wrapping_neg())),
        (UnaryOp::Neg, operand) => Err(RuntimeError::UnknownPrefixOperator {
            op,
            operand: operand.object_type(),
        }),
    }
}

fn eval_infix(op: BinaryOp, left: &Object, right: &Object) -> Result<Object, RuntimeError> {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(op, *l, *r),
        (Object::String(l), Object::String(r)) => match op {
            BinaryOp::Add => Ok(Object::String(Rc::from(format!("{}{}", l, r)))),
            BinaryOp::Eq => Ok(Object::Boolean(l == r)),
            BinaryOp::NotEq => Ok(Object::Boolean(l != r)),
            _ => Err(unknown_operator(op, left, right)),
        },
        (Object::Boolean(_) | Object::Null, Object::Boolean(_) | Object::Null)
            if matches!(op, BinaryOp::Eq | BinaryOp::NotEq) =>
        {
            let equal = left == right;
            Ok(Object::Boolean(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        _ if left.object_type() != right.object_type() => Err(RuntimeError::TypeMismatch {
            left: left.object_type(),
            op,
            right: right.object_type(),
        }),
        _ => Err(unknown_operator(op, left, right)),
    }
}

fn unknown_operator(op: BinaryOp, left: &Object, right: &Object) -> RuntimeError {
    RuntimeError::UnknownInfixOperator {
        left: left.object_type(),
        op,
        right: right.object_type(),
    }
}

fn eval_integer_infix(op: BinaryOp, l: i64, r: i64) -> Result<Object, RuntimeError> {
    let result = match op {
        BinaryOp::Add => Object::Integer(l.wrapping_add(r)),
        BinaryOp::Sub => Object::Integer(l.wrapping_sub(r)),
        BinaryOp::Mul => Object::Integer(l.wrapping_mul(r)),
        BinaryOp::Div => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Object::Integer(l.wrapping_div(r))
        }
        BinaryOp::Less => Object::Boolean(l < r),
        BinaryOp::Greater => Object::Boolean(l > r),
        BinaryOp::Eq => Object::Boolean(l == r),
        BinaryOp::NotEq => Object::Boolean(l != r),
    };
    Ok(result)
}

fn eval_index(left: &Object, index: &Object) -> Result<Object, RuntimeError> {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null)),
        (Object::Hash(pairs), key) => {
            let hash_key = key
                .hash_key()
                .ok_or_else(|| RuntimeError::UnusableHashKey(key.object_type()))?;
            Ok(pairs
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null))
        }
        _ => Err(RuntimeError::IndexNotSupported(left.object_type())),
    }
}

/// Evaluates `program` in `env`, writing `puts` output to stdout.
pub fn eval(program: &Program, env: &Environment) -> Object {
    Evaluator::new(io::stdout()).eval_program(program, env)
}

/// Parses and evaluates `source`. Parse errors prevent evaluation entirely.
pub fn parse_and_run(source: &str, env: &Environment) -> Result<Object, Vec<ParseError>> {
    let (program, errors) = parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(eval(&program, env))
}

/// Like [`parse_and_run`], but reports parse and runtime errors as diagnostics.
pub fn parse_and_run_with_diagnostics(
    source: &str,
    env: &Environment,
) -> Result<Object, Vec<Diagnostic>> {
    match parse_and_run(source, env) {
        Ok(Object::Error(err)) => Err(vec![err.to_diagnostic()]),
        Ok(value) => Ok(value),
        Err(errors) => Err(errors.iter().map(|e| e.to_diagnostic()).collect()),
    }
}
