use crate::ast::{BinaryOp, BlockStmt, Expr, FunctionLiteral, Program, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken,
    MissingPrefix,
    InvalidInteger,
    IllegalToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn unexpected(expected: TokenKind, found: &Token) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken,
            message: format!(
                "expected next token to be {}, got {} instead",
                expected, found.kind
            ),
            span: found.span,
        }
    }

    fn missing_prefix(token: &Token) -> Self {
        Self {
            kind: ParseErrorKind::MissingPrefix,
            message: format!("no prefix parse function for {} found", token.kind),
            span: token.span,
        }
    }

    fn invalid_integer(token: &Token) -> Self {
        Self {
            kind: ParseErrorKind::InvalidInteger,
            message: format!("could not parse \"{}\" as integer", token.literal),
            span: token.span,
        }
    }

    fn illegal_token(token: &Token) -> Self {
        Self {
            kind: ParseErrorKind::IllegalToken,
            message: format!("illegal token \"{}\"", token.literal),
            span: token.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, label) = match self.kind {
            ParseErrorKind::UnexpectedToken => ("E0101", "unexpected token"),
            ParseErrorKind::MissingPrefix => ("E0102", "expected an expression"),
            ParseErrorKind::InvalidInteger => ("E0103", "does not fit in a 64-bit integer"),
            ParseErrorKind::IllegalToken => ("E0104", "not valid here"),
        };

        let diag = Diagnostic::error(self.message.clone())
            .with_code(code)
            .with_label(Label::primary(self.span, label));

        // An illegal token starting with a quote is an unterminated string.
        if self.kind == ParseErrorKind::IllegalToken && self.message.starts_with("illegal token \"\"") {
            diag.with_note("help: string literals must be closed with `\"`")
        } else {
            diag
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = Result<T, ParseError>;

/// Binding power of infix operators, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen | TokenKind::LBracket => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> ParseResult<Expr>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expr) -> ParseResult<Expr>;

/// Pratt parser over a [`Lexer`], holding one token of lookahead.
///
/// Parsing is best-effort: a statement that fails is dropped, its error is recorded and
/// the parser resumes at the next statement boundary.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<ParseError>,
    block_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", Span::default());
        let mut parser = Self {
            lexer,
            cur: placeholder.clone(),
            peek: placeholder,
            errors: Vec::new(),
            block_depth: 0,
        };
        parser.next_token();
        parser.next_token();
        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => program.statements.push(stmt),
                Err(err) => {
                    self.add_error(err);
                    self.synchronize();
                }
            }
            self.next_token();
        }
        program
    }

    /// Every token passes through `peek` exactly once, so illegal tokens are reported here.
    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
        if self.peek.is(TokenKind::Illegal) {
            let err = ParseError::illegal_token(&self.peek);
            self.add_error(err);
        }
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.is(kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::unexpected(kind, &self.peek))
        }
    }

    fn add_error(&mut self, error: ParseError) {
        let duplicate = self
            .errors
            .iter()
            .any(|e| e.kind == error.kind && e.span == error.span);
        if !duplicate {
            self.errors.push(error);
        }
    }

    /// Skips to the end of the current statement. Afterwards the caller's `next_token`
    /// lands on the next `let`/`return`, the token after a `;`, the closing `}` of the
    /// enclosing block, or EOF.
    fn synchronize(&mut self) {
        let mut nesting = 0usize;
        while !self.peek_is(TokenKind::Eof) {
            match self.cur.kind {
                TokenKind::LBrace => nesting += 1,
                TokenKind::RBrace => nesting = nesting.saturating_sub(1),
                TokenKind::Semicolon if nesting == 0 => return,
                _ => {}
            }
            if nesting == 0 {
                match self.peek.kind {
                    TokenKind::Let | TokenKind::Return => return,
                    TokenKind::RBrace if self.block_depth > 0 => return,
                    _ => {}
                }
            }
            self.next_token();
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<Stmt> {
        self.expect_peek(TokenKind::Ident)?;
        let name: Rc<str> = Rc::from(self.cur.literal.as_str());
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::Return(value))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Ok(Stmt::Expr(expr))
    }

    /// Parses statements up to the closing `}`, leaving it as the current token.
    /// Statement errors inside the block are recorded and skipped.
    fn parse_block_statement(&mut self) -> ParseResult<BlockStmt> {
        let mut block = BlockStmt::default();
        self.block_depth += 1;
        self.next_token();

        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Ok(stmt) => block.statements.push(stmt),
                Err(err) => {
                    self.add_error(err);
                    self.synchronize();
                }
            }
            self.next_token();
        }

        self.block_depth -= 1;
        if self.cur_is(TokenKind::Eof) {
            return Err(ParseError::unexpected(TokenKind::RBrace, &self.cur));
        }
        Ok(block)
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expr> {
        let prefix = match Self::prefix_parse_fn(self.cur.kind) {
            Some(prefix) => prefix,
            None if self.cur_is(TokenKind::Illegal) => {
                return Err(ParseError::illegal_token(&self.cur))
            }
            None => return Err(ParseError::missing_prefix(&self.cur)),
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind) {
            let infix = match Self::infix_parse_fn(self.peek.kind) {
                Some(infix) => infix,
                None => return Ok(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn prefix_parse_fn(kind: TokenKind) -> Option<PrefixParseFn<'a>> {
        let f: PrefixParseFn<'a> = match kind {
            TokenKind::Ident => Self::parse_identifier,
            TokenKind::Int => Self::parse_integer_literal,
            TokenKind::True | TokenKind::False => Self::parse_boolean,
            TokenKind::String => Self::parse_string_literal,
            TokenKind::Bang | TokenKind::Minus => Self::parse_prefix_expression,
            TokenKind::LParen => Self::parse_grouped_expression,
            TokenKind::If => Self::parse_if_expression,
            TokenKind::Function => Self::parse_function_literal,
            TokenKind::LBracket => Self::parse_array_literal,
            TokenKind::LBrace => Self::parse_hash_literal,
            _ => return None,
        };
        Some(f)
    }

    fn infix_parse_fn(kind: TokenKind) -> Option<InfixParseFn<'a>> {
        let f: InfixParseFn<'a> = match kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Eq
            | TokenKind::NotEq => Self::parse_infix_expression,
            TokenKind::LParen => Self::parse_call_expression,
            TokenKind::LBracket => Self::parse_index_expression,
            _ => return None,
        };
        Some(f)
    }

    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        Ok(Expr::Identifier(Rc::from(self.cur.literal.as_str())))
    }

    fn parse_integer_literal(&mut self) -> ParseResult<Expr> {
        self.cur
            .literal
            .parse::<i64>()
            .map(Expr::Integer)
            .map_err(|_| ParseError::invalid_integer(&self.cur))
    }

    fn parse_boolean(&mut self) -> ParseResult<Expr> {
        Ok(Expr::Boolean(self.cur_is(TokenKind::True)))
    }

    fn parse_string_literal(&mut self) -> ParseResult<Expr> {
        Ok(Expr::String(Rc::from(self.cur.literal.as_str())))
    }

    fn parse_prefix_expression(&mut self) -> ParseResult<Expr> {
        let op = if self.cur_is(TokenKind::Bang) {
            UnaryOp::Not
        } else {
            UnaryOp::Neg
        };
        self.next_token();
        let expr = self.parse_expression(Precedence::Prefix)?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> ParseResult<Expr> {
        let op = match self.cur.kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Asterisk => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Lt => BinaryOp::Less,
            TokenKind::Gt => BinaryOp::Greater,
            TokenKind::Eq => BinaryOp::Eq,
            _ => BinaryOp::NotEq,
        };
        let precedence = Precedence::of(self.cur.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> ParseResult<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> ParseResult<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> ParseResult<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;
        Ok(Expr::Function(FunctionLiteral {
            params: Rc::from(params),
            body: Rc::new(body),
        }))
    }

    fn parse_function_parameters(&mut self) -> ParseResult<Vec<Rc<str>>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Ok(params);
        }

        self.expect_peek(TokenKind::Ident)?;
        params.push(Rc::from(self.cur.literal.as_str()));
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            params.push(Rc::from(self.cur.literal.as_str()));
        }

        self.expect_peek(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_call_expression(&mut self, function: Expr) -> ParseResult<Expr> {
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Ok(Expr::Call {
            function: Box::new(function),
            args,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> ParseResult<Expr> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;
        Ok(Expr::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Ok(Expr::Array(elements))
    }

    /// Comma-separated expressions up to `end`, shared by call arguments and arrays.
    fn parse_expression_list(&mut self, end: TokenKind) -> ParseResult<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Ok(list)
    }

    fn parse_hash_literal(&mut self) -> ParseResult<Expr> {
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.expect_peek(TokenKind::RBrace)?;
        Ok(Expr::Hash(pairs))
    }
}

/// Parses a whole source text, returning the program and any errors found.
pub fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}
