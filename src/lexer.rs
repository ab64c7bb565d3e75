use crate::diagnostic::Span;
use crate::token::{lookup_ident, Token, TokenKind};
use std::str::Chars;

/// Pull-based scanner over Monkey source text.
///
/// Every call to [`Lexer::next_token`] moves the cursor forward; once the input is
/// exhausted it keeps returning an `Eof` token.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Chars<'a>,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars(),
            pos: 0,
            done: false,
        }
    }

    /// Peeks the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.bump();
        }
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.input[start..self.pos], Span::new(start, self.pos))
    }

    /// Consumes `second` when it is the next character, choosing between a two-character
    /// operator and its one-character prefix.
    fn either(&mut self, second: char, double: TokenKind, single: TokenKind, start: usize) -> Token {
        if self.peek() == Some(second) {
            self.bump();
            self.token(double, start)
        } else {
            self.token(single, start)
        }
    }

    fn read_string(&mut self, start: usize) -> Token {
        self.eat_while(|c| c != '"');
        if self.bump().is_none() {
            return self.token(TokenKind::Illegal, start);
        }
        let body = &self.input[start + 1..self.pos - 1];
        Token::new(TokenKind::String, body, Span::new(start, self.pos))
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.pos;

        let c = match self.bump() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, "", Span::new(start, start)),
        };

        match c {
            '=' => self.either('=', TokenKind::Eq, TokenKind::Assign, start),
            '!' => self.either('=', TokenKind::NotEq, TokenKind::Bang, start),
            '+' => self.token(TokenKind::Plus, start),
            '-' => self.token(TokenKind::Minus, start),
            '*' => self.token(TokenKind::Asterisk, start),
            '/' => self.token(TokenKind::Slash, start),
            '<' => self.token(TokenKind::Lt, start),
            '>' => self.token(TokenKind::Gt, start),
            ',' => self.token(TokenKind::Comma, start),
            ';' => self.token(TokenKind::Semicolon, start),
            ':' => self.token(TokenKind::Colon, start),
            '(' => self.token(TokenKind::LParen, start),
            ')' => self.token(TokenKind::RParen, start),
            '{' => self.token(TokenKind::LBrace, start),
            '}' => self.token(TokenKind::RBrace, start),
            '[' => self.token(TokenKind::LBracket, start),
            ']' => self.token(TokenKind::RBracket, start),
            '"' => self.read_string(start),
            c if is_letter(c) => {
                self.eat_while(is_letter);
                let ident = &self.input[start..self.pos];
                self.token(lookup_ident(ident), start)
            }
            c if c.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_digit());
                self.token(TokenKind::Int, start)
            }
            _ => self.token(TokenKind::Illegal, start),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.done = true;
            return None;
        }
        Some(token)
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
