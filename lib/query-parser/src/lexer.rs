use std::fmt::{self, Display};
use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

use crate::error::ParseError;

/// Original position of an element in source code, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Colon,
    Comma,
    Name(String),
    Int(i64),
    Float(f64),
    StringValue(String),
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftBrace => write!(f, "`{{`"),
            TokenKind::RightBrace => write!(f, "`}}`"),
            TokenKind::LeftParen => write!(f, "`(`"),
            TokenKind::RightParen => write!(f, "`)`"),
            TokenKind::Colon => write!(f, "`:`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Name(name) => write!(f, "`{}`", name),
            TokenKind::Int(value) => write!(f, "integer literal `{}`", value),
            TokenKind::Float(value) => write!(f, "float literal `{}`", value),
            TokenKind::StringValue(_) => write!(f, "string literal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

pub(crate) struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole source up front. Queries are small enough that
    /// a token vector beats incremental lexing in simplicity.
    pub(crate) fn tokenize(source: &str) -> Result<(Vec<Token>, Pos), ParseError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            lexer.skip_ignored();
            let pos = lexer.pos();
            let Some(ch) = lexer.peek() else {
                return Ok((tokens, pos));
            };
            let kind = match ch {
                '{' => lexer.punctuator(TokenKind::LeftBrace),
                '}' => lexer.punctuator(TokenKind::RightBrace),
                '(' => lexer.punctuator(TokenKind::LeftParen),
                ')' => lexer.punctuator(TokenKind::RightParen),
                ':' => lexer.punctuator(TokenKind::Colon),
                ',' => lexer.punctuator(TokenKind::Comma),
                '"' => lexer.string_value(pos)?,
                c if c == '-' || c.is_ascii_digit() => lexer.number(pos)?,
                c if is_name_start(c) => lexer.name(),
                c => {
                    return Err(ParseError::new(
                        pos,
                        format!("unexpected character `{}`", c),
                    ))
                }
            };
            tokens.push(Token { kind, pos });
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_ignored(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '#' => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn punctuator(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn name(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if is_name_continue(ch) {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Name(name)
    }

    fn number(&mut self, start: Pos) -> Result<TokenKind, ParseError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        if !self.digits(&mut text) {
            return Err(ParseError::new(start, "expected a digit after `-`"));
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            text.push('.');
            self.bump();
            if !self.digits(&mut text) {
                return Err(ParseError::new(start, "expected a digit after `.`"));
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            text.push('e');
            self.bump();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                text.push(sign);
                self.bump();
            }
            if !self.digits(&mut text) {
                return Err(ParseError::new(start, "expected a digit in the exponent"));
            }
        }
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::new(start, format!("malformed float literal `{}`", text)))
        } else {
            text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
                ParseError::new(start, format!("integer literal `{}` out of range", text))
            })
        }
    }

    fn digits(&mut self, text: &mut String) -> bool {
        let mut any = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                any = true;
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        any
    }

    fn string_value(&mut self, start: Pos) -> Result<TokenKind, ParseError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(ParseError::new(start, "unterminated string literal"));
                }
                Some('"') => return Ok(TokenKind::StringValue(value)),
                Some('\\') => {
                    let escape_pos = self.pos();
                    match self.bump() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('/') => value.push('/'),
                        Some('b') => value.push('\u{0008}'),
                        Some('f') => value.push('\u{000C}'),
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('u') => value.push(self.unicode_escape(escape_pos)?),
                        Some(other) => {
                            return Err(ParseError::new(
                                escape_pos,
                                format!("unknown escape sequence `\\{}`", other),
                            ));
                        }
                        None => {
                            return Err(ParseError::new(start, "unterminated string literal"));
                        }
                    }
                }
                Some(ch) => value.push(ch),
            }
        }
    }

    fn unicode_escape(&mut self, escape_pos: Pos) -> Result<char, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| ParseError::new(escape_pos, "invalid unicode escape sequence"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code)
            .ok_or_else(|| ParseError::new(escape_pos, "invalid unicode escape sequence"))
    }
}

fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}
