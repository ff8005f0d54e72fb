use indexmap::IndexMap;

use crate::ast::{FieldSelection, QueryDocument, SelectionSet, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Pos, Token, TokenKind};

/// Nesting budget applied by [`parse_query`]. Queries come from callers,
/// not the schema author, so the parser refuses documents nested deeply
/// enough to threaten the stack of the recursive walk.
pub const DEFAULT_DEPTH_LIMIT: usize = 128;

/// Parse a query string into a [`QueryDocument`], using the default
/// selection-set depth limit.
pub fn parse_query(source: &str) -> Result<QueryDocument, ParseError> {
    parse_query_with_depth_limit(source, DEFAULT_DEPTH_LIMIT)
}

/// Parse a query string, refusing selection sets nested deeper than
/// `depth_limit` levels.
pub fn parse_query_with_depth_limit(
    source: &str,
    depth_limit: usize,
) -> Result<QueryDocument, ParseError> {
    let (tokens, end) = Lexer::tokenize(source)?;
    let mut parser = Parser {
        tokens,
        offset: 0,
        end,
        depth_limit,
    };
    let selection_set = parser.parse_selection_set(1)?;
    if let Some(token) = parser.peek() {
        return Err(ParseError::new(
            token.pos,
            format!("unexpected {} after the top-level selection set", token.kind),
        ));
    }
    Ok(QueryDocument { selection_set })
}

struct Parser {
    tokens: Vec<Token>,
    offset: usize,
    end: Pos,
    depth_limit: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.offset)
    }

    fn peek_kind(&self, lookahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.offset + lookahead).map(|t| &t.kind)
    }

    fn next_pos(&self) -> Pos {
        self.peek().map(|token| token.pos).unwrap_or(self.end)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.offset).cloned();
        if token.is_some() {
            self.offset += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|token| &token.kind) == Some(kind) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<Pos, ParseError> {
        let pos = self.next_pos();
        match self.bump() {
            Some(token) if &token.kind == kind => Ok(token.pos),
            Some(token) => Err(ParseError::new(
                pos,
                format!("expected {} {}, found {}", kind, context, token.kind),
            )),
            None => Err(ParseError::new(
                pos,
                format!("expected {} {}, found end of input", kind, context),
            )),
        }
    }

    fn expect_name(&mut self, context: &str) -> Result<(String, Pos), ParseError> {
        let pos = self.next_pos();
        match self.bump() {
            Some(Token {
                kind: TokenKind::Name(name),
                pos,
            }) => Ok((name, pos)),
            Some(token) => Err(ParseError::new(
                pos,
                format!("expected {}, found {}", context, token.kind),
            )),
            None => Err(ParseError::new(
                pos,
                format!("expected {}, found end of input", context),
            )),
        }
    }

    fn parse_selection_set(&mut self, depth: usize) -> Result<SelectionSet, ParseError> {
        let open_pos = self.next_pos();
        if depth > self.depth_limit {
            return Err(ParseError::new(
                open_pos,
                format!("selection sets nested deeper than {} levels", self.depth_limit),
            ));
        }
        self.expect(&TokenKind::LeftBrace, "to open a selection set")?;
        let mut items = Vec::new();
        loop {
            match self.peek().map(|token| &token.kind) {
                Some(TokenKind::Name(_)) => {
                    items.push(self.parse_field(depth)?);
                    self.eat(&TokenKind::Comma);
                }
                Some(TokenKind::RightBrace) => {
                    if items.is_empty() {
                        return Err(ParseError::new(
                            self.next_pos(),
                            "expected a field name, selection sets cannot be empty",
                        ));
                    }
                    self.bump();
                    return Ok(SelectionSet { items });
                }
                Some(kind) => {
                    return Err(ParseError::new(
                        self.next_pos(),
                        format!("expected a field name or `}}`, found {}", kind),
                    ));
                }
                None => {
                    return Err(ParseError::new(
                        self.next_pos(),
                        "expected a field name or `}`, found end of input",
                    ));
                }
            }
        }
    }

    fn parse_field(&mut self, depth: usize) -> Result<FieldSelection, ParseError> {
        let (name_or_alias, _) = self.expect_name("a field name")?;
        // `alias: field` — a colon followed by a name at selection level is
        // the alias form.
        let (alias, name) = if self.peek_kind(0) == Some(&TokenKind::Colon)
            && matches!(self.peek_kind(1), Some(TokenKind::Name(_)))
        {
            self.bump();
            let (name, _) = self.expect_name("a field name after the alias")?;
            (Some(name_or_alias), name)
        } else {
            (None, name_or_alias)
        };

        let arguments = if self.peek_kind(0) == Some(&TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            IndexMap::new()
        };

        let selections = if self.peek_kind(0) == Some(&TokenKind::LeftBrace) {
            self.parse_selection_set(depth + 1)?
        } else {
            SelectionSet::default()
        };

        Ok(FieldSelection {
            name,
            alias,
            arguments,
            selections,
        })
    }

    fn parse_arguments(&mut self) -> Result<IndexMap<String, Value>, ParseError> {
        self.expect(&TokenKind::LeftParen, "to open an argument list")?;
        let mut arguments = IndexMap::new();
        loop {
            let (name, name_pos) = self.expect_name("an argument name")?;
            self.expect(&TokenKind::Colon, "after the argument name")?;
            let value = self.parse_value()?;
            if arguments.insert(name.clone(), value).is_some() {
                return Err(ParseError::new(
                    name_pos,
                    format!("duplicate argument \"{}\"", name),
                ));
            }
            self.eat(&TokenKind::Comma);
            if self.eat(&TokenKind::RightParen) {
                return Ok(arguments);
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let pos = self.next_pos();
        match self.bump() {
            Some(Token {
                kind: TokenKind::Int(value),
                ..
            }) => Ok(Value::Int(value)),
            Some(Token {
                kind: TokenKind::Float(value),
                ..
            }) => Ok(Value::Float(value)),
            Some(Token {
                kind: TokenKind::StringValue(value),
                ..
            }) => Ok(Value::String(value)),
            Some(Token {
                kind: TokenKind::Name(name),
                ..
            }) => match name.as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                "null" => Ok(Value::Null),
                other => Err(ParseError::new(
                    pos,
                    format!("expected a literal value, found `{}`", other),
                )),
            },
            Some(token) => Err(ParseError::new(
                pos,
                format!("expected a literal value, found {}", token.kind),
            )),
            None => Err(ParseError::new(
                pos,
                "expected a literal value, found end of input",
            )),
        }
    }
}
