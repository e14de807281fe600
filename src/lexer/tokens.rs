use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("fn", TokenKind::Function);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("return", TokenKind::Return);
        map
    };

    /// Operators spelled with two bytes. Only `=` and `!` may start one.
    pub static ref DOUBLE_BYTE_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("==", TokenKind::Eq);
        map.insert("!=", TokenKind::NotEq);
        map
    };

    pub static ref SINGLE_BYTE_LOOKUP: HashMap<u8, TokenKind> = {
        let mut map = HashMap::new();
        map.insert(b'=', TokenKind::Assign);
        map.insert(b';', TokenKind::Semicolon);
        map.insert(b'(', TokenKind::LParen);
        map.insert(b')', TokenKind::RParen);
        map.insert(b'{', TokenKind::LBrace);
        map.insert(b'}', TokenKind::RBrace);
        map.insert(b'+', TokenKind::Plus);
        map.insert(b'-', TokenKind::Minus);
        map.insert(b'!', TokenKind::Bang);
        map.insert(b'/', TokenKind::Slash);
        map.insert(b'*', TokenKind::Asterisk);
        map.insert(b'<', TokenKind::Lt);
        map.insert(b'>', TokenKind::Gt);
        map.insert(b',', TokenKind::Comma);
        map.insert(0, TokenKind::EOF);
        map
    };
}

/// Classifies an identifier-shaped lexeme as a keyword or a plain identifier.
pub fn lookup_ident(ident: &str) -> TokenKind {
    RESERVED_LOOKUP
        .get(ident)
        .copied()
        .unwrap_or(TokenKind::Ident)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    EOF,

    Ident,
    Int,

    Assign, // =
    Plus,
    Minus,
    Bang, // !
    Slash,
    Asterisk,

    Lt,
    Gt,
    Eq,    // ==
    NotEq, // !=

    Comma,
    Semicolon,

    LParen,
    RParen,
    LBrace,
    RBrace,

    // Reserved
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// The name diagnostics use for this kind: the operator text for
    /// punctuation, an upper-case word for everything else.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::EOF => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Slash => "/",
            TokenKind::Asterisk => "*",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "FUNCTION",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token, empty for `EOF`. A lone byte of a
    /// multi-byte character is not valid UTF-8 on its own, so an `ILLEGAL`
    /// token for one holds U+FFFD instead; its span still covers the byte.
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// One-line form used by the `--tokens` dump.
    pub fn describe(&self) -> String {
        if self.is_one_of_many(&[TokenKind::Ident, TokenKind::Int, TokenKind::Illegal]) {
            format!("{} ({})", self.kind, self.value)
        } else {
            format!("{} ()", self.kind)
        }
    }

    pub fn debug(&self) {
        println!("{}", self.describe());
    }
}
