use std::rc::Rc;

use log::trace;

use crate::{MK_SPAN, MK_TOKEN};

use super::tokens::{lookup_ident, Token, TokenKind, DOUBLE_BYTE_LOOKUP, SINGLE_BYTE_LOOKUP};

/// Pull-based byte scanner.
///
/// Tokens are produced one at a time by [`Lexer::next_token`]. Once the input
/// is exhausted every further call yields an `EOF` token with an empty
/// literal. A lexer owns mutable cursor state and is meant to be driven by a
/// single owner; it is not shared between threads.
#[derive(Clone, Debug)]
pub struct Lexer {
    source: String,
    /// Offset of `ch`
    pos: usize,
    /// Offset of the byte after `ch`
    read_pos: usize,
    /// Current byte, `0` once past the end
    ch: u8,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        let mut lexer = Lexer {
            source,
            pos: 0,
            read_pos: 0,
            ch: 0,
            file: file_name,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        // Past the end the cursor stays parked at `source.len()`
        self.ch = self.peek_char();
        self.pos = self.read_pos.min(self.source.len());
        self.read_pos = (self.read_pos + 1).min(self.source.len() + 1);
    }

    fn peek_char(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.read_pos)
            .copied()
            .unwrap_or(0)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    /// Consumes a maximal run of bytes accepted by `accept` and returns it.
    fn read_while(&mut self, accept: fn(u8) -> bool) -> String {
        let start = self.pos;
        while accept(self.ch) {
            self.read_char();
        }
        self.source[start..self.pos].to_string()
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;
        let token = if matches!(self.ch, b'=' | b'!') && self.peek_char() == b'=' {
            self.read_char();
            let literal = self.source[start..=self.pos].to_string();
            let kind = DOUBLE_BYTE_LOOKUP
                .get(literal.as_str())
                .copied()
                .unwrap_or(TokenKind::Illegal);
            self.read_char();
            MK_TOKEN!(kind, literal, MK_SPAN!(start, self.pos, self.file))
        } else if let Some(kind) = SINGLE_BYTE_LOOKUP.get(&self.ch).copied() {
            let literal = if kind == TokenKind::EOF {
                String::new()
            } else {
                (self.ch as char).to_string()
            };
            let end = if kind == TokenKind::EOF { start } else { start + 1 };
            self.read_char();
            MK_TOKEN!(kind, literal, MK_SPAN!(start, end, self.file))
        } else if is_letter(self.ch) {
            let literal = self.read_while(is_letter);
            MK_TOKEN!(lookup_ident(&literal), literal, MK_SPAN!(start, self.pos, self.file))
        } else if self.ch.is_ascii_digit() {
            let literal = self.read_while(|ch| ch.is_ascii_digit());
            MK_TOKEN!(TokenKind::Int, literal, MK_SPAN!(start, self.pos, self.file))
        } else {
            // Lossy so that a stray byte of a multi-byte character still prints
            let literal = String::from_utf8_lossy(&[self.ch]).into_owned();
            self.read_char();
            MK_TOKEN!(TokenKind::Illegal, literal, MK_SPAN!(start, start + 1, self.file))
        };

        trace!("lexed {}", token.describe());
        token
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'?'
}

/// Drains a lexer over `source` into a vector ending with a single `EOF`.
pub fn tokenize(source: String, file: Option<String>) -> Vec<Token> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token();
        let at_eof = token.kind == TokenKind::EOF;
        tokens.push(token);

        if at_eof {
            return tokens;
        }
    }
}
