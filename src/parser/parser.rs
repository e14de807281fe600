//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the statement loop shared
//! by programs and blocks. The parser pulls tokens from a [`Lexer`] on demand,
//! keeping the current token and one token of lookahead.
//!
//! Expressions are parsed with a Pratt parser driven by the process-wide
//! lookup tables in [`super::lookups`]:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Syntax errors never abort a parse. Each failed statement records one
//! diagnostic, after which the parser skips ahead to the next statement
//! boundary (see [`Parser::synchronize`]).

use log::{debug, info};

use crate::{
    ast::ast::{Program, Stmt},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{BindingPower, LOOKUPS},
    stmt::parse_stmt,
};

/// Deepest recursion accepted before the parser gives up on a statement with
/// [`ErrorImpl::NestingTooDeep`]. Every `parse_expr` frame and every open
/// block counts one level, so a default 2 MiB thread stack is never exhausted.
pub const MAX_NESTING_DEPTH: usize = 128;

/// The main parser structure that maintains parsing state.
///
/// A parser owns its lexer and mutates private cursor state while parsing,
/// so an instance belongs to a single owner for the duration of a parse.
pub struct Parser {
    /// Source of tokens, pulled one at a time
    lexer: Lexer,
    /// The token being parsed
    current_token: Token,
    /// One token of lookahead
    peek_token: Token,
    /// Diagnostics in the order they were raised
    errors: Vec<Error>,
    /// Number of blocks currently open
    block_depth: usize,
    /// Number of `parse_expr` frames and open blocks on the stack
    nesting_depth: usize,
}

impl Parser {
    /// Creates a new Parser, priming the current and lookahead tokens.
    pub fn new(mut lexer: Lexer) -> Self {
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();

        Parser {
            lexer,
            current_token,
            peek_token,
            errors: vec![],
            block_depth: 0,
            nesting_depth: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token.kind
    }

    /// Returns the lookahead token.
    pub fn peek_token(&self) -> &Token {
        &self.peek_token
    }

    /// Returns the kind of the lookahead token.
    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek_token.kind
    }

    /// Returns the binding power of the lookahead token.
    pub fn peek_binding_power(&self) -> BindingPower {
        LOOKUPS.binding_power(self.peek_token.kind)
    }

    /// Shifts the lookahead into the current slot and pulls a new lookahead.
    pub fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current_token = std::mem::replace(&mut self.peek_token, next);
    }

    /// Advances if the lookahead token has the expected kind.
    ///
    /// # Returns
    ///
    /// Returns Ok(()) after advancing, otherwise an `UnexpectedToken` error
    /// positioned at the lookahead token. The cursor is left untouched on
    /// failure.
    pub fn expect_peek(&mut self, expected: TokenKind) -> Result<(), Error> {
        if self.peek_token.kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    expected,
                    got: self.peek_token.kind,
                },
                self.peek_token.span.start.clone(),
            ))
        }
    }

    /// Returns the position of the current token in the source.
    pub fn get_position(&self) -> Position {
        self.current_token.span.start.clone()
    }

    /// Diagnostics accumulated so far, in insertion order.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Consumes the parser, returning its diagnostics.
    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// Parses statements until `EOF`.
    ///
    /// Always returns a program. Statements that failed to parse are left
    /// out and described by [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        info!("parsing {}", self.current_token.span.start.1);

        let statements = self.parse_stmts(None);

        info!(
            "parsed {} statement(s) with {} diagnostic(s)",
            statements.len(),
            self.errors.len()
        );

        Program { statements }
    }

    /// Statement loop shared by the program and by blocks.
    ///
    /// Stops at `EOF`, or at `closing` when given. On success the cursor is
    /// left on the last token of each statement and moved past it here.
    pub(crate) fn parse_stmts(&mut self, closing: Option<TokenKind>) -> Vec<Stmt> {
        let mut body = vec![];

        while self.current_token.kind != TokenKind::EOF
            && Some(self.current_token.kind) != closing
        {
            match parse_stmt(self) {
                Ok(stmt) => {
                    body.push(stmt);
                    self.advance();
                }
                Err(error) => {
                    debug!("{} at {}", error, error.get_position().0);
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }

        body
    }

    /// Skips the remainder of a failed statement.
    ///
    /// Stops after consuming a `;`, on the next `let` or `return`, at `EOF`,
    /// or on the `}` closing the innermost open block so that the block loop
    /// can close it. Braces opened while skipping are skipped as a whole.
    fn synchronize(&mut self) {
        let start = self.current_token.span.start.0;
        let mut skipped_blocks = 0usize;

        loop {
            match self.current_token.kind {
                TokenKind::EOF => break,
                TokenKind::LBrace => {
                    skipped_blocks += 1;
                    self.advance();
                }
                TokenKind::RBrace if skipped_blocks > 0 => {
                    skipped_blocks -= 1;
                    self.advance();
                }
                TokenKind::RBrace if self.block_depth > 0 => break,
                TokenKind::Semicolon if skipped_blocks == 0 => {
                    self.advance();
                    break;
                }
                _ => self.advance(),
            }

            if skipped_blocks == 0
                && matches!(self.current_token.kind, TokenKind::Let | TokenKind::Return)
            {
                break;
            }
        }

        debug!(
            "resynchronised from {} to {}",
            start, self.current_token.span.start.0
        );
    }

    pub(crate) fn enter_block(&mut self) {
        self.block_depth += 1;
    }

    pub(crate) fn leave_block(&mut self) {
        self.block_depth -= 1;
    }

    /// Records one more level of expression recursion, refusing to go past
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn enter_nesting(&mut self) -> Result<(), Error> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                },
                self.get_position(),
            ));
        }

        self.nesting_depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.nesting_depth -= 1;
    }
}

/// Parses source text into a program.
///
/// This is the main entry point for parsing. It builds a lexer and parser
/// over `source` and parses all statements until EOF.
///
/// # Returns
///
/// A tuple containing:
/// - The (possibly partial) Program
/// - Every diagnostic raised, in order
pub fn parse(source: String, file: Option<String>) -> (Program, Vec<Error>) {
    let mut parser = Parser::new(Lexer::new(source, file));
    let program = parser.parse_program();

    (program, parser.into_errors())
}
