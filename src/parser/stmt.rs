use crate::{
    ast::{
        ast::Stmt,
        expressions::IdentifierExpr,
        statements::{BlockStmt, ExpressionStmt, LetStmt, ReturnStmt},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{lookups::LOOKUPS, parser::Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = LOOKUPS.get_stmt(parser.current_token_kind()) {
        return stmt_fn(parser);
    }

    let token = parser.current_token().clone();
    let expression = parse_expr(parser, BindingPower::Lowest)?;

    skip_optional_semicolon(parser);

    Ok(Stmt::Expression(ExpressionStmt { token, expression }))
}

/// Statements may end in `;` but do not have to.
fn skip_optional_semicolon(parser: &mut Parser) {
    if parser.peek_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::Ident)?;
    let name_token = parser.current_token().clone();
    let name = IdentifierExpr {
        value: name_token.value.clone(),
        token: name_token,
    };

    parser.expect_peek(TokenKind::Assign)?;
    parser.advance();

    let value = parse_expr(parser, BindingPower::Lowest)?;

    skip_optional_semicolon(parser);

    Ok(Stmt::Let(LetStmt { token, name, value }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token().clone();
    parser.advance();

    let value = parse_expr(parser, BindingPower::Lowest)?;

    skip_optional_semicolon(parser);

    Ok(Stmt::Return(ReturnStmt { token, value }))
}

/// Parses `{ ... }` with the current token on `{`.
///
/// Stops on the matching `}`, or at `EOF` when the block is never closed.
/// Failed statements inside the block are recorded on the parser and
/// skipped, so a block only fails when it would nest too deeply.
pub fn parse_block_stmt(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let token = parser.current_token().clone();
    parser.enter_nesting()?;
    parser.advance();

    parser.enter_block();
    let body = parser.parse_stmts(Some(TokenKind::RBrace));
    parser.leave_block();
    parser.leave_nesting();

    Ok(BlockStmt { token, body })
}
