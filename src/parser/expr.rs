use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BooleanExpr, FunctionLiteral, IdentifierExpr, IfExpr, InfixExpr, IntegerExpr,
            PrefixExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::{BindingPower, LOOKUPS}, parser::Parser, stmt::parse_block_stmt};

/// Parses an expression whose operators all bind tighter than `bp`.
///
/// On entry the current token starts the expression; on exit it is the last
/// token of the expression.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    parser.enter_nesting()?;
    let result = parse_expr_inner(parser, bp);
    parser.leave_nesting();

    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = LOOKUPS.get_nud(token_kind) else {
        return Err(Error::new(ErrorImpl::NoPrefixParseFn { kind: token_kind }, parser.get_position()));
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than bp, fold it into lhs.
    // Equal binding powers stop here, which makes binary operators left-associative.
    while parser.peek_token_kind() != TokenKind::Semicolon && bp < parser.peek_binding_power() {
        let Some(led_fn) = LOOKUPS.get_led(parser.peek_token_kind()) else {
            return Ok(left);
        };

        let led_bp = parser.peek_binding_power();
        parser.advance();
        left = led_fn(parser, left, led_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Int => match token.value.parse::<i64>() {
            Ok(value) => Ok(Expr::Integer(IntegerExpr { token, value })),
            Err(_) => Err(Error::new(ErrorImpl::IntegerParseError { literal: token.value.clone() }, parser.get_position())),
        },
        TokenKind::Ident => Ok(Expr::Identifier(IdentifierExpr { value: token.value.clone(), token })),
        TokenKind::True | TokenKind::False => Ok(Expr::Boolean(BooleanExpr { value: token.kind == TokenKind::True, token })),
        _ => Err(Error::new(ErrorImpl::NoPrefixParseFn { kind: token.kind }, parser.get_position())),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.current_token().clone();
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Infix(InfixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.current_token().clone();
    parser.advance();

    let rhs = parse_expr(parser, BindingPower::Prefix)?;

    Ok(Expr::Prefix(PrefixExpr {
        operator: operator_token.value.clone(),
        token: operator_token,
        right: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect_peek(TokenKind::RParen)?;

    Ok(expr)
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    // if (<condition>) { ... } else { ... }
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::LParen)?;
    parser.advance();
    let condition = parse_expr(parser, BindingPower::Lowest)?;
    parser.expect_peek(TokenKind::RParen)?;

    parser.expect_peek(TokenKind::LBrace)?;
    let consequence = parse_block_stmt(parser)?;

    let alternative = if parser.peek_token_kind() == TokenKind::Else {
        parser.advance();
        parser.expect_peek(TokenKind::LBrace)?;
        Some(parse_block_stmt(parser)?)
    } else {
        None
    };

    Ok(Expr::If(IfExpr {
        token,
        condition: Box::new(condition),
        consequence,
        alternative,
    }))
}

pub fn parse_fn_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    parser.expect_peek(TokenKind::LParen)?;
    let parameters = parse_fn_parameters(parser)?;

    parser.expect_peek(TokenKind::LBrace)?;
    let body = parse_block_stmt(parser)?;

    Ok(Expr::Function(FunctionLiteral {
        token,
        parameters,
        body,
    }))
}

/// Parses `(a, b, c)` with the current token on `(`, leaving it on `)`.
fn parse_fn_parameters(parser: &mut Parser) -> Result<Vec<IdentifierExpr>, Error> {
    let mut parameters = Vec::new();

    if parser.peek_token_kind() == TokenKind::RParen {
        parser.advance();
        return Ok(parameters);
    }

    loop {
        parser.expect_peek(TokenKind::Ident)?;
        let token = parser.current_token().clone();
        parameters.push(IdentifierExpr { value: token.value.clone(), token });

        if parser.peek_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect_peek(TokenKind::RParen)?;

    Ok(parameters)
}
