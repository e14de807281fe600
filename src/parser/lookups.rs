use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::ast::{Expr, Stmt},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

// Lookup tables keyed by token kind
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

/// The whole grammar: which handler parses each token kind, and how tightly
/// each infix operator binds.
pub struct Lookups {
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
}

impl Lookups {
    fn new() -> Self {
        Lookups {
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Registers a left denotation (infix) handler and its binding power.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler. Kinds without one start an expression
    /// statement.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn get_stmt(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    /// Binding power of `kind`, `Lowest` for anything that is not an infix
    /// operator.
    pub fn binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Lowest)
    }
}

pub fn create_token_lookups() -> Lookups {
    let mut lookups = Lookups::new();

    // Equality and relational
    lookups.led(TokenKind::Eq, BindingPower::Equals, parse_binary_expr);
    lookups.led(TokenKind::NotEq, BindingPower::Equals, parse_binary_expr);
    lookups.led(TokenKind::Lt, BindingPower::LessGreater, parse_binary_expr);
    lookups.led(TokenKind::Gt, BindingPower::LessGreater, parse_binary_expr);

    // Additive and multiplicative
    lookups.led(TokenKind::Plus, BindingPower::Sum, parse_binary_expr);
    lookups.led(TokenKind::Minus, BindingPower::Sum, parse_binary_expr);
    lookups.led(TokenKind::Asterisk, BindingPower::Product, parse_binary_expr);
    lookups.led(TokenKind::Slash, BindingPower::Product, parse_binary_expr);

    // Literals and symbols
    lookups.nud(TokenKind::Ident, parse_primary_expr);
    lookups.nud(TokenKind::Int, parse_primary_expr);
    lookups.nud(TokenKind::True, parse_primary_expr);
    lookups.nud(TokenKind::False, parse_primary_expr);
    lookups.nud(TokenKind::Bang, parse_prefix_expr);
    lookups.nud(TokenKind::Minus, parse_prefix_expr);
    lookups.nud(TokenKind::LParen, parse_grouping_expr);
    lookups.nud(TokenKind::If, parse_if_expr);
    lookups.nud(TokenKind::Function, parse_fn_expr);

    // Statements
    lookups.stmt(TokenKind::Let, parse_let_stmt);
    lookups.stmt(TokenKind::Return, parse_return_stmt);

    lookups
}

lazy_static! {
    /// Built on first use and never modified afterwards.
    pub static ref LOOKUPS: Lookups = create_token_lookups();
}
