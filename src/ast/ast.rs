use std::fmt::{Debug, Display};

use super::{
    expressions::{
        BooleanExpr, FunctionLiteral, IdentifierExpr, IfExpr, InfixExpr, IntegerExpr, PrefixExpr,
    },
    statements::{ExpressionStmt, LetStmt, ReturnStmt},
};

/// Node Trait
///
/// Shared behaviour of every AST node. The canonical, fully parenthesised
/// text of a node comes from its `Display` impl.
pub trait Node: Debug + Display {
    /// Returns the literal text of the token the node was built from.
    fn token_literal(&self) -> &str;
    /// Returns the span of the node's leading token.
    fn get_span(&self) -> &crate::Span;
}

/// Statement
///
/// The closed family of statement nodes. Blocks are not listed: they only
/// occur as the bodies of `if`, `else` and function literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
}

impl Node for Stmt {
    fn token_literal(&self) -> &str {
        match self {
            Stmt::Let(stmt) => stmt.token_literal(),
            Stmt::Return(stmt) => stmt.token_literal(),
            Stmt::Expression(stmt) => stmt.token_literal(),
        }
    }
    fn get_span(&self) -> &crate::Span {
        match self {
            Stmt::Let(stmt) => stmt.get_span(),
            Stmt::Return(stmt) => stmt.get_span(),
            Stmt::Expression(stmt) => stmt.get_span(),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let(stmt) => write!(f, "{}", stmt),
            Stmt::Return(stmt) => write!(f, "{}", stmt),
            Stmt::Expression(stmt) => write!(f, "{}", stmt),
        }
    }
}

/// Expression
///
/// The closed family of expression nodes. Composite variants own their
/// children through `Box`, so a parsed tree never shares nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(IdentifierExpr),
    Integer(IntegerExpr),
    Boolean(BooleanExpr),
    Prefix(PrefixExpr),
    Infix(InfixExpr),
    If(IfExpr),
    Function(FunctionLiteral),
}

impl Node for Expr {
    fn token_literal(&self) -> &str {
        match self {
            Expr::Identifier(expr) => expr.token_literal(),
            Expr::Integer(expr) => expr.token_literal(),
            Expr::Boolean(expr) => expr.token_literal(),
            Expr::Prefix(expr) => expr.token_literal(),
            Expr::Infix(expr) => expr.token_literal(),
            Expr::If(expr) => expr.token_literal(),
            Expr::Function(expr) => expr.token_literal(),
        }
    }
    fn get_span(&self) -> &crate::Span {
        match self {
            Expr::Identifier(expr) => expr.get_span(),
            Expr::Integer(expr) => expr.get_span(),
            Expr::Boolean(expr) => expr.get_span(),
            Expr::Prefix(expr) => expr.get_span(),
            Expr::Infix(expr) => expr.get_span(),
            Expr::If(expr) => expr.get_span(),
            Expr::Function(expr) => expr.get_span(),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Identifier(expr) => write!(f, "{}", expr),
            Expr::Integer(expr) => write!(f, "{}", expr),
            Expr::Boolean(expr) => write!(f, "{}", expr),
            Expr::Prefix(expr) => write!(f, "{}", expr),
            Expr::Infix(expr) => write!(f, "{}", expr),
            Expr::If(expr) => write!(f, "{}", expr),
            Expr::Function(expr) => write!(f, "{}", expr),
        }
    }
}

/// Program
///
/// Root of the AST. Statements that failed to parse are absent; the
/// diagnostics describing them live on the parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or("")
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
