//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into tokens for parsing. It handles:
//!
//! - Byte-level scanning with one byte of lookahead
//! - Recognition of keywords, identifiers, integer literals, and operators
//! - Token position tracking for error reporting
//! - Whitespace skipping

pub mod lexer;
pub mod tokens;
