use miette::{Diagnostic, SourceSpan};
use std::borrow::Cow;
use std::fmt::{self};
use thiserror::Error;

/// One token lexed from the program line.
///
/// Tokens produced by the lexer borrow their `origin` text from the source
/// line; tokens synthesized by the evaluator (operator results) reuse the
/// origin and offset of the operator that produced them, so every token can
/// still be pointed at in a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de> {
    /// holds the characters as &str
    pub origin: &'de str,
    /// byte offset of `origin` within the source line
    pub offset: usize,
    /// holds the type
    pub kind: TokenType,
}

/// The `TokenType` enum represents the different kinds of tokens the RPN
/// language knows about: integer literals, variable names, the four
/// arithmetic operators, assignment, and the print instruction.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Operands.
    VALUE(i64),
    IDENT,

    // Operators.
    PLUS,
    MINUS,
    STAR,
    SLASH,

    // Instructions.
    EQUAL,
    PRINT,
}

impl<'de> Token<'de> {
    /// The compact form used in the program-stack trace: literals print
    /// their payload (synthesized result tokens have no meaningful origin
    /// text), everything else prints its source text.
    pub fn print_form(&self) -> Cow<'de, str> {
        match self.kind {
            TokenType::VALUE(n) => Cow::Owned(n.to_string()),
            _ => Cow::Borrowed(self.origin),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = self.origin;
        match self.kind {
            TokenType::VALUE(n) => write!(f, "VALUE {origin} {n}"),
            TokenType::IDENT => write!(f, "VARIABLE {origin} null"),

            TokenType::PLUS => write!(f, "PLUS {origin} null"),
            TokenType::MINUS => write!(f, "MINUS {origin} null"),
            TokenType::STAR => write!(f, "STAR {origin} null"),
            TokenType::SLASH => write!(f, "SLASH {origin} null"),

            TokenType::EQUAL => write!(f, "ASSIGNMENT {origin} null"),
            TokenType::PRINT => write!(f, "PRINT {origin} null"),
        }
    }
}

/// This indicates an error caused by a character the lexer has no token for
#[derive(Diagnostic, Debug, Error)]
#[error("Unexpected character '{token}'")]
pub struct SingleTokenError {
    #[source_code]
    pub src: String,

    pub token: char,

    #[label = "this character"]
    pub err_span: SourceSpan,
}

/// This indicates an integer literal that does not fit the value type
#[derive(Diagnostic, Debug, Error)]
#[error("Integer literal out of range")]
pub struct NumberRangeError {
    #[source_code]
    pub src: String,

    #[label = "this numeric literal"]
    pub err_span: SourceSpan,
}
