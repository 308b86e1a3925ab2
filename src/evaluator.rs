//! in src/evaluator.rs
//!
//! Contains the token-dispatch state machine. Each token fully determines
//! one transition; the only state carried between tokens is the stack, the
//! symbol table, and a step counter.

use crate::{
    lexer::Lexer,
    stack::Stack,
    symtab::SymbolTable,
    token_type::{Token, TokenType},
    trace::Tracer,
};
use miette::{Diagnostic, IntoDiagnostic, SourceSpan};
use std::io::Write;
use thiserror::Error;

/// An instruction needed more operands than the stack held
#[derive(Diagnostic, Debug, Error)]
#[error("Stack underflow: '{instruction}' needs {needed} operand(s), stack holds {held}")]
pub struct StackUnderflowError {
    #[source_code]
    pub src: String,

    pub instruction: String,
    pub needed: usize,
    pub held: usize,

    #[label = "this instruction"]
    pub err_span: SourceSpan,
}

/// A variable was read before anything was assigned to it
#[derive(Diagnostic, Debug, Error)]
#[error("Undefined variable '{name}'")]
pub struct UndefinedVariableError {
    #[source_code]
    pub src: String,

    pub name: String,

    #[label = "not bound at this point"]
    pub err_span: SourceSpan,
}

/// Division with a zero right-hand operand
#[derive(Diagnostic, Debug, Error)]
#[error("Division by zero")]
pub struct DivisionByZeroError {
    #[source_code]
    pub src: String,

    #[label = "right-hand operand is zero"]
    pub err_span: SourceSpan,
}

/// Assignment popped a target that is not a variable
#[derive(Diagnostic, Debug, Error)]
#[error("Assignment target must be a variable")]
pub struct InvalidAssignTargetError {
    #[source_code]
    pub src: String,

    #[label = "cannot be assigned to"]
    pub err_span: SourceSpan,
}

/// A stacked token of non-operand kind reached resolution
#[derive(Diagnostic, Debug, Error)]
#[error("Token cannot be used as an operand")]
pub struct UnexpectedOperandError {
    #[source_code]
    pub src: String,

    #[label = "not a value or variable"]
    pub err_span: SourceSpan,
}

/// Drives one full run: pulls tokens, dispatches on kind, and reports each
/// step to the tracer. Aborts on the first failed step.
#[derive(Debug)]
pub struct Evaluator<'de> {
    /// the whole program line, kept for diagnostic spans
    whole: &'de str,
    stack: Stack<'de>,
    symtab: SymbolTable,
    step: usize,
}

impl<'de> Evaluator<'de> {
    pub fn new(input: &'de str) -> Self {
        Self { whole: input, stack: Stack::new(), symtab: SymbolTable::new(), step: 0 }
    }

    pub fn stack(&self) -> &Stack<'de> {
        &self.stack
    }

    pub fn symtab(&self) -> &SymbolTable {
        &self.symtab
    }

    /// Evaluate every token the lexer yields, tracing after each step.
    ///
    /// Lexer errors and dispatch failures both abort the run; no further
    /// tokens are processed after a failure.
    pub fn run<W: Write>(
        &mut self,
        mut lexer: Lexer<'de>,
        tracer: &mut Tracer<W>,
    ) -> Result<(), miette::Error> {
        while let Some(token) = lexer.next() {
            let token = token?;

            self.step += 1;
            tracer.step_header(self.step).into_diagnostic()?;

            if let Some(printed) = self.dispatch(token)? {
                tracer.step_output(printed).into_diagnostic()?;
            }

            tracer
                .step_footer(&self.symtab, &self.stack, lexer.remaining())
                .into_diagnostic()?;
        }
        Ok(())
    }

    /// Process one token. Returns the value emitted by a PRINT step, if any.
    fn dispatch(&mut self, token: Token<'de>) -> Result<Option<i64>, miette::Error> {
        match token.kind {
            // operands go straight onto the stack; variables are resolved
            // lazily, when a value is needed
            TokenType::VALUE(_) | TokenType::IDENT => {
                self.stack.push(token);
                Ok(None)
            },

            TokenType::PLUS | TokenType::MINUS | TokenType::STAR | TokenType::SLASH => {
                let top = self.pop_operand(&token, 2)?;
                let second = self.pop_operand(&token, 2)?;

                let rhs = self.resolve(&top)?;
                let lhs = self.resolve(&second)?;

                // the earlier-pushed operand is the left-hand side
                let result = match token.kind {
                    TokenType::PLUS => lhs.wrapping_add(rhs),
                    TokenType::MINUS => lhs.wrapping_sub(rhs),
                    TokenType::STAR => lhs.wrapping_mul(rhs),
                    TokenType::SLASH => {
                        if rhs == 0 {
                            return Err(DivisionByZeroError {
                                src: self.whole.to_string(),
                                err_span: span_of(&top),
                            }
                            .into());
                        }
                        // i64 division truncates toward zero
                        lhs.wrapping_div(rhs)
                    },
                    _ => unreachable!("operator arm matched a non-operator"),
                };

                self.stack.push(Token {
                    kind: TokenType::VALUE(result),
                    offset: token.offset,
                    origin: token.origin,
                });
                Ok(None)
            },

            TokenType::EQUAL => {
                let top = self.pop_operand(&token, 2)?;
                let target = self.pop_operand(&token, 2)?;

                if target.kind != TokenType::IDENT {
                    return Err(InvalidAssignTargetError {
                        src: self.whole.to_string(),
                        err_span: span_of(&target),
                    }
                    .into());
                }

                let value = self.resolve(&top)?;
                self.symtab.put(target.origin, value);
                Ok(None)
            },

            TokenType::PRINT => {
                let top = self.pop_operand(&token, 1)?;
                let value = self.resolve(&top)?;
                Ok(Some(value))
            },
        }
    }

    /// Resolve a stacked token to an integer: literals yield their payload,
    /// variables are looked up by name.
    fn resolve(&self, token: &Token<'de>) -> Result<i64, miette::Error> {
        match token.kind {
            TokenType::VALUE(n) => Ok(n),
            TokenType::IDENT => {
                self.symtab.get(token.origin).ok_or_else(|| {
                    UndefinedVariableError {
                        src: self.whole.to_string(),
                        name: token.origin.to_string(),
                        err_span: span_of(token),
                    }
                    .into()
                })
            },
            _ => Err(UnexpectedOperandError {
                src: self.whole.to_string(),
                err_span: span_of(token),
            }
            .into()),
        }
    }

    fn pop_operand(
        &mut self,
        instruction: &Token<'de>,
        needed: usize,
    ) -> Result<Token<'de>, miette::Error> {
        let held = self.stack.len();
        self.stack.pop().ok_or_else(|| {
            StackUnderflowError {
                src: self.whole.to_string(),
                instruction: instruction.origin.to_string(),
                needed,
                held,
                err_span: span_of(instruction),
            }
            .into()
        })
    }
}

fn span_of(token: &Token<'_>) -> SourceSpan {
    SourceSpan::from(token.offset..token.offset + token.origin.len())
}
