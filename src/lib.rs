pub mod token_type;
pub mod lexer;
pub mod symtab;
pub mod stack;
pub mod evaluator;
pub mod trace;

pub use evaluator::Evaluator;
pub use lexer::Lexer;
pub use stack::Stack;
pub use symtab::SymbolTable;
pub use trace::Tracer;

use miette::{miette, IntoDiagnostic};
use std::io::Write;

/// Programs are one line of at most this many bytes; longer input is
/// rejected at the boundary.
pub const MAX_LINE_LEN: usize = 255;

/// Extract the single program line from raw file contents, enforcing the
/// one-bounded-line contract.
pub fn program_line(contents: &str) -> Result<&str, miette::Error> {
    let line = contents.lines().next().unwrap_or("");
    if line.len() > MAX_LINE_LEN {
        return Err(miette!(
            "Program line is {} bytes, the maximum is {MAX_LINE_LEN}",
            line.len()
        ));
    }
    Ok(line)
}

/// Run one program line end to end, writing the step trace (and any PRINT
/// output) to `out`.
pub fn interpret<W: Write>(line: &str, filename: &str, out: W) -> Result<(), miette::Error> {
    let lexer = Lexer::new(line);
    let mut tracer = Tracer::new(out);
    let mut evaluator = Evaluator::new(line);

    tracer.header(filename, lexer.remaining()).into_diagnostic()?;

    evaluator.run(lexer, &mut tracer)
}
