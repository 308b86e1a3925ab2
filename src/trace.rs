//! in src/trace.rs
//!
//! Per-step program trace, printed after every evaluator transition.
//! Read-only over the stack and symbol table.

use crate::stack::Stack;
use crate::symtab::SymbolTable;
use std::io::{self, Write};

pub struct Tracer<W: Write> {
    out: W,
}

impl<W: Write> Tracer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The banner printed once, before step 1, showing the untouched
    /// token stream.
    pub fn header(&mut self, filename: &str, remaining: &str) -> io::Result<()> {
        writeln!(self.out, "######### Beginning Program ({filename}) ###########")?;
        writeln!(self.out)?;
        writeln!(self.out, ".-------------------")?;
        writeln!(self.out, "| Program Step = {:2}", 0)?;
        self.remaining_tokens(remaining)?;
        writeln!(self.out, "o-------------------")
    }

    pub fn step_header(&mut self, step: usize) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, ".-------------------")?;
        writeln!(self.out, "| Program Step = {step:2}")
    }

    /// The PRINT instruction's output line.
    pub fn step_output(&mut self, value: i64) -> io::Result<()> {
        writeln!(self.out, "|-----Program Output")?;
        writeln!(self.out, "| {value}")
    }

    pub fn step_footer(
        &mut self,
        symtab: &SymbolTable,
        stack: &Stack<'_>,
        remaining: &str,
    ) -> io::Result<()> {
        write!(self.out, "{symtab}")?;
        write!(self.out, "{stack}")?;
        self.remaining_tokens(remaining)?;
        writeln!(self.out, "o-------------------")
    }

    fn remaining_tokens(&mut self, remaining: &str) -> io::Result<()> {
        writeln!(self.out, "|-----Remaining Tokens")?;
        writeln!(self.out, "| {remaining}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_shows_step_zero_and_program_text() {
        let mut buf = Vec::new();
        Tracer::new(&mut buf).header("prog.rpn", "3 4 +").unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Beginning Program (prog.rpn)"));
        assert!(text.contains("| Program Step =  0"));
        assert!(text.contains("| 3 4 +"));
    }

    #[test]
    fn footer_includes_table_and_stack() {
        let mut symtab = SymbolTable::new();
        symtab.put("x", 5);
        let stack = Stack::new();

        let mut buf = Vec::new();
        Tracer::new(&mut buf).step_footer(&symtab, &stack, "").unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("|-----Symbol Table [1 size/10 cap]"));
        assert!(text.contains("x: 5"));
        assert!(text.contains("|-----Program Stack"));
    }
}
