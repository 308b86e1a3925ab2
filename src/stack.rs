use crate::token_type::Token;
use std::fmt::{self};

/// Wraps one token plus the link to the node below it.
#[derive(Debug)]
struct StackNode<'de> {
    token: Token<'de>,
    next: Option<Box<StackNode<'de>>>,
}

/// LIFO sequence of tokens, as an owned singly-linked chain.
///
/// The stack owns every token currently pushed; `pop` hands ownership back
/// to the caller.
#[derive(Debug)]
pub struct Stack<'de> {
    top: Option<Box<StackNode<'de>>>,
    count: usize,
}

impl<'de> Stack<'de> {
    pub fn new() -> Self {
        Self { top: None, count: 0 }
    }

    /// Push `token` above the current top; ownership transfers to the stack.
    pub fn push(&mut self, token: Token<'de>) {
        self.top = Some(Box::new(StackNode { token, next: self.top.take() }));
        self.count += 1;
    }

    /// Detach and return the top token, or `None` if the stack is empty.
    /// An empty stack is a valid state, not a fault.
    pub fn pop(&mut self) -> Option<Token<'de>> {
        let node = self.top.take()?;
        self.top = node.next;
        self.count -= 1;
        Some(node.token)
    }

    /// Borrow the top token without detaching it.
    pub fn peek(&self) -> Option<&Token<'de>> {
        self.top.as_deref().map(|node| &node.token)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// Walk the tokens from top to bottom without mutating the stack.
    pub fn iter(&self) -> StackIter<'_, 'de> {
        StackIter { walker: self.top.as_deref() }
    }
}

impl Default for Stack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Stack<'_> {
    // pop node by node so a deep stack cannot overflow in the default
    // recursive Box drop
    fn drop(&mut self) {
        let mut walker = self.top.take();
        while let Some(mut node) = walker {
            walker = node.next.take();
        }
    }
}

pub struct StackIter<'a, 'de> {
    walker: Option<&'a StackNode<'de>>,
}

impl<'a, 'de> Iterator for StackIter<'a, 'de> {
    type Item = &'a Token<'de>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.walker?;
        self.walker = node.next.as_deref();
        Some(&node.token)
    }
}

impl fmt::Display for Stack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "|-----Program Stack")?;
        write!(f, "|")?;
        for token in self.iter() {
            write!(f, " {}", token.print_form())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_type::TokenType;

    fn value(n: i64) -> Token<'static> {
        Token { origin: "", offset: 0, kind: TokenType::VALUE(n) }
    }

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = Stack::new();
        stack.push(value(1));
        stack.push(value(2));
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.pop().map(|t| t.kind), Some(TokenType::VALUE(2)));
        assert_eq!(stack.pop().map(|t| t.kind), Some(TokenType::VALUE(1)));
        assert_eq!(stack.len(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_reports_empty() {
        let mut stack = Stack::new();
        assert!(stack.pop().is_none());
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn push_pop_round_trip_restores_count() {
        let mut stack = Stack::new();
        stack.push(value(7));
        let before = stack.len();

        stack.push(value(9));
        let popped = stack.pop().unwrap();
        assert_eq!(popped.kind, TokenType::VALUE(9));
        assert_eq!(stack.len(), before);
    }

    #[test]
    fn peek_does_not_mutate() {
        let mut stack = Stack::new();
        stack.push(value(3));
        assert_eq!(stack.peek().map(|t| &t.kind), Some(&TokenType::VALUE(3)));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek().map(|t| &t.kind), Some(&TokenType::VALUE(3)));
    }

    #[test]
    fn iter_walks_top_to_bottom() {
        let mut stack = Stack::new();
        stack.push(value(8));
        stack.push(value(1));
        stack.push(value(4));

        let seen: Vec<_> = stack.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            seen,
            vec![TokenType::VALUE(4), TokenType::VALUE(1), TokenType::VALUE(8)]
        );
        // traversal left the stack untouched
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn display_prints_top_first() {
        let mut stack = Stack::new();
        stack.push(value(8));
        stack.push(value(4));
        assert_eq!(stack.to_string(), "|-----Program Stack\n| 4 8\n");
    }
}
