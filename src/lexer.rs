use crate::token_type::{NumberRangeError, SingleTokenError, Token, TokenType};
use miette::{Error, SourceSpan};

/// The `Lexer` struct is responsible for tokenizing the program line.
/// It holds the entire input string, the remaining unprocessed part of the
/// string, and the current byte index for tracking the position in the string.
/// The `Lexer` implements the `Iterator` trait, producing tokens one at a
/// time; tokens are never re-exposed once taken.
#[derive(Debug)]
pub struct Lexer<'de> {
    /// holds the entire String
    whole: &'de str,
    /// holds the remainder of the String
    rest: &'de str,
    /// to keep track of the index we're at
    byte: usize,
}

impl<'de> Lexer<'de> {
    /// Creates a new `Lexer` over the given program line.
    pub fn new(input: &'de str) -> Self {
        Self { whole: input, rest: input, byte: 0 }
    }

    /// The not-yet-lexed tail of the program line.
    ///
    /// This is what the per-step trace shows as the remaining tokens; it
    /// shrinks as tokens are taken and never grows back.
    pub fn remaining(&self) -> &'de str {
        self.rest.trim_start()
    }
}

impl<'de> Iterator for Lexer<'de> {
    /// The `Item` type for the `Lexer` iterator is a `Result` containing either a `Token` or an `Error`.
    type Item = Result<Token<'de>, Error>;

    /// If the `Iterator` returns `Err`, it will only return `None`.
    /// Pattern helpful for streaming characters ..
    /// actual lexing happens here
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // must be inside the loop .. since we use chars with byte_index and self.rest updates based on this
            let mut chars = self.rest.chars();

            // get the next char
            let c = chars.next()?;
            // `c_at` represents the byte-index where this character begins at the string
            let c_at = self.byte;
            // holds the current character as a UTF-8 byte slice from the input string
            let c_str = &self.rest[..c.len_utf8()];

            // holds self.rest
            let c_onwards = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            /// type to help us to make sure that we have handled all cases and modularize it
            /// these are multi character tokens
            enum Started {
                /// set of number characters
                Number,
                /// set of characters forming an identifier
                Ident,
            }

            let just = move |kind: TokenType| Some(Ok(Token { kind, offset: c_at, origin: c_str }));

            // TOKEN RECOGNITION
            //
            // Single-character tokens return directly; digit and identifier
            // runs start a multi-character scan below.

            let started = match c {
                '+' => return just(TokenType::PLUS),
                '-' => return just(TokenType::MINUS),
                '*' => return just(TokenType::STAR),
                '/' => return just(TokenType::SLASH),
                '=' => return just(TokenType::EQUAL),
                c if c.is_whitespace() => continue,
                '0'..='9' => Started::Number,
                'a'..='z' | 'A'..='Z' | '_' => Started::Ident,

                _ => {
                    return Some(Err(SingleTokenError {
                        err_span: SourceSpan::from(self.byte - c.len_utf8()..self.byte),
                        src: self.whole.to_string(),
                        token: c,
                    }
                    .into()));
                },
            };

            // MULTI-CHARACTER TOKENS

            break match started {
                Started::Ident => {
                    let first_non_ident = c_onwards
                        .find(|c| !matches!(c, 'a'..='z' | 'A'..='Z' | '_' | '0'..='9'))
                        .unwrap_or(c_onwards.len());

                    let literal = &c_onwards[..first_non_ident];

                    let extra_bytes = literal.len() - c.len_utf8();

                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    // `p` is the print instruction; every other identifier
                    // names a variable
                    let kind = match literal {
                        "p" => TokenType::PRINT,
                        _ => TokenType::IDENT,
                    };

                    Some(Ok(Token { kind, offset: c_at, origin: literal }))
                },
                Started::Number => {
                    let first_non_digit = c_onwards
                        .find(|c| !matches!(c, '0'..='9'))
                        .unwrap_or(c_onwards.len());

                    let literal = &c_onwards[..first_non_digit];

                    let extra_bytes = literal.len() - c.len_utf8();

                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    let n = match literal.parse() {
                        Ok(n) => n,
                        Err(_) => {
                            return Some(Err(NumberRangeError {
                                err_span: SourceSpan::from(c_at..self.byte),
                                src: self.whole.to_string(),
                            }
                            .into()));
                        },
                    };

                    Some(Ok(Token { kind: TokenType::VALUE(n), offset: c_at, origin: literal }))
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenType> {
        Lexer::new(input).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn lexes_assignment_program() {
        assert_eq!(
            kinds("x 5 = x p"),
            vec![
                TokenType::IDENT,
                TokenType::VALUE(5),
                TokenType::EQUAL,
                TokenType::IDENT,
                TokenType::PRINT,
            ]
        );
    }

    #[test]
    fn lexes_operators() {
        assert_eq!(
            kinds("+ - * /"),
            vec![TokenType::PLUS, TokenType::MINUS, TokenType::STAR, TokenType::SLASH]
        );
    }

    #[test]
    fn multi_digit_literal() {
        let mut lexer = Lexer::new("1234 q");
        let tok = lexer.next().unwrap().unwrap();
        assert_eq!(tok.kind, TokenType::VALUE(1234));
        assert_eq!(tok.origin, "1234");
        assert_eq!(tok.offset, 0);
    }

    #[test]
    fn print_keyword_is_exact() {
        // `p` alone is the print instruction, `pp` is a variable
        assert_eq!(kinds("p"), vec![TokenType::PRINT]);
        assert_eq!(kinds("pp"), vec![TokenType::IDENT]);
    }

    #[test]
    fn remaining_shrinks_as_tokens_are_taken() {
        let mut lexer = Lexer::new("3 4 +");
        assert_eq!(lexer.remaining(), "3 4 +");
        lexer.next().unwrap().unwrap();
        assert_eq!(lexer.remaining(), "4 +");
        lexer.next().unwrap().unwrap();
        assert_eq!(lexer.remaining(), "+");
        lexer.next().unwrap().unwrap();
        assert_eq!(lexer.remaining(), "");
        assert!(lexer.next().is_none());
    }

    #[test]
    fn rejects_unknown_character() {
        let mut lexer = Lexer::new("3 ? 4");
        lexer.next().unwrap().unwrap();
        let err = lexer.next().unwrap().unwrap_err();
        assert!(err.downcast_ref::<SingleTokenError>().is_some());
    }

    #[test]
    fn rejects_out_of_range_literal() {
        let mut lexer = Lexer::new("99999999999999999999999999");
        let err = lexer.next().unwrap().unwrap_err();
        assert!(err.downcast_ref::<NumberRangeError>().is_some());
    }
}
