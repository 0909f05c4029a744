//! Cursor over the tokens of one or more directive stanzas.
//!
//! Modules drive the dispenser themselves: `next` moves to the next token on
//! any line, `next_arg` only to the next token on the current line, and
//! `next_block` walks the sub-directives of a `{ ... }` block.

use super::lexer::{lex, Token};
use crate::error::{DirectiveError, DirectiveErrorKind, LexError};

#[derive(Debug, Clone)]
pub struct Dispenser {
    file: String,
    tokens: Vec<Token>,
    /// `None` until the first call to `next`
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    pub fn new(file: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            file: file.into(),
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Lex `input` and wrap the tokens in a dispenser
    pub fn from_text(file: impl Into<String>, input: &str) -> Result<Self, LexError> {
        let file = file.into();
        let tokens = lex(&file, input)?;
        Ok(Self::new(file, tokens))
    }

    /// Dispenser over inline text, named `Testfile` in error messages
    pub fn for_test(input: &str) -> Result<Self, LexError> {
        Self::from_text("Testfile", input)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    /// Text of the current token, empty before the first `next`
    pub fn val(&self) -> &str {
        self.current().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// Line of the current token (or of the last token once exhausted)
    pub fn line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(0)
    }

    /// Whether the current token is a structural `{` or `}`
    pub fn is_structural(&self) -> bool {
        self.current().map(Token::is_structural).unwrap_or(false)
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Advance to the next token regardless of line. Returns false at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map(|c| c + 1).unwrap_or(0);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    fn next_on_same_line(&mut self) -> bool {
        let Some(c) = self.cursor else {
            return self.next();
        };
        match (self.tokens.get(c), self.tokens.get(c + 1)) {
            (Some(curr), Some(next)) if next.line == curr.last_line() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Advance to the next argument on the current line. Braces are not
    /// arguments; the cursor stays put when one follows.
    pub fn next_arg(&mut self) -> bool {
        let saved = self.cursor;
        if !self.next_on_same_line() {
            return false;
        }
        if self.is_structural() {
            self.cursor = saved;
            return false;
        }
        true
    }

    /// Iterate the sub-directives of the block that follows the current line.
    ///
    /// Call in a loop with the nesting level recorded before the loop:
    /// `let n = d.nesting(); while d.next_block(n) { ... }`. Each iteration
    /// leaves the cursor on the next token inside the block.
    pub fn next_block(&mut self, initial_nesting: usize) -> bool {
        if self.nesting > initial_nesting {
            if !self.next() {
                return false;
            }
            if self.current().map(Token::is_close_brace).unwrap_or(false) {
                self.nesting -= 1;
            } else if self.current().map(Token::is_open_brace).unwrap_or(false) {
                self.nesting += 1;
            }
            return self.nesting > initial_nesting;
        }

        let saved = self.cursor;
        if !self.next_on_same_line() {
            return false;
        }
        if !self.current().map(Token::is_open_brace).unwrap_or(false) {
            self.cursor = saved;
            return false;
        }
        if !self.next() {
            return false;
        }
        if self.current().map(Token::is_close_brace).unwrap_or(false) {
            // empty block
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Build an error at the current position
    pub fn err(&self, kind: DirectiveErrorKind) -> DirectiveError {
        DirectiveError {
            file: self.file.clone(),
            line: self.line(),
            kind,
        }
    }

    /// Error for a line that carries more arguments than expected
    pub fn arg_err(&self) -> DirectiveError {
        self.err(DirectiveErrorKind::WrongArgumentCount {
            after: self.val().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_arg_stays_on_line() {
        let mut d = Dispenser::for_test("digitalocean a b\nnext c").unwrap();
        assert!(d.next());
        assert_eq!(d.val(), "digitalocean");
        assert!(d.next_arg());
        assert_eq!(d.val(), "a");
        assert!(d.next_arg());
        assert_eq!(d.val(), "b");
        assert!(!d.next_arg());
        assert_eq!(d.val(), "b");
        assert!(d.next());
        assert_eq!(d.val(), "next");
        assert_eq!(d.line(), 2);
    }

    #[test]
    fn test_next_arg_does_not_consume_brace() {
        let mut d = Dispenser::for_test("digitalocean tok {\n}").unwrap();
        d.next();
        assert!(d.next_arg());
        assert!(!d.next_arg());
        assert_eq!(d.val(), "tok");
    }

    #[test]
    fn test_next_block_walks_subdirectives() {
        let mut d = Dispenser::for_test("digitalocean {\n api_token a\n other b c\n}").unwrap();
        d.next();
        let nesting = d.nesting();
        let mut seen = Vec::new();
        while d.next_block(nesting) {
            let name = d.val().to_string();
            let mut args = Vec::new();
            while d.next_arg() {
                args.push(d.val().to_string());
            }
            seen.push((name, args));
        }
        assert_eq!(
            seen,
            vec![
                ("api_token".to_string(), vec!["a".to_string()]),
                ("other".to_string(), vec!["b".to_string(), "c".to_string()]),
            ]
        );
        assert_eq!(d.nesting(), 0);
        assert!(!d.next());
    }

    #[test]
    fn test_next_block_single_line_and_empty() {
        let mut d = Dispenser::for_test("digitalocean { api_token a }").unwrap();
        d.next();
        assert!(d.next_block(0));
        assert_eq!(d.val(), "api_token");
        assert!(d.next_arg());
        assert!(!d.next_arg());
        assert!(!d.next_block(0));

        let mut d = Dispenser::for_test("digitalocean {}").unwrap();
        d.next();
        assert!(!d.next_block(0));
        assert_eq!(d.nesting(), 0);
    }

    #[test]
    fn test_next_block_without_block() {
        let mut d = Dispenser::for_test("digitalocean tok\nother").unwrap();
        d.next();
        d.next_arg();
        assert!(!d.next_block(0));
        assert_eq!(d.val(), "tok");
    }

    #[test]
    fn test_errors_carry_position() {
        let mut d = Dispenser::for_test("digitalocean\n  tok extra").unwrap();
        d.next();
        d.next();
        d.next_arg();
        let err = d.arg_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.to_string(),
            "Testfile:2 - Error during parsing: wrong argument count or unexpected line ending after 'extra'"
        );
    }
}
