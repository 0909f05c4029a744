//! Splits directive-style configuration text into line-numbered tokens.

use crate::error::LexError;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word, may contain placeholders like `{env.NAME}`
    Word,
    /// `"quoted"` or `` `raw` `` text; never structural
    Quoted,
    OpenBrace,
    CloseBrace,
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// 1-indexed line the token starts on
    pub line: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_open_brace(&self) -> bool {
        self.kind == TokenKind::OpenBrace
    }

    pub fn is_close_brace(&self) -> bool {
        self.kind == TokenKind::CloseBrace
    }

    pub fn is_structural(&self) -> bool {
        self.is_open_brace() || self.is_close_brace()
    }

    /// Line the token ends on; quoted tokens may span lines
    pub fn last_line(&self) -> usize {
        match self.kind {
            TokenKind::Quoted => self.line + self.text.matches('\n').count(),
            _ => self.line,
        }
    }
}

struct Lexer<'a> {
    file: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    tokens: Vec<Token>,
    word: String,
    word_line: usize,
    /// Unclosed `{` inside the current bare word
    word_depth: usize,
    /// Lines of currently open blocks
    open_blocks: Vec<usize>,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a str, input: &'a str) -> Self {
        Self {
            file,
            chars: input.chars().peekable(),
            line: 1,
            tokens: Vec::new(),
            word: String::new(),
            word_line: 1,
            word_depth: 0,
            open_blocks: Vec::new(),
        }
    }

    fn flush_word(&mut self) {
        if !self.word.is_empty() {
            self.tokens.push(Token {
                text: std::mem::take(&mut self.word),
                line: self.word_line,
                kind: TokenKind::Word,
            });
        }
        self.word_depth = 0;
    }

    fn push_char(&mut self, ch: char) {
        if self.word.is_empty() {
            self.word_line = self.line;
        }
        self.word.push(ch);
    }

    fn open_block(&mut self) {
        self.open_blocks.push(self.line);
        self.tokens.push(Token {
            text: "{".to_string(),
            line: self.line,
            kind: TokenKind::OpenBrace,
        });
    }

    fn close_block(&mut self) -> Result<(), LexError> {
        if self.open_blocks.pop().is_none() {
            return Err(LexError::UnexpectedClosingBrace {
                file: self.file.to_string(),
                line: self.line,
            });
        }
        self.tokens.push(Token {
            text: "}".to_string(),
            line: self.line,
            kind: TokenKind::CloseBrace,
        });
        Ok(())
    }

    fn quoted(&mut self, delimiter: char) -> Result<(), LexError> {
        let start = self.line;
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => {
                    return Err(LexError::UnterminatedQuote {
                        file: self.file.to_string(),
                        line: start,
                    })
                }
                Some(ch) if ch == delimiter => break,
                Some('\\') if delimiter == '"' && self.chars.peek() == Some(&'"') => {
                    self.chars.next();
                    text.push('"');
                }
                Some(ch) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    text.push(ch);
                }
            }
        }
        self.tokens.push(Token {
            text,
            line: start,
            kind: TokenKind::Quoted,
        });
        Ok(())
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.chars.next() {
            match ch {
                '\n' => {
                    self.flush_word();
                    self.line += 1;
                }
                c if c.is_whitespace() => self.flush_word(),
                '#' if self.word.is_empty() => {
                    while let Some(&next) = self.chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '"' | '`' if self.word.is_empty() => self.quoted(ch)?,
                '{' => {
                    // `{` opens a block unless it starts a placeholder like `{env.X}`
                    let starts_placeholder = matches!(
                        self.chars.peek(),
                        Some(&next) if !next.is_whitespace() && next != '{' && next != '}'
                    );
                    if self.word.is_empty() && !starts_placeholder {
                        self.open_block();
                    } else {
                        self.word_depth += 1;
                        self.push_char('{');
                    }
                }
                '}' => {
                    // Inside a word, `}` only closes a block at the word's end
                    let mid_word = !self.word.is_empty()
                        && matches!(
                            self.chars.peek(),
                            Some(&next) if !next.is_whitespace() && next != '}'
                        );
                    if self.word_depth > 0 {
                        self.word_depth -= 1;
                        self.push_char('}');
                    } else if mid_word {
                        self.push_char('}');
                    } else {
                        self.flush_word();
                        self.close_block()?;
                    }
                }
                _ => self.push_char(ch),
            }
        }
        self.flush_word();

        if let Some(line) = self.open_blocks.last() {
            return Err(LexError::UnclosedBlock {
                file: self.file.to_string(),
                line: *line,
            });
        }
        Ok(self.tokens)
    }
}

/// Tokenize configuration text. `file` is only used in error messages.
pub fn lex(file: &str, input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(file, input).run()
}

/// Group tokens into top-level stanzas: each stanza starts at a token that
/// begins a new line outside of any block.
pub fn stanzas(tokens: &[Token]) -> Vec<Vec<Token>> {
    let mut result: Vec<Vec<Token>> = Vec::new();
    let mut depth = 0usize;
    let mut last_line = 0usize;

    for token in tokens {
        let starts_stanza = depth == 0 && (result.is_empty() || token.line > last_line);
        if starts_stanza {
            result.push(Vec::new());
        }
        if token.is_open_brace() {
            depth += 1;
        } else if token.is_close_brace() {
            depth = depth.saturating_sub(1);
        }
        last_line = token.last_line();
        if let Some(current) = result.last_mut() {
            current.push(token.clone());
        }
    }

    result
}
