//! Directive-style configuration text: lexing and token dispensing
//!
//! A stanza looks like:
//!
//! ```text
//! digitalocean <arg> {
//!     api_token <value>
//! }
//! ```

pub mod dispenser;
pub mod lexer;

pub use dispenser::Dispenser;
pub use lexer::{lex, stanzas, Token, TokenKind};
