//! Common error types shared by the host and provider modules

use thiserror::Error;

/// Failure while splitting configuration text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{file}:{line} - Error during parsing: unterminated quoted string")]
    UnterminatedQuote { file: String, line: usize },

    #[error("{file}:{line} - Error during parsing: unexpected '}}'")]
    UnexpectedClosingBrace { file: String, line: usize },

    #[error("{file}:{line} - Error during parsing: block opened here is never closed")]
    UnclosedBlock { file: String, line: usize },
}

/// What went wrong while a module consumed its directive stanza
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveErrorKind {
    /// A required value was never supplied
    #[error("missing {0}")]
    MissingValue(&'static str),

    /// A value that may only be given once was given again
    #[error("{0} already set")]
    AlreadySet(&'static str),

    /// Unknown sub-directive, or a surplus token read where a sub-directive name was expected
    #[error("unrecognized subdirective '{0}'")]
    UnrecognizedSubdirective(String),

    #[error("wrong argument count or unexpected line ending after '{after}'")]
    WrongArgumentCount { after: String },

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
}

/// A directive error pinned to the place in the config text that caused it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}:{line} - Error during parsing: {kind}")]
pub struct DirectiveError {
    pub file: String,
    pub line: usize,
    pub kind: DirectiveErrorKind,
}

/// Placeholder expansion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("unrecognized placeholder {{{0}}}")]
    Unrecognized(String),

    #[error("undefined environment variable '{0}'")]
    UndefinedEnv(String),

    #[error("environment variable '{0}' is not valid unicode")]
    NonUnicodeEnv(String),

    #[error("working directory unavailable: {0}")]
    WorkingDir(String),
}

/// Errors raised while a module is provisioned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("placeholder expansion failed: {0}")]
    Placeholder(#[from] PlaceholderError),

    #[error("{0} is empty after placeholder expansion")]
    EmptyValue(&'static str),
}

/// Module registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid module ID '{id}': {reason}")]
    InvalidModuleId { id: String, reason: &'static str },

    #[error("Module already registered: {0}")]
    DuplicateModule(String),

    #[error("Module not registered: {0}")]
    UnknownModule(String),
}
