//! Core contracts shared by the host and DNS provider modules
//!
//! - [`module`]: module identity, the provider capability trait and the registry
//! - [`directive`]: lexer and dispenser for directive-style config text
//! - [`replacer`]: `{scope.name}` placeholder expansion
//! - [`provision`]: the context passed to modules when they are provisioned

pub mod directive;
pub mod error;
pub mod module;
pub mod provision;
pub mod replacer;

pub use directive::{Dispenser, Token, TokenKind};
pub use error::{
    DirectiveError, DirectiveErrorKind, LexError, PlaceholderError, ProvisionError, RegistryError,
};
pub use module::{DnsProviderModule, ModuleFactory, ModuleId, ModuleInfo, ModuleRegistry};
pub use provision::ProvisionContext;
pub use replacer::Replacer;
