//! DigitalOcean provider module
//!
//! Parses the `digitalocean` directive and resolves placeholders in the API
//! token. Accepted forms:
//!
//! ```text
//! digitalocean <api_token>
//!
//! digitalocean {
//!     api_token <api_token>
//! }
//! ```

use dnsplug_core::{
    DirectiveError, DirectiveErrorKind, Dispenser, ProvisionContext, ProvisionError,
};
use tracing::debug;

use crate::config::ProviderConfig;

/// Registry key of the DigitalOcean module
pub const MODULE_ID: &str = "dns.providers.digitalocean";

const API_TOKEN: &str = "API token";

/// DigitalOcean DNS provider module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provider {
    pub config: ProviderConfig,
}

impl Provider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn api_token(&self) -> &str {
        self.config.api_token()
    }

    pub fn into_config(self) -> ProviderConfig {
        self.config
    }

    /// Read the provider's stanza(s) from the dispenser.
    ///
    /// The token may come from the directive's single argument or from one
    /// `api_token` line in its block, never both. A surplus value after
    /// `api_token` is read as the next sub-directive name and rejected as
    /// unrecognized.
    pub fn unmarshal_directive(&mut self, d: &mut Dispenser) -> Result<(), DirectiveError> {
        let mut token: Option<String> = None;

        while d.next() {
            if d.is_structural() {
                return Err(d.err(DirectiveErrorKind::UnexpectedToken(d.val().to_string())));
            }
            debug!(directive = d.val(), file = d.file(), line = d.line(), "Parsing provider stanza");

            if d.next_arg() {
                if token.is_some() {
                    return Err(d.err(DirectiveErrorKind::AlreadySet(API_TOKEN)));
                }
                token = Some(d.val().to_string());
            }
            if d.next_arg() {
                return Err(d.arg_err());
            }

            let nesting = d.nesting();
            while d.next_block(nesting) {
                let name = d.val().to_string();
                match name.as_str() {
                    "api_token" => {
                        if token.is_some() {
                            return Err(d.err(DirectiveErrorKind::AlreadySet(API_TOKEN)));
                        }
                        if !d.next_arg() {
                            return Err(d.err(DirectiveErrorKind::MissingValue(API_TOKEN)));
                        }
                        token = Some(d.val().to_string());
                    }
                    _ => return Err(d.err(DirectiveErrorKind::UnrecognizedSubdirective(name))),
                }
            }
        }

        match token {
            Some(token) if !token.is_empty() => {
                self.config.api_token = token;
                Ok(())
            }
            _ => Err(d.err(DirectiveErrorKind::MissingValue(API_TOKEN))),
        }
    }

    /// Expand placeholders in the API token. Values without placeholders are
    /// left untouched; unresolvable placeholders fail provisioning.
    pub fn provision(&mut self, ctx: &ProvisionContext) -> Result<(), ProvisionError> {
        let resolved = ctx.replacer().replace_or_err(&self.config.api_token)?;
        if resolved.is_empty() {
            return Err(ProvisionError::EmptyValue(API_TOKEN));
        }
        if resolved != self.config.api_token {
            debug!("Expanded placeholders in DigitalOcean API token");
        }
        self.config.api_token = resolved;
        Ok(())
    }
}
