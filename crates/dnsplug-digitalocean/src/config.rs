//! DigitalOcean provider configuration
//!
//! DigitalOcean uses a single Personal Access Token with read/write scope.
//! Create at: https://cloud.digitalocean.com/account/api/tokens

use serde::{Deserialize, Serialize};

/// Credentials handed to the DigitalOcean DNS client
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Personal Access Token, or a placeholder such as `{env.DO_API_TOKEN}`
    /// until the module is provisioned
    pub api_token: String,
}

impl ProviderConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Masked representation for display
    pub fn masked(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "digitalocean",
            "api_token": mask_string(&self.api_token),
        })
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &mask_string(&self.api_token))
            .finish()
    }
}

/// Mask a string, showing only first 4 and last 4 characters
pub(crate) fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 8 {
        "***".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
