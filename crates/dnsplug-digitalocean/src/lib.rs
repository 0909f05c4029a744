//! DigitalOcean DNS provider module
//!
//! Exposes the `dns.providers.digitalocean` module: it parses the
//! `digitalocean` directive into a [`ProviderConfig`] and expands placeholders
//! in the API token at provisioning time. The resulting token is consumed by
//! the DigitalOcean DNS client; this crate performs no network calls.
//!
//! ```ignore
//! use dnsplug_core::{Dispenser, ModuleRegistry, ProvisionContext};
//! use dnsplug_digitalocean::Provider;
//!
//! let mut registry = ModuleRegistry::new();
//! dnsplug_digitalocean::register(&mut registry)?;
//!
//! let mut provider = Provider::new();
//! let mut d = Dispenser::from_text("dnsplug.conf", "digitalocean {env.DO_API_TOKEN}")?;
//! provider.unmarshal_directive(&mut d)?;
//! provider.provision(&ProvisionContext::from_process_env())?;
//! ```

pub mod config;
pub mod plugin;
pub mod provider;

pub use config::ProviderConfig;
pub use plugin::register;
pub use provider::{Provider, MODULE_ID};
