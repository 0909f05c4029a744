//! Module system for pluggable DNS provider registration
//!
//! Providers describe themselves with a [`ModuleInfo`] (a namespaced ID and a
//! factory). The host collects descriptors in a [`ModuleRegistry`] and
//! instantiates modules by ID when it meets their directive in the config.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::directive::Dispenser;
use crate::error::{DirectiveError, ProvisionError, RegistryError};
use crate::provision::ProvisionContext;

/// Namespaced module identifier, e.g. `dns.providers.digitalocean`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Validate and wrap an identifier: non-empty dot-separated labels of
    /// lowercase ASCII letters, digits and underscores.
    pub fn parse(id: &str) -> Result<Self, RegistryError> {
        let invalid = |reason| RegistryError::InvalidModuleId {
            id: id.to_string(),
            reason,
        };

        if id.is_empty() {
            return Err(invalid("must not be empty"));
        }
        for label in id.split('.') {
            if label.is_empty() {
                return Err(invalid("contains an empty label"));
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(invalid("labels may only contain [a-z0-9_]"));
            }
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last label (`dns.providers`)
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }

    /// The last label (`digitalocean`)
    pub fn name(&self) -> &str {
        self.0.rsplit_once('.').map(|(_, name)| name).unwrap_or(&self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Factory producing a fresh, empty module instance
pub type ModuleFactory = fn() -> Box<dyn DnsProviderModule>;

/// Static module metadata consumed by the host at startup
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    pub id: &'static str,
    pub new: ModuleFactory,
}

impl ModuleInfo {
    pub fn module_id(&self) -> Result<ModuleId, RegistryError> {
        ModuleId::parse(self.id)
    }
}

/// Capability set every DNS provider module implements
pub trait DnsProviderModule: Send + Sync + fmt::Debug {
    /// Identity and factory of this module
    fn module_info(&self) -> ModuleInfo;

    /// Populate the module from its directive stanza
    fn unmarshal_directive(&mut self, dispenser: &mut Dispenser) -> Result<(), DirectiveError>;

    /// Resolve deferred values once configuration is loaded
    fn provision(&mut self, context: &ProvisionContext) -> Result<(), ProvisionError>;

    /// Downcast support for hosts that need the concrete type
    fn as_any(&self) -> &dyn Any;
}

/// Registry of known modules, keyed by ID
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<ModuleId, ModuleInfo>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module descriptor. IDs must be valid and unique.
    pub fn register(&mut self, info: ModuleInfo) -> Result<(), RegistryError> {
        let id = info.module_id()?;
        if self.modules.contains_key(&id) {
            return Err(RegistryError::DuplicateModule(id.to_string()));
        }
        debug!(module = %id, "Registering module");
        self.modules.insert(id, info);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ModuleInfo> {
        let id = ModuleId::parse(id).ok()?;
        self.modules.get(&id)
    }

    /// Instantiate a registered module through its factory
    pub fn new_instance(&self, id: &str) -> Result<Box<dyn DnsProviderModule>, RegistryError> {
        let info = self
            .get(id)
            .ok_or_else(|| RegistryError::UnknownModule(id.to_string()))?;
        debug!(module = id, "Instantiating module");
        Ok((info.new)())
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.keys()
    }

    /// Modules whose namespace is exactly `namespace`
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a ModuleInfo> {
        self.modules
            .iter()
            .filter(move |(id, _)| id.namespace() == namespace)
            .map(|(_, info)| info)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
