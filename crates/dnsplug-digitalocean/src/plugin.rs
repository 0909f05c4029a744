//! Module descriptor and registration for the DigitalOcean provider

use std::any::Any;

use dnsplug_core::{
    DirectiveError, DnsProviderModule, Dispenser, ModuleInfo, ModuleRegistry, ProvisionContext,
    ProvisionError, RegistryError,
};
use tracing::debug;

use crate::provider::{Provider, MODULE_ID};

fn new_module() -> Box<dyn DnsProviderModule> {
    Box::new(Provider::new())
}

impl Provider {
    /// Static identity and factory used by the host registry
    pub fn module_info() -> ModuleInfo {
        ModuleInfo {
            id: MODULE_ID,
            new: new_module,
        }
    }
}

impl DnsProviderModule for Provider {
    fn module_info(&self) -> ModuleInfo {
        Provider::module_info()
    }

    fn unmarshal_directive(&mut self, dispenser: &mut Dispenser) -> Result<(), DirectiveError> {
        Provider::unmarshal_directive(self, dispenser)
    }

    fn provision(&mut self, context: &ProvisionContext) -> Result<(), ProvisionError> {
        Provider::provision(self, context)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Register the DigitalOcean module with a host registry
pub fn register(registry: &mut ModuleRegistry) -> Result<(), RegistryError> {
    registry.register(Provider::module_info())?;
    debug!(module = MODULE_ID, "DigitalOcean provider registered");
    Ok(())
}
