//! Context handed to modules during provisioning

use crate::replacer::Replacer;

/// Host-supplied capabilities available while modules are provisioned
#[derive(Debug, Clone, Default)]
pub struct ProvisionContext {
    replacer: Replacer,
}

impl ProvisionContext {
    pub fn new(replacer: Replacer) -> Self {
        Self { replacer }
    }

    /// Context that expands `{env.*}` from the process environment
    pub fn from_process_env() -> Self {
        Self::new(Replacer::new())
    }

    pub fn replacer(&self) -> &Replacer {
        &self.replacer
    }

    pub fn replacer_mut(&mut self) -> &mut Replacer {
        &mut self.replacer
    }
}
