pub mod modules;
pub mod provision;
pub mod validate;

pub use modules::ModulesCommand;
pub use provision::ProvisionCommand;
pub use validate::ValidateCommand;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use dnsplug_core::directive::{lex, stanzas};
use dnsplug_core::{
    DirectiveError, DirectiveErrorKind, DnsProviderModule, Dispenser, ModuleId, ModuleRegistry,
    Token,
};
use dnsplug_digitalocean::Provider;
use tracing::debug;

/// Namespace the directive names of DNS provider modules live in
const PROVIDER_NAMESPACE: &str = "dns.providers";

/// Registry with every provider module this binary ships
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    dnsplug_digitalocean::register(&mut registry)?;
    Ok(registry)
}

/// Parse every provider stanza of `path`. Repeated directives for the same
/// provider are handed to its module together.
pub fn load_modules(
    registry: &ModuleRegistry,
    path: &Path,
) -> anyhow::Result<Vec<(ModuleId, Box<dyn DnsProviderModule>)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let file = path.display().to_string();
    let tokens = lex(&file, &content)?;

    let mut grouped: BTreeMap<ModuleId, Vec<Token>> = BTreeMap::new();
    for stanza in stanzas(&tokens) {
        let Some(directive) = stanza.first() else {
            continue;
        };
        // A block must open on its directive's line
        if directive.is_structural() {
            return Err(DirectiveError {
                file,
                line: directive.line,
                kind: DirectiveErrorKind::UnexpectedToken(directive.text.clone()),
            }
            .into());
        }
        let id = format!("{}.{}", PROVIDER_NAMESPACE, directive.text);
        let Ok(id) = ModuleId::parse(&id) else {
            debug!(directive = %directive.text, "Skipping non-provider directive");
            continue;
        };
        if registry.get(id.as_str()).is_none() {
            debug!(directive = %directive.text, "Skipping directive without a registered module");
            continue;
        }
        grouped.entry(id).or_default().extend(stanza);
    }

    if grouped.is_empty() {
        anyhow::bail!("No DNS provider directive found in {}", path.display());
    }

    let mut modules = Vec::with_capacity(grouped.len());
    for (id, tokens) in grouped {
        let mut module = registry.new_instance(id.as_str())?;
        let mut dispenser = Dispenser::new(file.clone(), tokens);
        module
            .unmarshal_directive(&mut dispenser)
            .with_context(|| format!("Invalid configuration for module {}", id))?;
        modules.push((id, module));
    }
    Ok(modules)
}

/// Masked, display-safe view of a module's configuration
pub fn describe(module: &dyn DnsProviderModule) -> serde_json::Value {
    match module.as_any().downcast_ref::<Provider>() {
        Some(provider) => provider.config.masked(),
        None => serde_json::json!({ "module": module.module_info().id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn token_of(module: &dyn DnsProviderModule) -> String {
        module
            .as_any()
            .downcast_ref::<Provider>()
            .unwrap()
            .api_token()
            .to_string()
    }

    #[test]
    fn test_load_block_form() {
        let file = config_file(
            "# dns settings\nhostname example.com\ndigitalocean {\n    api_token dop_v1_token\n}\n",
        );
        let registry = build_registry().unwrap();
        let modules = load_modules(&registry, file.path()).unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].0.as_str(), "dns.providers.digitalocean");
        assert_eq!(token_of(modules[0].1.as_ref()), "dop_v1_token");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let file = config_file("digitalocean mytoken extraarg\n");
        let registry = build_registry().unwrap();
        let err = load_modules(&registry, file.path()).unwrap_err();

        let chain = format!("{:#}", err);
        assert!(chain.contains("Invalid configuration for module dns.providers.digitalocean"));
        assert!(chain.contains("wrong argument count or unexpected line ending after 'extraarg'"));
    }

    #[test]
    fn test_repeated_directives_conflict() {
        let file = config_file("digitalocean a\ndigitalocean {\n api_token b\n}\n");
        let registry = build_registry().unwrap();
        let err = load_modules(&registry, file.path()).unwrap_err();

        assert!(format!("{:#}", err).contains("API token already set"));
    }

    #[test]
    fn test_no_provider_directive() {
        let file = config_file("hostname example.com\n");
        let registry = build_registry().unwrap();
        let err = load_modules(&registry, file.path()).unwrap_err();

        assert!(err.to_string().starts_with("No DNS provider directive found"));
    }

    #[test]
    fn test_lex_errors_surface() {
        let file = config_file("digitalocean {\n api_token a\n");
        let registry = build_registry().unwrap();
        let err = load_modules(&registry, file.path()).unwrap_err();

        assert!(err.to_string().contains("block opened here is never closed"));
    }

    #[test]
    fn test_block_on_its_own_line_is_rejected() {
        let registry = build_registry().unwrap();

        let file = config_file("digitalocean tok\n{\n api_token other\n}\n");
        let err = load_modules(&registry, file.path()).unwrap_err();
        assert!(err
            .to_string()
            .ends_with(":2 - Error during parsing: unexpected token '{'"));

        let file = config_file("digitalocean\n{\n api_token a\n}\n");
        let err = load_modules(&registry, file.path()).unwrap_err();
        assert!(err
            .to_string()
            .ends_with(":2 - Error during parsing: unexpected token '{'"));
    }

    #[test]
    fn test_unregistered_directives_are_skipped() {
        let file = config_file("cloudflare cf_token
digitalocean do_token
route53 {
 key k
}
");
        let registry = build_registry().unwrap();
        let modules = load_modules(&registry, file.path()).unwrap();

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].0.as_str(), "dns.providers.digitalocean");
        assert_eq!(token_of(modules[0].1.as_ref()), "do_token");
    }

    #[test]
    fn test_provision_expands_set_values() {
        let file = config_file("digitalocean {
 api_token {app.do_token}
}
");
        let cmd = ProvisionCommand {
            config: file.path().to_path_buf(),
            values: vec!["app.do_token=dop_v1_0123456789abcdef".to_string()],
        };

        let provisioned = cmd.run().unwrap();
        assert_eq!(provisioned.len(), 1);
        assert_eq!(provisioned[0].0.as_str(), "dns.providers.digitalocean");
        assert_eq!(provisioned[0].1["api_token"], "dop_...cdef");
    }

    #[test]
    fn test_provision_expands_process_env() {
        std::env::set_var("DNSPLUG_CLI_TEST_DO_TOKEN", "dop_v1_fromenvironment");
        let file = config_file("digitalocean {env.DNSPLUG_CLI_TEST_DO_TOKEN}
");
        let cmd = ProvisionCommand {
            config: file.path().to_path_buf(),
            values: Vec::new(),
        };

        let provisioned = cmd.run().unwrap();
        assert_eq!(provisioned[0].1["api_token"], "dop_...ment");
    }

    #[test]
    fn test_provision_rejects_malformed_set() {
        let file = config_file("digitalocean tok
");
        let cmd = ProvisionCommand {
            config: file.path().to_path_buf(),
            values: vec!["app.do_token".to_string()],
        };

        let err = cmd.run().unwrap_err();
        assert_eq!(err.to_string(), "Expected KEY=VALUE, got 'app.do_token'");
    }

    #[test]
    fn test_provision_reports_unresolved_placeholder() {
        let file = config_file("digitalocean {app.missing}
");
        let cmd = ProvisionCommand {
            config: file.path().to_path_buf(),
            values: Vec::new(),
        };

        let chain = format!("{:#}", cmd.run().unwrap_err());
        assert!(chain.contains("Failed to provision module dns.providers.digitalocean"));
        assert!(chain.contains("unrecognized placeholder {app.missing}"));
    }

    #[test]
    fn test_modules_listing() {
        let plain = ModulesCommand { json: false }.render().unwrap();
        assert_eq!(plain, "dns.providers.digitalocean");

        let json = ModulesCommand { json: true }.render().unwrap();
        let ids: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(ids, vec!["dns.providers.digitalocean".to_string()]);
    }

    #[test]
    fn test_describe_masks_token() {
        let provider = Provider::with_config(dnsplug_digitalocean::ProviderConfig::new(
            "dop_v1_0123456789abcdef",
        ));
        let described = describe(&provider);
        assert_eq!(described["api_token"], "dop_...cdef");
    }
}
