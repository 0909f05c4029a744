//! Placeholder expansion for configuration values
//!
//! Placeholders have the form `{scope.name}`:
//!
//! - `{env.NAME}` reads an environment variable
//! - `{system.os}`, `{system.arch}`, `{system.wd}` are built in
//! - anything registered with [`Replacer::set`]
//!
//! `\{` and `\}` produce literal braces. An unclosed `{`, an empty `{}` and
//! braces around text containing whitespace are left as they are.

use std::collections::HashMap;

use tracing::debug;

use crate::error::PlaceholderError;

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
}

#[derive(Debug, Clone)]
pub struct Replacer {
    values: HashMap<String, String>,
    env: EnvSource,
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Replacer {
    /// Replacer backed by the process environment
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            env: EnvSource::Process,
        }
    }

    /// Replacer whose `{env.*}` lookups only see `vars`
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: HashMap::new(),
            env: EnvSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Register a host-scoped value, e.g. `set("http.vars.region", "ams3")`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Resolve a single placeholder key (without braces)
    pub fn get(&self, key: &str) -> Result<String, PlaceholderError> {
        if let Some(name) = key.strip_prefix("env.") {
            return self.env_var(name);
        }
        if let Some(value) = self.values.get(key) {
            return Ok(value.clone());
        }
        match key {
            "system.os" => Ok(std::env::consts::OS.to_string()),
            "system.arch" => Ok(std::env::consts::ARCH.to_string()),
            "system.wd" => std::env::current_dir()
                .map(|p| p.display().to_string())
                .map_err(|e| PlaceholderError::WorkingDir(e.to_string())),
            _ => Err(PlaceholderError::Unrecognized(key.to_string())),
        }
    }

    fn env_var(&self, name: &str) -> Result<String, PlaceholderError> {
        if name.is_empty() {
            return Err(PlaceholderError::Unrecognized("env.".to_string()));
        }
        match &self.env {
            EnvSource::Process => match std::env::var(name) {
                Ok(value) => Ok(value),
                Err(std::env::VarError::NotPresent) => {
                    Err(PlaceholderError::UndefinedEnv(name.to_string()))
                }
                Err(std::env::VarError::NotUnicode(_)) => {
                    Err(PlaceholderError::NonUnicodeEnv(name.to_string()))
                }
            },
            EnvSource::Fixed(vars) => vars
                .get(name)
                .cloned()
                .ok_or_else(|| PlaceholderError::UndefinedEnv(name.to_string())),
        }
    }

    /// Expand every placeholder, failing on the first one that cannot be resolved
    pub fn replace_or_err(&self, input: &str) -> Result<String, PlaceholderError> {
        self.expand(input, None)
    }

    /// Expand every placeholder, substituting `fallback` for unresolvable ones
    pub fn replace_all(&self, input: &str, fallback: &str) -> String {
        self.expand(input, Some(fallback))
            .unwrap_or_else(|_| input.to_string())
    }

    fn expand(&self, input: &str, fallback: Option<&str>) -> Result<String, PlaceholderError> {
        if !input.contains('{') && !input.contains('\\') {
            return Ok(input.to_string());
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find(['{', '\\']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with('\\') {
                match tail[1..].chars().next() {
                    Some(c @ ('{' | '}')) => {
                        out.push(c);
                        rest = &tail[2..];
                    }
                    _ => {
                        out.push('\\');
                        rest = &tail[1..];
                    }
                }
                continue;
            }

            let Some(end) = tail.find('}') else {
                out.push_str(tail);
                rest = "";
                break;
            };
            let key = &tail[1..end];
            if key.is_empty() || key.contains('{') || key.contains(char::is_whitespace) {
                out.push('{');
                rest = &tail[1..];
                continue;
            }

            match self.get(key) {
                Ok(value) => out.push_str(&value),
                Err(e) => match fallback {
                    Some(fallback) => {
                        debug!(placeholder = key, error = %e, "Using fallback for placeholder");
                        out.push_str(fallback);
                    }
                    None => return Err(e),
                },
            }
            rest = &tail[end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let replacer = Replacer::with_env([("X", "1")]);
        assert_eq!(replacer.replace_or_err("direct_token").unwrap(), "direct_token");
        assert_eq!(replacer.replace_or_err("").unwrap(), "");
    }

    #[test]
    fn test_env_placeholder() {
        let replacer = Replacer::with_env([("DO_API_TOKEN", "actual_token")]);
        assert_eq!(
            replacer.replace_or_err("{env.DO_API_TOKEN}").unwrap(),
            "actual_token"
        );
        assert_eq!(
            replacer.replace_or_err("Bearer {env.DO_API_TOKEN}!").unwrap(),
            "Bearer actual_token!"
        );
    }

    #[test]
    fn test_host_scoped_values() {
        let mut replacer = Replacer::with_env(Vec::<(String, String)>::new());
        replacer.set("vault.do_token", "from-vault");
        assert_eq!(
            replacer.replace_or_err("{vault.do_token}").unwrap(),
            "from-vault"
        );
        assert_eq!(
            replacer.replace_or_err("{system.os}").unwrap(),
            std::env::consts::OS
        );
    }

    #[test]
    fn test_unresolvable_placeholders() {
        let replacer = Replacer::with_env([("SET", "yes")]);
        assert_eq!(
            replacer.replace_or_err("{env.UNSET_VAR}").unwrap_err(),
            PlaceholderError::UndefinedEnv("UNSET_VAR".to_string())
        );
        assert_eq!(
            replacer.replace_or_err("{nope.key}").unwrap_err(),
            PlaceholderError::Unrecognized("nope.key".to_string())
        );
        assert_eq!(
            replacer.replace_or_err("{nope.key}").unwrap_err().to_string(),
            "unrecognized placeholder {nope.key}"
        );
        assert_eq!(replacer.replace_all("a{nope.key}b", "-"), "a-b");
    }

    #[test]
    fn test_literal_braces() {
        let replacer = Replacer::with_env([("A", "x")]);
        assert_eq!(replacer.replace_or_err(r"\{env.A\}").unwrap(), "{env.A}");
        assert_eq!(replacer.replace_or_err("{}").unwrap(), "{}");
        assert_eq!(replacer.replace_or_err("open{env.A").unwrap(), "open{env.A");
        assert_eq!(replacer.replace_or_err("{a b}").unwrap(), "{a b}");
        assert_eq!(replacer.replace_or_err("{{env.A}}").unwrap(), "{x}");
        assert_eq!(replacer.replace_or_err(r"back\slash").unwrap(), r"back\slash");
    }
}
