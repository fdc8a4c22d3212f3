use super::ConfigError;
use serde_yaml::Value;

/// An ordered sequence of keys leading through the experiment config to a
/// task's or driver's YAML block. Built once from the dot-separated CLI
/// string; sub-step suffixes are appended with [`KeyPath::child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let keys: Vec<String> = raw.split('.').map(str::to_string).collect();
        if keys.iter().any(|key| key.is_empty()) {
            return Err(ConfigError::Workflow(format!(
                "key path `{raw}` must be non-empty dot-separated keys"
            )));
        }
        Ok(Self(keys))
    }

    pub fn child(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.to_string());
        Self(keys)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    fn prefix(&self, len: usize) -> String {
        self.0[..len].join(".")
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Walk `path` through the config, key by key. Every intermediate value must
/// be a mapping; the error names the longest prefix that could be attempted.
pub fn resolve<'a>(root: &'a Value, path: &KeyPath) -> Result<&'a Value, ConfigError> {
    let mut current = root;
    for (idx, key) in path.keys().iter().enumerate() {
        let mapping = current.as_mapping().ok_or_else(|| ConfigError::InvalidPath {
            prefix: path.prefix(idx),
        })?;
        current = mapping
            .get(key.as_str())
            .ok_or_else(|| ConfigError::MissingKey {
                prefix: path.prefix(idx + 1),
            })?;
    }
    Ok(current)
}

/// Resolve `path` and require a string scalar at the terminus.
pub fn resolve_string(root: &Value, path: &KeyPath) -> Result<String, ConfigError> {
    let value = resolve(root, path)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Expected {
            prefix: path.to_string(),
            expected: "a string".to_string(),
        })
}

/// Resolve `path` and require a sequence of string scalars at the terminus.
pub fn resolve_string_sequence(root: &Value, path: &KeyPath) -> Result<Vec<String>, ConfigError> {
    let value = resolve(root, path)?;
    let sequence = value.as_sequence().ok_or_else(|| ConfigError::Expected {
        prefix: path.to_string(),
        expected: "a sequence".to_string(),
    })?;
    sequence
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ConfigError::Expected {
                    prefix: path.to_string(),
                    expected: "a sequence of strings".to_string(),
                })
        })
        .collect()
}
