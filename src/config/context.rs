use super::ConfigError;
use chrono::{Duration, NaiveDateTime};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Substitution values for `{{ name }}` placeholders embedded in config
/// values. Contexts are composed by layering; a later layer's keys shadow an
/// earlier layer's on collision. Immutable once handed to a dereference call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top of the current context. Right-biased: keys in
    /// `layer` win over keys already present.
    pub fn layer<I, K, V>(mut self, layer: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in layer {
            self.values.insert(key.into(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// The process environment as a context layer, captured once per task.
pub fn environment_layer() -> Vec<(String, String)> {
    std::env::vars().collect()
}

/// Cycle timestamp layer for time-dependent tasks.
pub fn cycle_layer(cycle: NaiveDateTime) -> Vec<(String, String)> {
    vec![
        ("cycle".to_string(), cycle.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ("cycle_ymd".to_string(), cycle.format("%Y%m%d").to_string()),
        ("cycle_hh".to_string(), cycle.format("%H").to_string()),
    ]
}

/// Lead-time layer for time-dependent tasks.
pub fn leadtime_layer(leadtime: Duration) -> Vec<(String, String)> {
    let total = leadtime.num_seconds();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    vec![
        ("leadtime_hh".to_string(), format!("{hours:02}")),
        (
            "leadtime_hms".to_string(),
            format!("{hours:02}:{minutes:02}:{seconds:02}"),
        ),
    ]
}

/// Rewrite every `{{ name }}` placeholder in every string scalar of `value`,
/// recursing through mappings and sequences. Pure: the input tree is never
/// mutated, and identical context yields an identical result.
pub fn dereference(value: &Value, context: &Context) -> Result<Value, ConfigError> {
    match value {
        Value::String(text) => Ok(Value::String(render_template(text, context)?)),
        Value::Sequence(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(dereference(item, context)?);
            }
            Ok(Value::Sequence(rendered))
        }
        Value::Mapping(mapping) => {
            let mut rendered = serde_yaml::Mapping::with_capacity(mapping.len());
            for (key, item) in mapping {
                rendered.insert(key.clone(), dereference(item, context)?);
            }
            Ok(Value::Mapping(rendered))
        }
        other => Ok(other.clone()),
    }
}

/// Rewrite every `{{ name }}` placeholder in one template string. Also used
/// directly for whole-file templates such as `model_configure`.
pub fn render_template(template: &str, context: &Context) -> Result<String, ConfigError> {
    let mut rendered = String::new();
    let mut cursor = template;

    while let Some(start) = cursor.find("{{") {
        rendered.push_str(&cursor[..start]);
        let after_open = &cursor[start + 2..];
        let Some(close_offset) = after_open.find("}}") else {
            return Err(ConfigError::Template {
                reason: format!("unclosed placeholder in `{template}`"),
            });
        };
        let name = after_open[..close_offset].trim();
        if name.is_empty() {
            return Err(ConfigError::Template {
                reason: format!("empty placeholder in `{template}`"),
            });
        }
        let value = context
            .get(name)
            .ok_or_else(|| ConfigError::UnresolvedReference {
                placeholder: name.to_string(),
            })?;
        rendered.push_str(value);
        cursor = &after_open[close_offset + 2..];
    }

    rendered.push_str(cursor);
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_shadow_earlier_ones() {
        let context = Context::new()
            .layer([("k", "first"), ("other", "kept")])
            .layer([("k", "second")]);
        assert_eq!(context.get("k"), Some("second"));
        assert_eq!(context.get("other"), Some("kept"));
    }

    #[test]
    fn render_reports_the_missing_placeholder() {
        let context = Context::new().layer([("CRES", "C403")]);
        let err = render_template("{{ CRES }}/{{ MEMBER }}", &context).unwrap_err();
        match err {
            ConfigError::UnresolvedReference { placeholder } => {
                assert_eq!(placeholder, "MEMBER");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
