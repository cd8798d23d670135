//! Top-level meterbind configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BinderConfig, CatalogConfig};
use crate::errors::ConfigError;
use crate::{Tag, TagSet};

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`METERBIND_*`)
/// 2. Config file (`meterbind.toml` or an explicit path)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MeterBindConfig {
    pub binder: BinderConfig,
    pub kafka_producer: CatalogConfig,
    pub kafka_consumer: CatalogConfig,
    pub threading: CatalogConfig,
}

impl MeterBindConfig {
    /// Load configuration with layered resolution.
    ///
    /// A missing file at an explicit `path` is an error; with `None` the
    /// file layer is skipped.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = path {
            Self::merge_toml_file(&mut config, path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &MeterBindConfig) -> Result<(), ConfigError> {
        validate_tags("binder.tags", &config.binder.tags)?;
        for (field, catalog) in config.catalogs() {
            validate_tags(&format!("{field}.tags"), &catalog.tags)?;
            if let Some(prefix) = &catalog.meter_name_prefix {
                if prefix.chars().any(char::is_whitespace) {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("{field}.meter_name_prefix"),
                        message: "must not contain whitespace".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn catalogs(&self) -> [(&'static str, &CatalogConfig); 3] {
        [
            ("kafka_producer", &self.kafka_producer),
            ("kafka_consumer", &self.kafka_consumer),
            ("threading", &self.threading),
        ]
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut MeterBindConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: MeterBindConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a value.
    fn merge(base: &mut MeterBindConfig, other: &MeterBindConfig) {
        if other.binder.fail_fast.is_some() {
            base.binder.fail_fast = other.binder.fail_fast;
        }
        if !other.binder.tags.is_empty() {
            base.binder.tags = other.binder.tags.clone();
        }

        merge_catalog(&mut base.kafka_producer, &other.kafka_producer);
        merge_catalog(&mut base.kafka_consumer, &other.kafka_consumer);
        merge_catalog(&mut base.threading, &other.threading);
    }

    /// Apply environment variable overrides.
    /// Pattern: `METERBIND_FAIL_FAST`, `METERBIND_TAGS=k=v,k=v`,
    /// `METERBIND_KAFKA_PRODUCER_PREFIX`, `METERBIND_THREADING_ENABLED`, etc.
    fn apply_env_overrides(config: &mut MeterBindConfig) {
        if let Ok(val) = std::env::var("METERBIND_FAIL_FAST") {
            if let Ok(v) = val.parse::<bool>() {
                config.binder.fail_fast = Some(v);
            }
        }
        if let Ok(val) = std::env::var("METERBIND_TAGS") {
            config.binder.tags = parse_tag_list(&val);
        }

        let catalogs = [
            ("KAFKA_PRODUCER", &mut config.kafka_producer),
            ("KAFKA_CONSUMER", &mut config.kafka_consumer),
            ("THREADING", &mut config.threading),
        ];
        for (env_name, catalog) in catalogs {
            if let Ok(val) = std::env::var(format!("METERBIND_{env_name}_PREFIX")) {
                catalog.meter_name_prefix = Some(val);
            }
            if let Ok(val) = std::env::var(format!("METERBIND_{env_name}_ENABLED")) {
                if let Ok(v) = val.parse::<bool>() {
                    catalog.enabled = Some(v);
                }
            }
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn merge_catalog(base: &mut CatalogConfig, other: &CatalogConfig) {
    if other.enabled.is_some() {
        base.enabled = other.enabled;
    }
    if other.meter_name_prefix.is_some() {
        base.meter_name_prefix = other.meter_name_prefix.clone();
    }
    if !other.tags.is_empty() {
        base.tags = other.tags.clone();
    }
}

fn validate_tags(field: &str, tags: &TagSet) -> Result<(), ConfigError> {
    if tags.iter().any(|t| t.key.trim().is_empty()) {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "tag keys must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Parse `k1=v1,k2=v2`. Entries without `=` are skipped.
fn parse_tag_list(raw: &str) -> TagSet {
    raw.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(k, v)| Tag::new(k.trim(), v.trim()))
        .collect()
}
