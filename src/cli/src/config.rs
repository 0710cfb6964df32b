//! CLI configuration loading and validation

use anyhow::{bail, Context, Result};
use scopefilter::{FilterConfig, PlaceholderStyle, ScopeAttribute};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub filter: FilterSection,

    /// Extra accepted columns, keyed by attribute name (`id`, `uid`)
    #[serde(default)]
    pub accept_list: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterSection {
    #[serde(default)]
    pub placeholder: PlaceholderStyle,
    #[serde(default = "default_first_param")]
    pub first_param: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_first_param() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::default(),
            first_param: default_first_param(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.filter_config()
            .validate()
            .context("[filter] section is invalid")?;

        for (attribute, columns) in &self.accept_list {
            if let Err(e) = attribute.parse::<ScopeAttribute>() {
                bail!("accept_list: {}", e);
            }
            for column in columns {
                if column.trim().is_empty() || column.trim() != column {
                    bail!(
                        "accept_list.{} contains an empty or padded column: {:?}",
                        attribute,
                        column
                    );
                }
            }
        }

        Ok(())
    }

    /// Library configuration for the filter engine
    ///
    /// Attribute names that do not parse are skipped; `validate` rejects them
    /// when loading.
    pub fn filter_config(&self) -> FilterConfig {
        let extra_columns = self
            .accept_list
            .iter()
            .filter_map(|(attribute, columns)| {
                attribute
                    .parse::<ScopeAttribute>()
                    .ok()
                    .map(|attribute| (attribute, columns.clone()))
            })
            .collect();

        FilterConfig {
            placeholder: self.filter.placeholder,
            first_param: self.filter.first_param,
            extra_columns,
        }
    }
}
