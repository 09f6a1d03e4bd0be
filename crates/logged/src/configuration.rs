use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::interceptor::Level;
use crate::Error;

fn default_descriptor_cache_capacity() -> u64 {
    1024
}

/// Overrides of the values attached to a call site.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfiguration {
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub logger: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Overrides by call site id (`<declaring type>::<method>`)
    #[serde(default)]
    pub sites: HashMap<String, SiteConfiguration>,

    /// Static variables added to the diagnostic context of every call
    #[serde(default)]
    pub context: HashMap<String, String>,

    #[serde(default = "default_descriptor_cache_capacity")]
    pub descriptor_cache_capacity: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sites: HashMap::new(),
            context: HashMap::new(),
            descriptor_cache_capacity: default_descriptor_cache_capacity(),
        }
    }
}

impl Configuration {
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(e.to_string()))?;

        serde_json::from_slice(&data).map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn site(&self, id: &str) -> Option<&SiteConfiguration> {
        self.sites.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_every_field() {
        let configuration: Configuration = serde_json::from_str("{}").unwrap();

        assert_eq!(configuration, Configuration::default());
        assert_eq!(configuration.descriptor_cache_capacity, 1024);
    }

    #[test]
    fn should_parse_site_overrides() {
        let configuration: Configuration = serde_json::from_str(
            r#"{
            "sites": {
                "shop::Orders::placeOrder": { "level": "info", "json": true }
            },
            "context": { "app": "shop" }
        }"#,
        )
        .unwrap();

        let site = configuration.site("shop::Orders::placeOrder").unwrap();
        assert_eq!(site.level, Some(Level::Info));
        assert_eq!(site.json, Some(true));
        assert!(site.message.is_none());
        assert_eq!(configuration.context.get("app"), Some(&"shop".to_string()));
    }

    #[test]
    fn should_report_missing_file() {
        let result = Configuration::from_file("/does/not/exist.json");

        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
