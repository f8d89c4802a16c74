use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Service configuration, usually loaded from JSON or from a flat property map.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IoConfig {
    pub html: HtmlConfig,
    pub jsonld: JsonLdConfig,
}

/// Presentation of the HTML page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Handlebars template file replacing the built-in page.
    pub template: Option<PathBuf>,
    /// Stylesheet URLs.
    pub css: Vec<String>,
    /// Script URLs.
    pub js: Vec<String>,
    /// Favicon URL.
    pub icon: Option<String>,
}

/// Which custom JSON-LD contexts may be fetched and how they are cached.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JsonLdConfig {
    /// Context IRIs allowed verbatim.
    pub allowed_contexts: BTreeSet<String>,
    /// IRI prefixes under which any context is allowed.
    pub allowed_context_domains: BTreeSet<String>,
    /// Number of loaded contexts kept in memory.
    pub cache_size: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for JsonLdConfig {
    fn default() -> Self {
        JsonLdConfig {
            allowed_contexts: BTreeSet::new(),
            allowed_context_domains: BTreeSet::new(),
            cache_size: 100,
            fetch_timeout_secs: 10,
        }
    }
}

impl JsonLdConfig {
    /// Whether the given profile IRI may be used as a custom context.
    pub fn allows(&self, profile: &str) -> bool {
        self.allowed_contexts.contains(profile) || self.allowed_context_domains.iter().any(|d| profile.starts_with(d))
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

impl IoConfig {
    /// Builds a configuration from `key=value` properties.
    /// Recognized keys: `icon`, `template`, `css`, `js`, `jsonld.contexts`, `jsonld.domains`, `jsonld.cache`
    /// and `jsonld.timeout`; lists are comma separated, unknown keys are ignored.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let mut config = IoConfig::default();
        for (key, value) in properties {
            match key.as_str() {
                "icon" => config.html.icon = Some(value.trim().to_owned()),
                "template" => config.html.template = Some(PathBuf::from(value.trim())),
                "css" => config.html.css = split_list(value).collect(),
                "js" => config.html.js = split_list(value).collect(),
                "jsonld.contexts" => config.jsonld.allowed_contexts = split_list(value).collect(),
                "jsonld.domains" => config.jsonld.allowed_context_domains = split_list(value).collect(),
                "jsonld.cache" => {
                    config.jsonld.cache_size = value
                        .trim()
                        .parse()
                        .map_err(|e| Error::Config(format!("invalid jsonld.cache value {value:?}: {e}")))?;
                }
                "jsonld.timeout" => {
                    config.jsonld.fetch_timeout_secs = value
                        .trim()
                        .parse()
                        .map_err(|e| Error::Config(format!("invalid jsonld.timeout value {value:?}: {e}")))?;
                }
                _ => log::debug!("ignoring unknown property {key}"),
            }
        }
        Ok(config)
    }

    /// Reads a JSON configuration file, missing sections and fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs_err::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Config(format!("invalid configuration {}: {e}", path.display())))
    }
}
