// src/config.rs
use crate::error::{Result, StrangerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Policy for combining the degrees of multiple reaching definitions.
/// `Max` is pessimistic (better recall); `Min` trades recall for precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Max,
    Min,
}

/// Naming conventions consulted by the call classifier. Kept as plain data
/// so the heuristics can be tested and swapped without touching traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Receiver type names ending with this mark factory calls.
    #[serde(default = "default_factory_suffix")]
    pub factory_type_suffix: String,
    /// Receiver reference names ending with this mark factory calls.
    #[serde(default = "default_factory_suffix")]
    pub factory_name_suffix: String,
    /// A receiver reference exactly matching this marks factory calls
    /// (case-sensitive).
    #[serde(default = "default_factory_name")]
    pub factory_name: String,
    /// Receiver type names ending with this mark builder chains.
    #[serde(default = "default_builder_suffix")]
    pub builder_type_suffix: String,
    /// Method name prefixes recognized as accessors.
    #[serde(default = "default_accessor_prefixes")]
    pub accessor_prefixes: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            factory_type_suffix: default_factory_suffix(),
            factory_name_suffix: default_factory_suffix(),
            factory_name: default_factory_name(),
            builder_type_suffix: default_builder_suffix(),
            accessor_prefixes: default_accessor_prefixes(),
        }
    }
}

fn default_factory_suffix() -> String { "Factory".to_string() }
fn default_factory_name() -> String { "factory".to_string() }
fn default_builder_suffix() -> String { "Builder".to_string() }

fn default_accessor_prefixes() -> Vec<String> {
    vec!["get".into(), "is".into(), "has".into()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// How many foreign hops are tolerated before an access is reported.
    /// Must be positive.
    #[serde(default = "default_trust_radius")]
    pub trust_radius: usize,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub naming: NamingConfig,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            trust_radius: default_trust_radius(),
            aggregation: Aggregation::Max,
            naming: NamingConfig::default(),
        }
    }
}

const fn default_trust_radius() -> usize { 1 }

/// File selection patterns applied after extension filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// On-disk shape of `stranger.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrangerToml {
    #[serde(default)]
    pub rules: RuleConfig,
    #[serde(default)]
    pub files: FileConfig,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub rules: RuleConfig,
    pub include_patterns: Vec<Regex>,
    pub exclude_patterns: Vec<Regex>,
    pub verbose: bool,
}

impl Config {
    /// Loads `stranger.toml` from `dir` if present, otherwise defaults.
    ///
    /// # Errors
    /// Returns an error on unreadable files, TOML syntax errors, invalid
    /// regexes, or a zero trust radius.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("stranger.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| StrangerError::Io {
            source,
            path: path.clone(),
        })?;
        let parsed: StrangerToml = toml::from_str(&raw)?;
        Self::from_toml(parsed)
    }

    /// Builds a runtime config from a parsed TOML document.
    ///
    /// # Errors
    /// Returns an error for a zero trust radius or invalid patterns.
    pub fn from_toml(parsed: StrangerToml) -> Result<Self> {
        if parsed.rules.trust_radius == 0 {
            return Err(StrangerError::InvalidConfig(
                "trust_radius must be positive".to_string(),
            ));
        }
        Ok(Self {
            rules: parsed.rules,
            include_patterns: compile_patterns(&parsed.files.include)?,
            exclude_patterns: compile_patterns(&parsed.files.exclude)?,
            verbose: false,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns.iter().map(|p| Ok(Regex::new(p)?)).collect()
}
