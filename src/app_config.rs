use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils;
use crate::quotes::convention::resolve;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language tag (e.g. "en")
    pub source_language: String,

    /// Author of the source segments
    #[serde(default = "default_source_author")]
    pub source_author: String,

    /// Target language tag (e.g. "pt", "pt-br")
    pub target_language: String,

    /// Author recorded for the translated segments
    #[serde(default = "default_target_author")]
    pub target_author: String,

    /// Quotation convention of the source text, if not the language default
    #[serde(default)]
    pub source_convention: Option<String>,

    /// Quotation convention of the target text, if not the language default
    #[serde(default)]
    pub target_convention: Option<String>,

    /// Translation engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Glossary settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Directory of `<lang>.txt` apostrophe-exception lists
    #[serde(default)]
    pub apostrophe_directory: Option<PathBuf>,

    /// Rewrites applied to source text before it is sent to the engine
    #[serde(default)]
    pub source_transforms: Vec<TransformRule>,

    /// Rewrites applied to engine output after quote conversion
    #[serde(default)]
    pub target_transforms: Vec<TransformRule>,

    /// Replace straight ASCII quotes in the source with curly quotes
    #[serde(default)]
    pub curly_source: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineProvider {
    #[default]
    DeepL,
    /// Offline engine that echoes its input
    Mock,
}

impl EngineProvider {
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Mock => "Mock",
        }
    }

    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepL => "deepl".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for EngineProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for EngineProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid engine type: {}", s)),
        }
    }
}

/// Translation engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub provider: EngineProvider,

    /// API key; read from `auth_file` when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// File holding the API key
    #[serde(default = "default_auth_file")]
    pub auth_file: PathBuf,

    /// Service URL
    #[serde(default = "default_deepl_endpoint")]
    pub endpoint: String,

    /// DeepL formality setting
    #[serde(default = "default_formality")]
    pub formality: String,

    /// DeepL tag handling; markers are XML-like so this is normally "xml"
    #[serde(default = "default_tag_handling")]
    pub tag_handling: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: EngineProvider::default(),
            api_key: String::new(),
            auth_file: default_auth_file(),
            endpoint: default_deepl_endpoint(),
            formality: default_formality(),
            tag_handling: default_tag_handling(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// The API key, inline or from the auth file
    pub fn get_api_key(&self) -> Result<String> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_string());
        }

        let key = std::fs::read_to_string(&self.auth_file)
            .with_context(|| format!("Failed to read auth file: {:?}", self.auth_file))?;
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(anyhow!("Auth file is empty: {:?}", self.auth_file));
        }
        Ok(key)
    }
}

/// Glossary configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossaryConfig {
    /// Directory holding `<glossary name>.kvg` files
    #[serde(default = "default_glossary_directory")]
    pub directory: PathBuf,

    /// Author used in the glossary name; defaults to the target author
    #[serde(default)]
    pub author: Option<String>,

    /// Re-upload the glossary before translating
    #[serde(default)]
    pub update: bool,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            directory: default_glossary_directory(),
            author: None,
            update: false,
        }
    }
}

/// Ordered regex rewrite
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransformRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl TransformRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_author() -> String {
    "sujato".to_string()
}

fn default_target_author() -> String {
    "ebt-deepl".to_string()
}

fn default_auth_file() -> PathBuf {
    PathBuf::from("local/deepl.auth")
}

fn default_deepl_endpoint() -> String {
    "https://api-free.deepl.com".to_string()
}

fn default_formality() -> String {
    "more".to_string()
}

fn default_tag_handling() -> String {
    "xml".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_glossary_directory() -> PathBuf {
    PathBuf::from("glossary")
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Convention tag for the source text
    pub fn source_convention_tag(&self) -> &str {
        self.source_convention.as_deref().unwrap_or(&self.source_language)
    }

    /// Convention tag for the target text
    pub fn target_convention_tag(&self) -> &str {
        self.target_convention.as_deref().unwrap_or(&self.target_language)
    }

    /// Author used in the glossary name
    pub fn glossary_author(&self) -> &str {
        self.glossary.author.as_deref().unwrap_or(&self.target_author)
    }

    /// Copy of this configuration translating from another source.
    ///
    /// Source convention and source transforms describe the first
    /// source's language and are not carried over.
    pub fn for_source(&self, language: &str, author: &str) -> Self {
        Config {
            source_language: language.to_string(),
            source_author: author.to_string(),
            source_convention: None,
            source_transforms: Vec::new(),
            ..self.clone()
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = language_utils::get_language_name(&self.source_language)?;
        let _target_name = language_utils::get_language_name(&self.target_language)?;

        resolve(self.source_convention_tag())?;
        resolve(self.target_convention_tag())?;

        for rule in self.source_transforms.iter().chain(self.target_transforms.iter()) {
            Regex::new(&rule.pattern)
                .with_context(|| format!("Invalid transform pattern: {}", rule.pattern))?;
        }

        if self.engine.provider == EngineProvider::DeepL {
            self.engine
                .get_api_key()
                .context("Translation API key is required for DeepL engine")?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            source_author: default_source_author(),
            target_language: "pt".to_string(),
            target_author: default_target_author(),
            source_convention: None,
            target_convention: None,
            engine: EngineConfig::default(),
            glossary: GlossaryConfig::default(),
            apostrophe_directory: None,
            source_transforms: Vec::new(),
            target_transforms: Vec::new(),
            curly_source: false,
            log_level: LogLevel::default(),
        }
    }
}
