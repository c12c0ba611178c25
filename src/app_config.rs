use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils::{self, DEFAULT_LANGUAGES, LANG_SEPARATOR, SupportedLanguages};
use crate::selector::Audience;

/// Application configuration module
/// This module handles the configuration of a rebuild: where sources live,
/// where derived notebooks go, which languages are produced and how verbose
/// the logger is.
/// Name of the optional configuration file read from the working directory
pub const CONFIG_FILE_NAME: &str = "nbsplit.json";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the source notebooks
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory under which the per-language directories are created
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Language codes to produce variants for, in processing order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Prefix of the student directories (`<prefix><lang>`)
    #[serde(default = "String::new")]
    pub student_prefix: String,

    /// Prefix of the teacher directories (`<prefix><lang>`)
    #[serde(default = "default_teacher_prefix")]
    pub teacher_prefix: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
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
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|code| code.to_string()).collect()
}

fn default_teacher_prefix() -> String {
    "solution-".to_string()
}

impl Config {
    /// Load the configuration from `path` if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No configuration file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for code in &self.languages {
            if code.contains(LANG_SEPARATOR) {
                return Err(anyhow!("Language code {:?} must not contain {:?}", code, LANG_SEPARATOR));
            }
            language_utils::validate_language_code(code)?;
            if !seen.insert(code.as_str()) {
                return Err(anyhow!("Language {:?} is listed more than once", code));
            }
        }

        if self.student_prefix == self.teacher_prefix {
            return Err(anyhow!(
                "Student and teacher prefixes must differ (both are {:?})",
                self.student_prefix
            ));
        }

        Ok(())
    }

    /// Supported languages as a set for the selector
    pub fn supported_languages(&self) -> SupportedLanguages {
        SupportedLanguages::new(self.languages.iter().cloned())
    }

    /// Name of the directory holding the `audience` variants for `language`
    pub fn variant_dir_name(&self, audience: Audience, language: &str) -> String {
        let prefix = match audience {
            Audience::Student => &self.student_prefix,
            Audience::Teacher => &self.teacher_prefix,
        };
        format!("{}{}", prefix, language)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            languages: default_languages(),
            student_prefix: String::new(),
            teacher_prefix: default_teacher_prefix(),
            log_level: LogLevel::default(),
        }
    }
}
