use crate::error::{MergeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "transmerge.json";
const DEFAULT_LOCALE_PREFIX: &str = "values";
const DEFAULT_STRINGS_FILE: &str = "strings.xml";

const DEFAULT_IDENTIFIERS: &[&str] = &[
    "enable_reverse_lookup",
    "enable_reverse_lookup_summary",
    "enable_forward_lookup",
    "enable_forward_lookup_summary",
    "enable_people_lookup",
    "enable_people_lookup_summary",
    "forward_lookup_provider_title",
    "people_lookup_provider_title",
    "reverse_lookup_provider_title",
    "lookup_settings_label",
    "lookup_settings_description",
    "lookup_disclaimer",
];

/// An identifier whose merged copy is stored under a suffixed name, so it does
/// not collide with an entry of the same name already in the destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameRule {
    pub identifier: String,
    pub suffix: String,
}

impl RenameRule {
    pub fn renamed(&self) -> String {
        format!("{}{}", self.identifier, self.suffix)
    }
}

/// Merge configuration, stored as `transmerge.json` next to the tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeConfig {
    /// Directories whose name starts with this prefix are locale directories
    #[serde(default = "default_locale_prefix")]
    pub locale_prefix: String,

    /// Resource file looked up inside every locale directory
    #[serde(default = "default_strings_file")]
    pub strings_file: String,

    /// Identifiers to merge, in the order they are written to the block
    #[serde(default = "default_identifiers")]
    pub identifiers: Vec<String>,

    #[serde(default = "default_renamed")]
    pub renamed: Option<RenameRule>,
}

fn default_locale_prefix() -> String {
    DEFAULT_LOCALE_PREFIX.to_string()
}

fn default_strings_file() -> String {
    DEFAULT_STRINGS_FILE.to_string()
}

fn default_identifiers() -> Vec<String> {
    DEFAULT_IDENTIFIERS.iter().map(|s| s.to_string()).collect()
}

fn default_renamed() -> Option<RenameRule> {
    Some(RenameRule {
        identifier: "lookup_settings_description".to_string(),
        suffix: "_merged".to_string(),
    })
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            locale_prefix: default_locale_prefix(),
            strings_file: default_strings_file(),
            identifiers: default_identifiers(),
            renamed: default_renamed(),
        }
    }
}

impl MergeConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_file(config_path)
    }

    /// Load config from an explicit file, which must exist
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MergeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: MergeConfig =
            serde_json::from_str(&content).map_err(MergeError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MergeError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MergeError::Serialization)?;
        fs::write(config_path, content).map_err(MergeError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.locale_prefix.is_empty() {
            return Err(MergeError::Config("locale_prefix cannot be empty".into()));
        }
        if self.strings_file.is_empty() {
            return Err(MergeError::Config("strings_file cannot be empty".into()));
        }
        if self.identifiers.is_empty() {
            return Err(MergeError::Config("identifiers cannot be empty".into()));
        }

        let mut seen = HashSet::new();
        for id in &self.identifiers {
            if id.is_empty() {
                return Err(MergeError::Config("identifiers cannot contain an empty name".into()));
            }
            if !seen.insert(id.as_str()) {
                return Err(MergeError::Config(format!("duplicate identifier: {}", id)));
            }
        }

        if let Some(rule) = &self.renamed {
            if !seen.contains(rule.identifier.as_str()) {
                return Err(MergeError::Config(format!(
                    "renamed identifier {} is not in the identifier list",
                    rule.identifier
                )));
            }
            if rule.suffix.is_empty() {
                return Err(MergeError::Config("rename suffix cannot be empty".into()));
            }
        }

        Ok(())
    }

    /// The rename rule for `identifier`, if it is the renamed one
    pub fn rename_for(&self, identifier: &str) -> Option<&RenameRule> {
        self.renamed
            .as_ref()
            .filter(|rule| rule.identifier == identifier)
    }
}
