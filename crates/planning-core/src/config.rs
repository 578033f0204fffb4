use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneConfig {
    /// Move phase directories into the milestone archive even without
    /// `--archive-phases`.
    #[serde(default)]
    pub archive_phases: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    #[serde(default = "default_true")]
    pub check_plan_numbering: bool,
    #[serde(default = "default_true")]
    pub check_wave_frontmatter: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            check_plan_numbering: true,
            check_wave_frontmatter: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub milestone: MilestoneConfig,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig::default(),
            milestone: MilestoneConfig::default(),
            consistency: ConsistencyConfig::default(),
        }
    }
}

impl Config {
    /// Load `.planning/config.yaml`; a project without one gets the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        let Some(data) = crate::io::read_optional(&path)? else {
            return Ok(Self::default());
        };
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if let Some(name) = &self.project.name {
            if name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "project.name is set but empty".to_string(),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
