use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// The signed-in user. Identity comes from the login provider; only the
/// fields shown in the dashboard header are kept.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct UserProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_sheet_timeout_secs() -> u64 {
    10
}

fn default_hidden_sheets() -> Vec<String> {
    vec!["Transacciones".to_string(), "Config".to_string()]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// Deployed web app URL of the user's spreadsheet.
    pub webapp_url: String,
    /// Timeout for the transactions fetch.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for listing sheets and reading import sheets.
    #[serde(default = "default_sheet_timeout_secs")]
    pub sheet_timeout_secs: u64,
    /// Sheets that are never offered for profit analysis.
    #[serde(default = "default_hidden_sheets")]
    pub hidden_sheets: Vec<String>,
}

impl SourceConfig {
    pub fn new(webapp_url: &str) -> Self {
        Self {
            webapp_url: webapp_url.to_string(),
            timeout_secs: default_timeout_secs(),
            sheet_timeout_secs: default_sheet_timeout_secs(),
            hidden_sheets: default_hidden_sheets(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserProfile,
    pub source: Option<SourceConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "sheetdash", "sheetdash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let config_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config file to {}", path.display()))?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// The configured source, or an error asking the user to run setup.
    pub fn require_source(&self) -> Result<&SourceConfig> {
        match &self.source {
            Some(source) if !source.webapp_url.trim().is_empty() => Ok(source),
            _ => bail!("No spreadsheet is linked yet. Run `sheetdash setup --url <WEBAPP_URL>` first"),
        }
    }
}
