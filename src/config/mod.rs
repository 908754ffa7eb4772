use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding an explicit config file path.
pub const CONFIG_ENV: &str = "LAZYBEADS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bd: BdConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub custom_commands: Vec<CustomCommand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BdConfig {
    #[serde(default = "default_bd_program")]
    pub program: String,
}

fn default_bd_program() -> String {
    "bd".to_string()
}

impl Default for BdConfig {
    fn default() -> Self {
        Self {
            program: default_bd_program(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    2
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_board_min_column_width")]
    pub board_min_column_width: u16,
    /// Collapse the Closed panel to a one-line summary while unfocused
    #[serde(default = "default_true")]
    pub closed_summary: bool,
    /// Terminal width at which the list view gains a detail pane
    #[serde(default = "default_wide_mode_width")]
    pub wide_mode_width: u16,
}

fn default_board_min_column_width() -> u16 {
    30
}

fn default_true() -> bool {
    true
}

fn default_wide_mode_width() -> u16 {
    80
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            board_min_column_width: default_board_min_column_width(),
            closed_summary: true,
            wide_mode_width: default_wide_mode_width(),
        }
    }
}

/// Where a custom command key is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandContext {
    #[default]
    List,
    Detail,
    Board,
    Global,
}

impl CommandContext {
    /// True when a command declared for `self` fires in `active`.
    pub fn applies_to(&self, active: CommandContext) -> bool {
        *self == CommandContext::Global || *self == active
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail => "detail",
            Self::Board => "board",
            Self::Global => "global",
        }
    }
}

/// User-defined shell command bound to a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCommand {
    /// Single character, optionally prefixed with `ctrl+`
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: CommandContext,
    /// Shell template; `{id}`, `{title}`, `{status}` and `{priority}` are substituted
    pub command: String,
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "lazybeads")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Resolve the config path: explicit argument, then `$LAZYBEADS_CONFIG`,
/// then the platform config directory.
pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = path {
        return Ok(p.to_path_buf());
    }
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => default_config_path(),
    }
}

/// Load configuration. A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = resolve_path(path)?;
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}
