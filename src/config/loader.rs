//! Configuration loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Defaults = 0,
    Project = 1,
    User = 2,
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover configuration directories from the environment and defaults.
    pub fn discover() -> Self {
        let user_dir = std::env::var("TASKPAD_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".taskpad")));

        let project_dir = std::env::var("TASKPAD_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("taskpad")));

        Self {
            project_dir,
            user_dir,
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn tier_file(&self, tier: ConfigTier) -> Option<PathBuf> {
        let dir = match tier {
            ConfigTier::Project => self.project_dir.as_ref(),
            ConfigTier::User => self.user_dir.as_ref(),
            ConfigTier::Defaults | ConfigTier::Environment => None,
        }?;
        Some(dir.join(CONFIG_FILE))
    }
}

/// Loads and merges configuration.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Files that contributed, in merge order.
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load from the discovered tiers and the process environment.
    ///
    /// `explicit` (from `--config`) wins over `TASKPAD_CONFIG_PATH`; either one
    /// replaces the project and user files.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("TASKPAD_CONFIG_PATH").map(PathBuf::from));
        Self::load_with(ConfigPaths::discover(), explicit, |key| {
            std::env::var(key).ok()
        })
    }

    /// Load with explicit directories and no environment overrides.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        Self::load_with(paths, None, |_| None)
    }

    /// Load with explicit directories, explicit file and an environment lookup.
    pub fn load_with<F>(paths: ConfigPaths, explicit: Option<PathBuf>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();

        if let Some(path) = explicit {
            // An explicitly named file must exist
            layers.push(read_yaml(&path)?);
            sources.push(path);
        } else {
            for tier in [ConfigTier::Project, ConfigTier::User] {
                let Some(file) = paths.tier_file(tier) else {
                    continue;
                };
                if !file.exists() {
                    continue;
                }
                match read_yaml(&file) {
                    Ok(value) => {
                        debug!(tier = %tier, path = %file.display(), "Loaded config tier");
                        layers.push(value);
                        sources.push(file);
                    }
                    Err(e) => warn!(tier = %tier, "Ignoring unreadable config: {:#}", e),
                }
            }
        }

        let merged = deep_merge_all(layers);
        let mut config: Config =
            serde_json::from_value(merged).context("invalid configuration")?;

        apply_env_overrides(&mut config, env)?;

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(value)
}

fn apply_env_overrides<F>(config: &mut Config, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(db_path) = env("TASKPAD_DB_PATH") {
        config.server.db_path = PathBuf::from(db_path);
    }

    if let Some(bind) = env("TASKPAD_BIND") {
        config.server.bind = bind
            .parse()
            .with_context(|| format!("TASKPAD_BIND is not an IP address: {bind}"))?;
    }

    if let Some(port) = env("TASKPAD_PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("TASKPAD_PORT is not a port number: {port}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn defaults_when_no_files() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config(), &Config::default());
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn user_tier_overrides_project_field_by_field() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("taskpad");
        let user = temp.path().join("user");
        write_config(&project, "server:\n  port: 4000\ntasks:\n  due_soon_days: 5\n");
        write_config(&user, "server:\n  port: 5000\n");

        let loader =
            ConfigLoader::load_with_paths(ConfigPaths::with_dirs(Some(project), Some(user)))
                .unwrap();
        let config = loader.config();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.tasks.due_soon_days, 5);
        assert_eq!(loader.sources().len(), 2);
    }

    #[test]
    fn env_overrides_files() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("taskpad");
        write_config(&project, "server:\n  port: 4000\n");

        let loader = ConfigLoader::load_with(
            ConfigPaths::with_dirs(Some(project), None),
            None,
            |key| match key {
                "TASKPAD_PORT" => Some("6000".into()),
                "TASKPAD_DB_PATH" => Some("/tmp/other.db".into()),
                _ => None,
            },
        )
        .unwrap();

        assert_eq!(loader.config().server.port, 6000);
        assert_eq!(
            loader.config().server.db_path,
            PathBuf::from("/tmp/other.db")
        );
    }

    #[test]
    fn bad_env_port_is_an_error() {
        let result = ConfigLoader::load_with(ConfigPaths::default(), None, |key| {
            (key == "TASKPAD_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn explicit_file_replaces_tiers() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("taskpad");
        write_config(&project, "server:\n  port: 4000\n");
        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "auth:\n  session_ttl_seconds: 60\n").unwrap();

        let loader = ConfigLoader::load_with(
            ConfigPaths::with_dirs(Some(project), None),
            Some(explicit.clone()),
            |_| None,
        )
        .unwrap();

        assert_eq!(loader.config().server.port, 3000);
        assert_eq!(loader.config().auth.session_ttl_seconds, 60);
        assert_eq!(loader.sources(), [explicit]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = ConfigLoader::load_with(
            ConfigPaths::default(),
            Some(temp.path().join("nope.yaml")),
            |_| None,
        );
        assert!(result.is_err());
    }
}
