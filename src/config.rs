use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::container::ContainerSpec;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub containerizer: ContainerizerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Defaults offered by the wizard and settings for the dotnet commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerizerConfig {
    /// Base image pre-filled in the wizard
    #[serde(default = "default_base_image_name")]
    pub base_image_name: String,
    /// Image tag pre-filled in the wizard
    #[serde(default = "default_image_tag")]
    pub image_tag: String,
    /// NuGet package that adds container publishing to the project
    #[serde(default = "default_package")]
    pub package: String,
    /// Build configuration passed to `dotnet publish -c`
    #[serde(default = "default_configuration")]
    pub configuration: String,
    #[serde(default = "default_publish_profile")]
    pub publish_profile: String,
}

fn default_base_image_name() -> String {
    "mcr.microsoft.com/dotnet/aspnet:7.0".to_string()
}

fn default_image_tag() -> String {
    "latest".to_string()
}

fn default_package() -> String {
    "Microsoft.NET.Build.Containers".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

fn default_publish_profile() -> String {
    "DefaultContainer".to_string()
}

impl Default for ContainerizerConfig {
    fn default() -> Self {
        Self {
            base_image_name: default_base_image_name(),
            image_tag: default_image_tag(),
            package: default_package(),
            configuration: default_configuration(),
            publish_profile: default_publish_profile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file while the wizard owns the terminal (false = stderr)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and the local config file
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".containerize".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".containerize/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the wizard works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // Project-local config in .containerize/
        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/containerize/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("containerize").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. CONTAINERIZE__CONTAINERIZER__IMAGE_TAG
        builder = builder.add_source(
            config::Environment::with_prefix("CONTAINERIZE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .containerize/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Use the answers of a finished wizard as the next run's defaults
    pub fn remember(&mut self, spec: &ContainerSpec) {
        self.containerizer
            .base_image_name
            .clone_from(&spec.container_base_image);
        self.containerizer.image_tag.clone_from(&spec.tag);
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.containerizer.base_image_name,
            "mcr.microsoft.com/dotnet/aspnet:7.0"
        );
        assert_eq!(config.containerizer.image_tag, "latest");
        assert_eq!(config.containerizer.package, "Microsoft.NET.Build.Containers");
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_load_with_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("containerize.toml");
        std::fs::write(
            &path,
            "[containerizer]\nimage_tag = \"nightly\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.containerizer.image_tag, "nightly");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.containerizer.configuration, "Release");
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.containerizer.base_image_name = "mcr.microsoft.com/dotnet/runtime:8.0".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(
            loaded.containerizer.base_image_name,
            "mcr.microsoft.com/dotnet/runtime:8.0"
        );
    }

    #[test]
    fn test_remember_takes_image_and_tag() {
        let mut config = Config::default();
        config.remember(&ContainerSpec {
            os: "linux".to_string(),
            architecture: "x64".to_string(),
            container_base_image: "mcr.microsoft.com/dotnet/aspnet:8.0".to_string(),
            tag: "v2".to_string(),
            image_name: "myapp".to_string(),
        });
        assert_eq!(
            config.containerizer.base_image_name,
            "mcr.microsoft.com/dotnet/aspnet:8.0"
        );
        assert_eq!(config.containerizer.image_tag, "v2");
    }

    #[test]
    fn test_logs_path_under_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let logs_dir = config.logs_path();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(temp_dir.path()));
    }
}
