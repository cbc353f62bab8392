//! dotnet commands built from the wizard answers

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ContainerizerConfig;

use super::state::ContainerSpec;

const DOTNET: &str = "dotnet";

/// A program invocation that can be printed or run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotnetCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl DotnetCommand {
    /// `dotnet add <project> package <package>`
    pub fn add_package(project: &Path, package: &str) -> Self {
        Self {
            program: DOTNET.to_string(),
            args: vec![
                "add".to_string(),
                project.display().to_string(),
                "package".to_string(),
                package.to_string(),
            ],
        }
    }

    /// `dotnet publish` producing a container image
    pub fn publish(project: &Path, spec: &ContainerSpec, config: &ContainerizerConfig) -> Self {
        Self {
            program: DOTNET.to_string(),
            args: vec![
                "publish".to_string(),
                project.display().to_string(),
                "--os".to_string(),
                spec.os.clone(),
                "--arch".to_string(),
                spec.architecture.clone(),
                format!("/p:ContainerBaseImage={}", spec.container_base_image),
                "-c".to_string(),
                config.configuration.clone(),
                format!("/p:PublishProfile={}", config.publish_profile),
                format!("/p:ContainerImageName={}", spec.image_name),
                format!("/p:ContainerImageTag={}", spec.tag),
            ],
        }
    }

    /// Run to completion with inherited stdio; a non-zero exit is an error
    pub async fn run(&self) -> Result<()> {
        let program = which::which(&self.program)
            .with_context(|| format!("`{}` was not found on PATH", self.program))?;
        debug!(program = %program.display(), "Resolved program");
        info!(command = %self, "Running");

        let status = Command::new(&program)
            .args(&self.args)
            .status()
            .await
            .with_context(|| format!("Failed to execute {}", self.program))?;

        if !status.success() {
            bail!("`{}` failed with {}", self, status);
        }
        Ok(())
    }
}

impl fmt::Display for DotnetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ContainerSpec {
        ContainerSpec {
            os: "linux".to_string(),
            architecture: "x64".to_string(),
            container_base_image: "mcr.microsoft.com/dotnet/aspnet:7.0".to_string(),
            tag: "latest".to_string(),
            image_name: "myapp".to_string(),
        }
    }

    #[test]
    fn test_add_package_command() {
        let command =
            DotnetCommand::add_package(Path::new("Api.csproj"), "Microsoft.NET.Build.Containers");
        assert_eq!(
            command.to_string(),
            "dotnet add Api.csproj package Microsoft.NET.Build.Containers"
        );
    }

    #[test]
    fn test_publish_command() {
        let command = DotnetCommand::publish(
            Path::new("src/Api/Api.csproj"),
            &spec(),
            &ContainerizerConfig::default(),
        );
        assert_eq!(
            command.to_string(),
            "dotnet publish src/Api/Api.csproj --os linux --arch x64 \
             /p:ContainerBaseImage=mcr.microsoft.com/dotnet/aspnet:7.0 -c Release \
             /p:PublishProfile=DefaultContainer /p:ContainerImageName=myapp \
             /p:ContainerImageTag=latest"
        );
    }

    #[test]
    fn test_publish_uses_configured_build_settings() {
        let config = ContainerizerConfig {
            configuration: "Debug".to_string(),
            ..ContainerizerConfig::default()
        };
        let command = DotnetCommand::publish(Path::new("Api.csproj"), &spec(), &config);
        let pos = command.args.iter().position(|arg| arg == "-c").unwrap();
        assert_eq!(command.args[pos + 1], "Debug");
    }

    #[test]
    fn test_display_quotes_args_with_spaces() {
        let command = DotnetCommand::add_package(Path::new("My App/App.csproj"), "Pkg");
        assert_eq!(command.to_string(), "dotnet add \"My App/App.csproj\" package Pkg");
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let command = DotnetCommand {
            program: "definitely-not-an-installed-dotnet".to_string(),
            args: vec![],
        };
        let err = command.run().await.unwrap_err();
        assert!(err.to_string().contains("was not found on PATH"));
    }
}
