//! Containerizing a .NET project: the metadata wizard and the dotnet
//! commands built from its answers.

pub mod commands;
pub mod project;
pub mod state;
pub mod steps;
pub mod tasks;

pub use commands::DotnetCommand;
pub use project::find_project;
pub use state::{ContainerSpec, ContainerState};
pub use steps::{ContainerWizard, WizardDefaults};
